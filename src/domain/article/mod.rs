pub mod model;

pub use model::{
    AnnotatedArticle, ModelSentiment, RawArticle, SentimentLabel, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};
