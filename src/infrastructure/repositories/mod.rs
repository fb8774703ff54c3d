pub mod keyword_repository;
pub mod news_repository;
pub mod newsapi_repository;
pub mod openai_sentiment_repository;
pub mod sentiment_repository;
pub mod vader_sentiment_repository;
pub mod yake_keyword_repository;

pub use keyword_repository::KeywordExtractor;
pub use news_repository::{NewsProviderError, NewsRepository};
pub use newsapi_repository::{validate_country, NewsApiRepository, NEWS_API_ENDPOINT};
pub use openai_sentiment_repository::OpenAiSentimentClassifier;
pub use sentiment_repository::{SentimentClassifier, SentimentScorer};
pub use vader_sentiment_repository::VaderSentimentScorer;
pub use yake_keyword_repository::YakeKeywordExtractor;
