pub mod error;
pub mod service;
pub mod text;

pub use error::AnnotationError;
pub use service::{AnnotationService, AnnotationServiceApi, MAX_CLASSIFIER_CHARS, MAX_KEYWORDS};
