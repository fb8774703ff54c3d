#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("sentiment scoring failed: {0}")]
    Scoring(String),
    #[error("second model classification failed: {0}")]
    Classification(String),
    #[error("keyword extraction failed: {0}")]
    Keywords(String),
}
