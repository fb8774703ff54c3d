use crate::domain::article::ModelSentiment;
use async_trait::async_trait;

/// Primary sentiment capability: text in, compound polarity score out.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Compound score in roughly [-1, 1]
    async fn compound_score(&self, text: &str) -> Result<f64, String>;

    fn name(&self) -> &str;
}

/// Second, independently sourced sentiment model reporting a label with a
/// confidence in [0, 1].
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ModelSentiment, String>;

    fn name(&self) -> &str;
}
