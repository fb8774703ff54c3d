use async_trait::async_trait;

/// Keyword extraction capability.
///
/// Implementations return phrases in their own relevance order; callers take
/// from the front and never re-rank.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<String>, String>;
}
