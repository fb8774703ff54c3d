use crate::domain::article::RawArticle;
use async_trait::async_trait;

/// Failure categories for a headline fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NewsProviderError {
    /// Missing, rejected or malformed credentials/parameters. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The provider answered but reported a failure (`status != "ok"`)
    #[error("provider error ({code}): {message}")]
    Provider { code: String, message: String },
    /// Transport failures, timeouts, 5xx and rate limiting
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl NewsProviderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, NewsProviderError::Unavailable(_))
    }
}

/// Repository for top-headline fetches.
/// Abstracts the underlying news provider (NewsAPI, a mock in tests, etc.)
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Fetch the current top headlines for a two-letter country code
    ///
    /// # Errors
    /// Returns error if the provider is unreachable, rejects the credentials,
    /// or reports a non-ok status
    async fn fetch_headlines(&self, country: &str) -> Result<Vec<RawArticle>, NewsProviderError>;
}
