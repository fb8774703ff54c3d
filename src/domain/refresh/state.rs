use crate::domain::article::AnnotatedArticle;
use crate::infrastructure::repositories::NewsProviderError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// What asked for a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Explicit user action, always due
    Manual,
    /// Interval check, due once the interval has strictly elapsed
    Auto,
}

/// Result of evaluating a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    Refreshed,
    Failed,
    AlreadyInFlight,
    NotDue,
    Skipped,
}

/// Timestamp of the last pipeline start. Only the refresh service writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    pub last_refresh: DateTime<Utc>,
}

impl RefreshState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { last_refresh: now }
    }

    /// Strictly more than `interval` since the last refresh
    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        match chrono::Duration::from_std(interval) {
            Ok(interval) => now.signed_duration_since(self.last_refresh) > interval,
            Err(_) => false,
        }
    }

    pub fn should_refresh(
        &self,
        trigger: RefreshTrigger,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> bool {
        match trigger {
            RefreshTrigger::Manual => true,
            RefreshTrigger::Auto => self.is_due(now, interval),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Provider,
    Unavailable,
}

/// User-facing notice for a failed fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&NewsProviderError> for FetchFailure {
    fn from(err: &NewsProviderError) -> Self {
        match err {
            NewsProviderError::Configuration(detail) => FetchFailure {
                kind: FailureKind::Configuration,
                message: format!(
                    "News provider configuration error ({}). Please check your API key and country settings.",
                    detail
                ),
            },
            NewsProviderError::Provider { code, message } => FetchFailure {
                kind: FailureKind::Provider,
                message: format!("Error fetching news: {} ({})", message, code),
            },
            NewsProviderError::Unavailable(detail) => FetchFailure {
                kind: FailureKind::Unavailable,
                message: format!("News provider is unavailable: {}. Please try again later.", detail),
            },
        }
    }
}

/// Outcome of the last completed pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub articles: Vec<AnnotatedArticle>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub error: Option<FetchFailure>,
}

impl Snapshot {
    pub fn succeeded(articles: Vec<AnnotatedArticle>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            articles,
            fetched_at: Some(fetched_at),
            error: None,
        }
    }

    /// A failure carries no articles
    pub fn failed(error: FetchFailure, fetched_at: DateTime<Utc>) -> Self {
        Self {
            articles: Vec::new(),
            fetched_at: Some(fetched_at),
            error: Some(error),
        }
    }
}
