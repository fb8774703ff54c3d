use super::news_repository::{NewsProviderError, NewsRepository};
use crate::domain::article::RawArticle;
use async_trait::async_trait;
use moka::future::Cache;
use rand::Rng;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const NEWS_API_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Provider codes that mean the credential itself is the problem
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "apiKeyInvalid",
    "apiKeyMissing",
    "apiKeyDisabled",
    "apiKeyExhausted",
];

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Option<Vec<NewsApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<NewsApiSource>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl NewsApiArticle {
    fn into_raw(self) -> Option<RawArticle> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(RawArticle {
            title,
            description: self.description,
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            source_name: self.source.and_then(|s| s.name).unwrap_or_default(),
        })
    }
}

/// NewsAPI `top-headlines` client with bounded retry and an optional
/// time-to-live cache keyed by country.
pub struct NewsApiRepository {
    endpoint: String,
    api_key: String,
    max_attempts: u32,
    retry_base_delay: Duration,
    http_client: reqwest::Client,
    cache: Option<Cache<String, Vec<RawArticle>>>,
}

impl NewsApiRepository {
    pub fn new(
        endpoint: String,
        api_key: String,
        max_attempts: u32,
        cache_ttl: Option<Duration>,
    ) -> Self {
        let cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(32)
                .time_to_live(ttl) // entries expire regardless of access
                .build()
        });

        Self {
            endpoint,
            api_key,
            max_attempts: max_attempts.max(1),
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            http_client: reqwest::Client::new(),
            cache,
        }
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// One GET against the provider, no retry
    async fn call_provider(&self, country: &str) -> Result<Vec<RawArticle>, NewsProviderError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            country = country,
            "Calling news provider"
        );

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("country", country), ("apiKey", self.api_key.as_str())])
            .header("User-Agent", "Newsie-Backend")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| NewsProviderError::Unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewsProviderError::Unavailable(format!("failed to read body: {}", e)))?;

        parse_response(status, &body)
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.retry_base_delay.as_millis() as u64;
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let jitter_ms = if base_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=base_ms)
        };
        Duration::from_millis(base_ms.saturating_mul(1 << exponent) + jitter_ms)
    }

    async fn fetch_with_retry(&self, country: &str) -> Result<Vec<RawArticle>, NewsProviderError> {
        let mut attempt = 1;
        loop {
            match self.call_provider(country).await {
                Ok(articles) => {
                    tracing::info!(
                        country = country,
                        attempt = attempt,
                        article_count = articles.len(),
                        "Headlines fetched"
                    );
                    return Ok(articles);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "News provider unavailable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        attempt = attempt,
                        country = country,
                        "Headline fetch failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl NewsRepository for NewsApiRepository {
    async fn fetch_headlines(&self, country: &str) -> Result<Vec<RawArticle>, NewsProviderError> {
        validate_country(country)?;
        if self.api_key.trim().is_empty() {
            return Err(NewsProviderError::Configuration(
                "news provider API key is empty".to_string(),
            ));
        }

        let cache_key = country.to_lowercase();

        // Check cache first (if enabled)
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(
                    country = country,
                    article_count = cached.len(),
                    "Headline cache hit - returning cached articles"
                );
                return Ok(cached);
            }
        }

        let articles = self.fetch_with_retry(&cache_key).await?;

        // Only successful fetches are cached
        if let Some(cache) = &self.cache {
            cache.insert(cache_key, articles.clone()).await;
        }

        Ok(articles)
    }
}

/// Country codes are two ASCII letters (ISO 3166-1 alpha-2)
pub fn validate_country(country: &str) -> Result<(), NewsProviderError> {
    if country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(NewsProviderError::Configuration(format!(
            "country must be a two-letter code, got '{}'",
            country
        )))
    }
}

/// Map an HTTP status and body to articles or a classified failure
fn parse_response(status: StatusCode, body: &str) -> Result<Vec<RawArticle>, NewsProviderError> {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Err(NewsProviderError::Unavailable(format!(
            "provider returned HTTP {}",
            status.as_u16()
        )));
    }

    let parsed: NewsApiResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status == StatusCode::UNAUTHORIZED => {
            return Err(NewsProviderError::Configuration(format!(
                "provider rejected credentials: {}",
                e
            )))
        }
        Err(e) => {
            return Err(NewsProviderError::Provider {
                code: "invalidResponse".to_string(),
                message: format!("failed to parse provider response: {}", e),
            })
        }
    };

    if parsed.status != "ok" {
        let code = parsed.code.unwrap_or_else(|| "unknown".to_string());
        let message = parsed
            .message
            .unwrap_or_else(|| "Unknown error".to_string());

        if status == StatusCode::UNAUTHORIZED || CREDENTIAL_ERROR_CODES.contains(&code.as_str()) {
            return Err(NewsProviderError::Configuration(format!(
                "{}: {}",
                code, message
            )));
        }
        if code == "rateLimited" {
            return Err(NewsProviderError::Unavailable(format!("{}: {}", code, message)));
        }
        return Err(NewsProviderError::Provider { code, message });
    }

    Ok(parsed
        .articles
        .unwrap_or_default()
        .into_iter()
        .filter_map(NewsApiArticle::into_raw)
        .collect())
}
