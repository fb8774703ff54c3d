use crate::infrastructure::repositories::{validate_country, NEWS_API_ENDPOINT};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // News provider
    pub news_api_key: String,
    pub news_api_endpoint: String,
    pub news_country: String,
    pub fetch_max_attempts: u32,
    // Fetch cache
    pub fetch_cache_enabled: bool,
    pub fetch_cache_ttl_secs: u64,
    // Refresh
    pub refresh_interval_secs: u64,
    // Annotation
    pub confidence_threshold: f64,
    pub annotation_concurrency: usize,
    pub annotation_timeout_secs: u64,
    // Second sentiment model
    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            news_api_key: env::var("NEWS_API_KEY")
                .map_err(|_| "NEWS_API_KEY must be set to a NewsAPI credential")?,
            news_api_endpoint: env::var("NEWS_API_ENDPOINT")
                .unwrap_or_else(|_| NEWS_API_ENDPOINT.to_string()),
            news_country: env::var("NEWS_COUNTRY")
                .unwrap_or_else(|_| "us".to_string())
                .to_lowercase(),
            fetch_max_attempts: env::var("FETCH_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            fetch_cache_enabled: parse_flag(env::var("FETCH_CACHE_ENABLED").ok(), true),
            fetch_cache_ttl_secs: env::var("FETCH_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            confidence_threshold: env::var("CONFIDENCE_THRESHOLD")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()?,
            annotation_concurrency: env::var("ANNOTATION_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()?,
            annotation_timeout_secs: env::var("ANNOTATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.news_api_key.trim().is_empty() {
            return Err("NEWS_API_KEY must not be empty".into());
        }
        validate_country(&self.news_country)?;
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "CONFIDENCE_THRESHOLD must be within [0, 1], got {}",
                self.confidence_threshold
            )
            .into());
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// `None` when the fetch cache is disabled
    pub fn fetch_cache_ttl(&self) -> Option<Duration> {
        self.fetch_cache_enabled
            .then(|| Duration::from_secs(self.fetch_cache_ttl_secs))
    }

    pub fn annotation_timeout(&self) -> Duration {
        Duration::from_secs(self.annotation_timeout_secs)
    }
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => value.trim().eq_ignore_ascii_case("true"),
        None => default,
    }
}
