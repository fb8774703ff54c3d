use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compound scores at or above this value are positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this value are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Classify a compound score with the fixed three-way thresholds
    pub fn from_compound(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive, so both "Positive" and a model's "POSITIVE" parse
impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// A headline as delivered by the news provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: String,
    pub source_name: String,
}

impl RawArticle {
    /// Description with blank values treated as absent
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Label and confidence reported by the second sentiment model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSentiment {
    pub label: SentimentLabel,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
    #[serde(flatten)]
    pub article: RawArticle,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_sentiment: Option<ModelSentiment>,
    pub keywords: Vec<String>,
}

impl AnnotatedArticle {
    /// True when either sentiment source carries the given label
    pub fn has_sentiment(&self, label: SentimentLabel) -> bool {
        self.sentiment == label
            || self
                .model_sentiment
                .map(|model| model.label == label)
                .unwrap_or(false)
    }
}
