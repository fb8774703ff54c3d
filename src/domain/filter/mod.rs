use crate::domain::article::{AnnotatedArticle, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment category selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SentimentFilter {
    #[default]
    All,
    Only(SentimentLabel),
}

impl FromStr for SentimentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SentimentFilter::All);
        }
        s.parse::<SentimentLabel>()
            .map(SentimentFilter::Only)
            .map_err(|_| {
                format!(
                    "unknown sentiment filter '{}', expected All, Positive, Negative or Neutral",
                    s
                )
            })
    }
}

impl TryFrom<String> for SentimentFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SentimentFilter> for String {
    fn from(filter: SentimentFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentFilter::All => write!(f, "All"),
            SentimentFilter::Only(label) => write!(f, "{}", label),
        }
    }
}

/// User-selected predicates, composed by conjunction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlineFilter {
    pub sentiment: SentimentFilter,
    keyword: Option<String>,
}

impl HeadlineFilter {
    pub fn new(sentiment: SentimentFilter, keyword: Option<&str>) -> Self {
        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);
        Self { sentiment, keyword }
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// An article passes the sentiment predicate when either model agrees
    /// with the selected category.
    pub fn matches(&self, article: &AnnotatedArticle) -> bool {
        let sentiment_ok = match self.sentiment {
            SentimentFilter::All => true,
            SentimentFilter::Only(label) => article.has_sentiment(label),
        };

        let keyword_ok = match &self.keyword {
            Some(keyword) => article.article.title.to_lowercase().contains(keyword.as_str()),
            None => true,
        };

        sentiment_ok && keyword_ok
    }

    /// Ordered sub-sequence of the input that passes every predicate
    pub fn apply(&self, articles: &[AnnotatedArticle]) -> Vec<AnnotatedArticle> {
        articles
            .iter()
            .filter(|article| self.matches(article))
            .cloned()
            .collect()
    }
}

/// Convenience wrapper over [`HeadlineFilter::apply`]
pub fn filter_articles(
    articles: &[AnnotatedArticle],
    sentiment: SentimentFilter,
    keyword: Option<&str>,
) -> Vec<AnnotatedArticle> {
    HeadlineFilter::new(sentiment, keyword).apply(articles)
}
