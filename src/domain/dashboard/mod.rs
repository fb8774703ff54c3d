use crate::domain::article::{AnnotatedArticle, SentimentLabel};
use crate::domain::filter::HeadlineFilter;
use crate::domain::refresh::{FetchFailure, RefreshOutcome, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary-label counts over the displayed articles, every label present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn tally(articles: &[AnnotatedArticle]) -> Self {
        articles
            .iter()
            .fold(SentimentCounts::default(), |mut counts, article| {
                match article.sentiment {
                    SentimentLabel::Positive => counts.positive += 1,
                    SentimentLabel::Negative => counts.negative += 1,
                    SentimentLabel::Neutral => counts.neutral += 1,
                }
                counts
            })
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }
}

/// Everything the presentation layer renders for one interaction
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub refresh: RefreshOutcome,
    pub last_refresh: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub articles: Vec<AnnotatedArticle>,
    pub sentiment_counts: SentimentCounts,
    /// Every surfaced keyword, in article order
    pub keywords: Vec<String>,
    /// Space-joined keywords, the word cloud input
    pub keyword_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
}

impl DashboardView {
    pub fn build(
        snapshot: &Snapshot,
        filter: &HeadlineFilter,
        refresh: RefreshOutcome,
        last_refresh: DateTime<Utc>,
    ) -> Self {
        let articles = filter.apply(&snapshot.articles);
        let keywords: Vec<String> = articles
            .iter()
            .flat_map(|article| article.keywords.iter().cloned())
            .collect();

        Self {
            refresh,
            last_refresh,
            fetched_at: snapshot.fetched_at,
            total: articles.len(),
            sentiment_counts: SentimentCounts::tally(&articles),
            keyword_text: keywords.join(" "),
            keywords,
            articles,
            error: snapshot.error.clone(),
        }
    }
}
