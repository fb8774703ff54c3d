use super::sentiment_repository::SentimentScorer;
use async_trait::async_trait;

/// Lexicon and rule based scorer (VADER), tuned for short social/news text
pub struct VaderSentimentScorer;

impl VaderSentimentScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VaderSentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentScorer for VaderSentimentScorer {
    async fn compound_score(&self, text: &str) -> Result<f64, String> {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);

        scores
            .get("compound")
            .copied()
            .ok_or_else(|| "VADER returned no compound score".to_string())
    }

    fn name(&self) -> &str {
        "vader"
    }
}
