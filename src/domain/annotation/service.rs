use super::error::AnnotationError;
use super::text::{clean_text, scoring_text, truncate_chars};
use crate::domain::article::{AnnotatedArticle, RawArticle, SentimentLabel};
use crate::infrastructure::repositories::{KeywordExtractor, SentimentClassifier, SentimentScorer};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// The second model only sees this many characters of the scoring text
pub const MAX_CLASSIFIER_CHARS: usize = 512;
pub const MAX_KEYWORDS: usize = 5;

pub struct AnnotationService {
    scorer: Arc<dyn SentimentScorer>,
    classifier: Option<Arc<dyn SentimentClassifier>>,
    extractor: Arc<dyn KeywordExtractor>,
    concurrency: usize,
    article_timeout: Duration,
}

impl AnnotationService {
    pub fn new(
        scorer: Arc<dyn SentimentScorer>,
        classifier: Option<Arc<dyn SentimentClassifier>>,
        extractor: Arc<dyn KeywordExtractor>,
        concurrency: usize,
        article_timeout: Duration,
    ) -> Self {
        Self {
            scorer,
            classifier,
            extractor,
            concurrency: concurrency.max(1),
            article_timeout,
        }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Name of the second model, if one is configured
    pub fn classifier_name(&self) -> Option<&str> {
        self.classifier.as_ref().map(|c| c.name())
    }
}

#[async_trait]
pub trait AnnotationServiceApi: Send + Sync {
    /// Annotate a single article
    ///
    /// Returns `Ok(None)` when the second model's confidence falls below
    /// `confidence_threshold`: such articles are excluded, not flagged.
    async fn annotate(
        &self,
        article: RawArticle,
        confidence_threshold: f64,
    ) -> Result<Option<AnnotatedArticle>, AnnotationError>;

    /// Annotate a whole fetch, concurrently, keeping fetch order
    ///
    /// Articles that fail or time out are logged and left out.
    async fn annotate_batch(
        &self,
        articles: Vec<RawArticle>,
        confidence_threshold: f64,
    ) -> Vec<AnnotatedArticle>;
}

#[async_trait]
impl AnnotationServiceApi for AnnotationService {
    async fn annotate(
        &self,
        article: RawArticle,
        confidence_threshold: f64,
    ) -> Result<Option<AnnotatedArticle>, AnnotationError> {
        let text = scoring_text(&article);

        let sentiment_score = self
            .scorer
            .compound_score(&text)
            .await
            .map_err(AnnotationError::Scoring)?;
        let sentiment = SentimentLabel::from_compound(sentiment_score);

        let model_sentiment = match &self.classifier {
            Some(classifier) => {
                let verdict = classifier
                    .classify(truncate_chars(&text, MAX_CLASSIFIER_CHARS))
                    .await
                    .map_err(AnnotationError::Classification)?;

                if verdict.confidence < confidence_threshold {
                    tracing::debug!(
                        title = %article.title,
                        confidence = verdict.confidence,
                        threshold = confidence_threshold,
                        "Article below confidence threshold, excluded"
                    );
                    return Ok(None);
                }
                Some(verdict)
            }
            None => None,
        };

        // Keywords come from the description only
        let keywords = match article.description_text() {
            Some(description) => self
                .extractor
                .extract(&clean_text(description))
                .await
                .map_err(AnnotationError::Keywords)?
                .into_iter()
                .take(MAX_KEYWORDS)
                .collect(),
            None => Vec::new(),
        };

        Ok(Some(AnnotatedArticle {
            article,
            sentiment,
            sentiment_score,
            model_sentiment,
            keywords,
        }))
    }

    async fn annotate_batch(
        &self,
        articles: Vec<RawArticle>,
        confidence_threshold: f64,
    ) -> Vec<AnnotatedArticle> {
        let start_time = std::time::Instant::now();
        let fetched = articles.len();

        // `buffered` yields in input order whatever the completion order
        let annotated: Vec<AnnotatedArticle> = stream::iter(articles.into_iter().enumerate())
            .map(|(index, article)| async move {
                let title = article.title.clone();
                match tokio::time::timeout(
                    self.article_timeout,
                    self.annotate(article, confidence_threshold),
                )
                .await
                {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        tracing::warn!(
                            index = index,
                            title = %title,
                            error = %e,
                            "Article annotation failed, dropping article"
                        );
                        None
                    }
                    Err(_) => {
                        tracing::warn!(
                            index = index,
                            title = %title,
                            timeout_ms = self.article_timeout.as_millis() as u64,
                            "Article annotation timed out, dropping article"
                        );
                        None
                    }
                }
            })
            .buffered(self.concurrency)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        tracing::info!(
            fetched = fetched,
            annotated = annotated.len(),
            scorer = self.scorer.name(),
            second_model = self.classifier_name().unwrap_or("none"),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Annotation batch completed"
        );

        annotated
    }
}
