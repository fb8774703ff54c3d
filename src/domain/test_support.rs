use crate::domain::article::{ModelSentiment, RawArticle, SentimentLabel};
use crate::infrastructure::repositories::{
    KeywordExtractor, NewsProviderError, NewsRepository, SentimentClassifier, SentimentScorer,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn raw_article(title: &str, description: Option<&str>) -> RawArticle {
    RawArticle {
        title: title.to_string(),
        description: description.map(str::to_string),
        url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        published_at: "2024-05-01T10:00:00Z".to_string(),
        source_name: "Example Wire".to_string(),
    }
}

/// Scores text by the first configured word it contains, 0.0 otherwise
#[derive(Default)]
pub struct LexiconScorer {
    entries: Vec<(&'static str, f64)>,
    fail_on: Option<&'static str>,
    slow_on: Option<(&'static str, Duration)>,
}

impl LexiconScorer {
    pub fn new(entries: Vec<(&'static str, f64)>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, word: &'static str) -> Self {
        self.fail_on = Some(word);
        self
    }

    pub fn slow_on(mut self, word: &'static str, delay: Duration) -> Self {
        self.slow_on = Some((word, delay));
        self
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn compound_score(&self, text: &str) -> Result<f64, String> {
        let lowered = text.to_lowercase();
        if let Some((word, delay)) = self.slow_on {
            if lowered.contains(word) {
                tokio::time::sleep(delay).await;
            }
        }
        if let Some(word) = self.fail_on {
            if lowered.contains(word) {
                return Err(format!("model refused '{}'", word));
            }
        }
        Ok(self
            .entries
            .iter()
            .find(|(word, _)| lowered.contains(word))
            .map(|(_, score)| *score)
            .unwrap_or(0.0))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Returns the configured verdict for the first matching word, `fallback` otherwise
pub struct StubClassifier {
    entries: Vec<(&'static str, ModelSentiment)>,
    fallback: ModelSentiment,
    pub inputs: Mutex<Vec<String>>,
}

impl StubClassifier {
    pub fn new(entries: Vec<(&'static str, SentimentLabel, f64)>, fallback: (SentimentLabel, f64)) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(word, label, confidence)| (word, ModelSentiment { label, confidence }))
                .collect(),
            fallback: ModelSentiment {
                label: fallback.0,
                confidence: fallback.1,
            },
            inputs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SentimentClassifier for StubClassifier {
    async fn classify(&self, text: &str) -> Result<ModelSentiment, String> {
        self.inputs.lock().unwrap().push(text.to_string());
        let lowered = text.to_lowercase();
        Ok(self
            .entries
            .iter()
            .find(|(word, _)| lowered.contains(word))
            .map(|(_, verdict)| *verdict)
            .unwrap_or(self.fallback))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Lowercased words longer than three characters, in text order
#[derive(Default)]
pub struct WordExtractor {
    pub calls: AtomicUsize,
}

#[async_trait]
impl KeywordExtractor for WordExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<String>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| w.len() > 3)
            .collect())
    }
}

/// News repository returning a canned result, optionally parked on a gate
pub struct StubNewsRepository {
    result: Mutex<Result<Vec<RawArticle>, NewsProviderError>>,
    gate: Option<Arc<Notify>>,
    pub started: Arc<Notify>,
    pub calls: AtomicUsize,
}

impl StubNewsRepository {
    pub fn new(result: Result<Vec<RawArticle>, NewsProviderError>) -> Self {
        Self {
            result: Mutex::new(result),
            gate: None,
            started: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fetches block until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn respond_with(&self, result: Result<Vec<RawArticle>, NewsProviderError>) {
        *self.result.lock().unwrap() = result;
    }
}

#[async_trait]
impl NewsRepository for StubNewsRepository {
    async fn fetch_headlines(&self, _country: &str) -> Result<Vec<RawArticle>, NewsProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.lock().unwrap().clone()
    }
}
