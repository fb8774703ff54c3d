use super::keyword_repository::KeywordExtractor;
use async_trait::async_trait;
use keyword_extraction::yake::{Yake, YakeParams};
use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use stop_words::LANGUAGE;

/// Similarity above which YAKE drops a candidate as a near duplicate
const DEDUP_THRESHOLD: f32 = 0.3;
/// Co-occurrence window used for term relatedness
const WINDOW_SIZE: usize = 2;

/// YAKE keyword extraction with stop words chosen by the detected language
pub struct YakeKeywordExtractor {
    language_detector: LanguageDetector,
    max_keywords: usize,
    max_ngram: usize,
}

impl YakeKeywordExtractor {
    pub fn new(max_keywords: usize, max_ngram: usize) -> Self {
        // Only the languages we ship stop words for
        let language_detector = LanguageDetectorBuilder::from_languages(&[
            Language::English,
            Language::Spanish,
            Language::French,
            Language::German,
            Language::Italian,
            Language::Portuguese,
        ])
        .build();

        Self {
            language_detector,
            max_keywords,
            max_ngram,
        }
    }

    fn stop_words_for(&self, text: &str) -> Vec<String> {
        let language = match self.language_detector.detect_language_of(text) {
            Some(Language::Spanish) => LANGUAGE::Spanish,
            Some(Language::French) => LANGUAGE::French,
            Some(Language::German) => LANGUAGE::German,
            Some(Language::Italian) => LANGUAGE::Italian,
            Some(Language::Portuguese) => LANGUAGE::Portuguese,
            _ => LANGUAGE::English,
        };
        stop_words::get(language)
    }
}

#[async_trait]
impl KeywordExtractor for YakeKeywordExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<String>, String> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stop_words = self.stop_words_for(text);
        let yake = Yake::new(YakeParams::All(
            text,
            &stop_words,
            None,
            DEDUP_THRESHOLD,
            self.max_ngram,
            WINDOW_SIZE,
        ));

        Ok(yake.get_ranked_keywords(self.max_keywords))
    }
}
