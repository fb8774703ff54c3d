use super::sentiment_repository::SentimentClassifier;
use crate::domain::article::{ModelSentiment, SentimentLabel};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a binary sentiment classifier for news headlines. \
Classify the overall sentiment of the user's text as POSITIVE or NEGATIVE. \
Reply only with a JSON object of the form {\"label\": \"POSITIVE\" | \"NEGATIVE\", \"score\": <confidence between 0 and 1>}.";

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    label: String,
    score: f64,
}

/// Second-opinion sentiment model backed by an OpenAI chat model acting as a
/// POSITIVE/NEGATIVE classifier with a self-reported confidence
pub struct OpenAiSentimentClassifier {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiSentimentClassifier {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    async fn call_openai(&self, text: &str) -> Result<String, String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.0)
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| format!("Failed to build system message: {}", e))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()
                    .map_err(|e| format!("Failed to build user message: {}", e))?
                    .into(),
            ])
            .build()
            .map_err(|e| format!("Failed to build classification request: {}", e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI sentiment call failed"
            );
            format!("OpenAI sentiment error: {}", e)
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "OpenAI sentiment response had no content".to_string())
    }
}

#[async_trait]
impl SentimentClassifier for OpenAiSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<ModelSentiment, String> {
        let start_time = std::time::Instant::now();
        let content = self.call_openai(text).await?;
        let result = parse_reply(&content)?;

        tracing::debug!(
            model = %self.model,
            label = %result.label,
            confidence = result.confidence,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Second model classification completed"
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn parse_reply(content: &str) -> Result<ModelSentiment, String> {
    let reply: ClassifierReply = serde_json::from_str(content.trim())
        .map_err(|e| format!("Unparseable classifier reply '{}': {}", content, e))?;

    let label = reply.label.parse::<SentimentLabel>()?;
    if !reply.score.is_finite() {
        return Err(format!("Classifier confidence is not a number: {}", reply.score));
    }

    Ok(ModelSentiment {
        label,
        confidence: reply.score.clamp(0.0, 1.0),
    })
}
