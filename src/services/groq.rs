//! Groq chat-completions narrator (OpenAI-compatible API)

use crate::config::NarrationConfig;
use crate::narrative::NarrativeRequest;
use crate::services::errors::{ClientInitError, NarrationError};
use crate::services::narration::Narrator;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct GroqNarrator {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    vision_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqNarrator {
    pub fn new(config: NarrationConfig, timeout: Duration) -> Result<Self, ClientInitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: NarrationConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
            vision_model: config.vision_model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Plain text content, or text plus an `image_url` part for multimodal requests
    fn user_content(request: &NarrativeRequest) -> Value {
        let prompt = request.prompt();
        match &request.image {
            Some(image) => json!([
                { "type": "text", "text": prompt },
                { "type": "image_url", "image_url": { "url": image.url } }
            ]),
            None => Value::String(prompt),
        }
    }
}

#[async_trait]
impl Narrator for GroqNarrator {
    async fn narrate(&self, request: &NarrativeRequest) -> Result<String, NarrationError> {
        let model: &str = if request.image.is_some() {
            &self.vision_model
        } else {
            &self.model
        };

        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::user_content(request),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(symbol = %request.symbol, model = %model, "Groq: requesting narration for {}", request.symbol);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(NarrationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NarrationError::EmptyResponse)
    }
}
