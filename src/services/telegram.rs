//! Telegram Bot API delivery

use crate::config::DeliveryConfig;
use crate::models::{Delivery, ImageRef};
use crate::services::delivery::Deliverer;
use crate::services::errors::{ClientInitError, DeliveryError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest text Telegram accepts in one message, in UTF-16 code units
pub const MESSAGE_LIMIT: usize = 4096;

/// Longest photo caption Telegram accepts, in UTF-16 code units
pub const CAPTION_LIMIT: usize = 1024;

const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramDeliverer {
    client: Client,
    base_url: String,
    bot_token: SecretString,
}

impl TelegramDeliverer {
    pub fn new(config: DeliveryConfig, timeout: Duration) -> Result<Self, ClientInitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(config.base_url, config.bot_token, client))
    }

    pub fn with_client(base_url: impl Into<String>, bot_token: SecretString, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<(), DeliveryError> {
        let url = format!(
            "{}/bot{}/{}",
            self.base_url,
            self.bot_token.expose_secret(),
            method
        );
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: Option<TelegramResponse> = serde_json::from_str(&text).ok();
        match parsed {
            Some(reply) if reply.ok && status.is_success() => Ok(()),
            Some(reply) => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: reply.description.unwrap_or(text),
            }),
            None => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: text,
            }),
        }
    }

    /// Call `method` with Markdown formatting, resending as plain text if Telegram cannot
    /// parse the entities. `build` produces the request body for a given parse mode.
    async fn call_formatted<T, F>(&self, method: &str, build: F) -> Result<(), DeliveryError>
    where
        T: Serialize,
        F: Fn(Option<&'static str>) -> T,
    {
        match self.call(method, &build(Some(PARSE_MODE))).await {
            Err(DeliveryError::Api {
                status: 400,
                description,
            }) if description.contains("can't parse entities") => {
                warn!(method, error = %description, "Telegram: markdown rejected, resending as plain text");
                self.call(method, &build(None)).await
            }
            other => other,
        }
    }

    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.call_formatted("sendMessage", |parse_mode| SendMessage {
            chat_id,
            text,
            parse_mode,
        })
        .await
    }

    async fn send_photo(
        &self,
        chat_id: &str,
        image: &ImageRef,
        caption: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let Some(caption) = caption else {
            let body = SendPhoto {
                chat_id,
                photo: &image.url,
                caption: None,
                parse_mode: None,
            };
            return self.call("sendPhoto", &body).await;
        };
        self.call_formatted("sendPhoto", |parse_mode| SendPhoto {
            chat_id,
            photo: &image.url,
            caption: Some(caption),
            parse_mode,
        })
        .await
    }
}

#[async_trait]
impl Deliverer for TelegramDeliverer {
    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        let destination = delivery.destination.as_str();
        let text = delivery.text.as_str();

        if let Some(image) = &delivery.image {
            if utf16_len(text) <= CAPTION_LIMIT {
                return self.send_photo(destination, image, Some(text)).await;
            }
            self.send_photo(destination, image, None).await?;
        }

        let chunks = split_message(text, MESSAGE_LIMIT);
        debug!(chunks = chunks.len(), "Telegram: sending {} message(s)", chunks.len());
        for chunk in &chunks {
            self.send_text(destination, chunk).await?;
        }
        Ok(())
    }
}

/// Length as Telegram counts it
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split `text` into chunks of at most `limit` UTF-16 code units, breaking on line boundaries
/// where possible. Lines longer than `limit` are cut mid-line, never inside a character.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(2);
    let mut chunks = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for line in text.split('\n') {
        let line_len = utf16_len(line);

        if let Some((chunk, len)) = current.as_mut() {
            if *len + 1 + line_len <= limit {
                chunk.push('\n');
                chunk.push_str(line);
                *len += 1 + line_len;
                continue;
            }
        }
        if let Some((chunk, _)) = current.take() {
            chunks.push(chunk);
        }

        if line_len <= limit {
            current = Some((line.to_string(), line_len));
            continue;
        }

        let mut piece = String::new();
        let mut piece_len = 0;
        for c in line.chars() {
            let width = c.len_utf16();
            if piece_len + width > limit {
                chunks.push(std::mem::take(&mut piece));
                piece_len = 0;
            }
            piece.push(c);
            piece_len += width;
        }
        current = Some((piece, piece_len));
    }

    if let Some((chunk, _)) = current {
        chunks.push(chunk);
    }
    chunks
}
