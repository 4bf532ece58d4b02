//! Minimal Telegram Bot API client over reqwest

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::error::TelegramError;
use super::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};
use crate::handler::PageAttachment;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra slack on top of the long-poll timeout before the HTTP client gives up
const POLL_GRACE_SECS: u64 = 10;

#[derive(Clone)]
pub struct BotClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl BotClient {
    pub fn new(base_url: &str, token: &str, poll_timeout_secs: u64) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + POLL_GRACE_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Long-poll for new message updates starting at `offset`
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .json(&body)
            .send()
            .await?;

        decode(response).await
    }

    /// Send `text`, threaded under message `reply_to` when given
    pub async fn send_message(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            reply_to_message_id: reply_to,
        };

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        decode::<serde_json::Value>(response).await.map(|_| ())
    }

    /// Upload a single-page bill as a document with caption
    pub async fn send_document(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        attachment: &PageAttachment,
    ) -> Result<(), TelegramError> {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.filename.clone())
            .mime_str("application/pdf")?;

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", attachment.caption.clone());
        if let Some(message_id) = reply_to {
            form = form.text("reply_to_message_id", message_id.to_string());
        }
        let form = form.part("document", part);

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        decode::<serde_json::Value>(response).await.map(|_| ())
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Unwrap the `{ok, result}` envelope
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TelegramError> {
    let envelope: ApiResponse<T> = response.json().await?;
    unwrap_envelope(envelope)
}

fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T, TelegramError> {
    if !envelope.ok {
        return Err(TelegramError::Api {
            code: envelope.error_code,
            description: envelope
                .description
                .unwrap_or_else(|| "no description".to_string()),
        });
    }

    envelope.result.ok_or(TelegramError::MissingResult)
}
