// src/core/service_client.rs
//! Telegram Bot API client: JSON calls for text, multipart for documents

use crate::delivery::ChatTransport;
use crate::errors::DeliveryError;
use crate::types::telegram::{
    ApiResponse, GetUpdatesRequest, Message, SendMessageRequest, SetWebhookRequest, Update,
};
use crate::types::ChatId;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

const SEND_MESSAGE: &str = "sendMessage";
const SEND_DOCUMENT: &str = "sendDocument";
const GET_UPDATES: &str = "getUpdates";
const SET_WEBHOOK: &str = "setWebhook";
const DELETE_WEBHOOK: &str = "deleteWebhook";

const CSV_MIME: &str = "text/csv";

pub struct TelegramClient {
    client: reqwest::Client,
    bot_url: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.bot_url, method)
    }

    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, DeliveryError> {
        let payload = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };
        let request = self.client.post(self.method_url(SEND_MESSAGE)).json(&payload);
        self.call(SEND_MESSAGE, request).await
    }

    pub async fn send_document(
        &self,
        chat_id: ChatId,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<Message, DeliveryError> {
        let size = bytes.len();
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(
                "document",
                Part::bytes(bytes)
                    .file_name(file_name.to_string())
                    .mime_str(CSV_MIME)?,
            );

        info!("Uploading {} ({} bytes) to chat {}", file_name, size, chat_id);
        let request = self.client.post(self.method_url(SEND_DOCUMENT)).multipart(form);
        self.call(SEND_DOCUMENT, request).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DeliveryError> {
        let payload = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        let request = self.client.post(self.method_url(GET_UPDATES)).json(&payload);
        self.call(GET_UPDATES, request).await
    }

    /// Point Telegram at our webhook endpoint
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), DeliveryError> {
        let payload = SetWebhookRequest {
            url,
            secret_token: secret,
            allowed_updates: vec!["message"],
        };
        let request = self.client.post(self.method_url(SET_WEBHOOK)).json(&payload);
        let _: bool = self.call(SET_WEBHOOK, request).await?;
        info!("Webhook registered at {}", url);
        Ok(())
    }

    /// getUpdates is refused while a webhook is registered
    pub async fn delete_webhook(&self) -> Result<(), DeliveryError> {
        let request = self.client.post(self.method_url(DELETE_WEBHOOK));
        let _: bool = self.call(DELETE_WEBHOOK, request).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DeliveryError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} -> {}", method, status);

        // error replies carry a JSON envelope too, so the status alone is not checked
        let envelope: ApiResponse<T> = response.json().await?;
        unwrap_envelope(method, envelope)
    }
}

fn unwrap_envelope<T>(method: &str, envelope: ApiResponse<T>) -> Result<T, DeliveryError> {
    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => {
            let description = description.unwrap_or_else(|| "no description".to_string());
            error!("Telegram {} failed: {}", method, description);
            Err(DeliveryError::Api {
                method: method.to_string(),
                description,
            })
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        self.send_message(chat_id, text).await.map(|_| ())
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        TelegramClient::send_document(self, chat_id, file_name, bytes, caption)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(
            "https://api.telegram.org/",
            "123:abc",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.method_url(SEND_MESSAGE),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_unwrap_envelope() {
        let ok: ApiResponse<u32> = serde_json::from_str(r#"{"ok": true, "result": 7}"#).unwrap();
        assert_eq!(unwrap_envelope(SEND_MESSAGE, ok).unwrap(), 7);

        let rejected: ApiResponse<u32> = serde_json::from_str(
            r#"{"ok": false, "description": "Forbidden: bot was blocked by the user"}"#,
        )
        .unwrap();
        match unwrap_envelope(SEND_DOCUMENT, rejected) {
            Err(DeliveryError::Api { method, description }) => {
                assert_eq!(method, "sendDocument");
                assert!(description.starts_with("Forbidden"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_get_updates_payload() {
        let payload = GetUpdatesRequest {
            offset: None,
            timeout: 30,
            allowed_updates: vec!["message"],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("offset").is_none());
        assert_eq!(json["timeout"], 30);
    }
}
