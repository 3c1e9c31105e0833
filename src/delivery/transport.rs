// src/delivery/transport.rs
use crate::errors::DeliveryError;
use crate::types::ChatId;
use async_trait::async_trait;

/// Outbound side of the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError>;

    async fn send_document(
        &self,
        chat_id: ChatId,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), DeliveryError>;
}
