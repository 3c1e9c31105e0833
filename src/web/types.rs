// src/web/types.rs
use rocket::serde::{Deserialize, Serialize};

/// Managed state read by the webhook guard
pub struct WebhookSettings {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
        }
    }
}
