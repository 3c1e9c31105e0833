// src/errors.rs
//! Error taxonomy for the render → extract → format → send pipeline

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid browser launch options: {0}")]
    Options(String),

    #[error("failed to start browser: {0}")]
    Launch(String),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("failed to capture page markup: {0}")]
    Capture(String),

    #[error("page did not render within {0:?}")]
    Timeout(Duration),

    #[error("render worker stopped unexpectedly: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("listing #{index} has no title")]
    MissingTitle { index: usize },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to finish CSV buffer: {0}")]
    Buffer(String),

    #[error("export file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API rejected {method}: {description}")]
    Api { method: String, description: String },

    #[error("attachment could not be read: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("delivered {sent} of {total} messages before failing: {reason}")]
    Partial {
        sent: usize,
        total: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl PipelineError {
    /// Text shown to the chat user when an invocation fails
    pub fn user_message(&self) -> String {
        let stage = match self {
            PipelineError::Render(_) => "Could not load the job listings page",
            PipelineError::Extraction(_) => "Could not read the job listings",
            PipelineError::Export(_) => "Could not build the CSV file",
            PipelineError::Delivery(_) => "Could not deliver the results",
        };
        format!("⚠️ {}: {}", stage, self)
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_names_stage_and_reason() {
        let err = PipelineError::from(RenderError::Timeout(Duration::from_secs(60)));
        let msg = err.user_message();
        assert!(msg.starts_with("⚠️ Could not load the job listings page"));
        assert!(msg.contains("60s"));

        let err = PipelineError::from(ExtractionError::MissingTitle { index: 2 });
        assert_eq!(
            err.user_message(),
            "⚠️ Could not read the job listings: listing #2 has no title"
        );
    }

    #[test]
    fn test_partial_delivery_reports_counts() {
        let err = DeliveryError::Partial {
            sent: 1,
            total: 3,
            reason: "timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "delivered 1 of 3 messages before failing: timeout"
        );
    }
}
