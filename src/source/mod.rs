// src/source/mod.rs
pub mod memory;
pub mod twilio;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::InMemorySource;
pub use twilio::TwilioSource;

/// Inbound message exactly as the provider hands it over, before
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSms {
    pub sid: String,
    pub body: Option<String>,
    pub from: Option<String>,
    pub date_sent: Option<DateTime<Utc>>,
    /// Declared attachment count. Advisory only; the media listing is the
    /// authoritative bound.
    pub num_media: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("message source transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("message source rejected the request ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected message source payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("message source unavailable: {0}")]
    Unavailable(String),
}

/// A remote store of pending inbound messages with list, media-fetch and
/// delete capabilities. `list` order is provider-defined and preserved
/// downstream.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Pending messages addressed to `to`.
    async fn list(&self, to: &str) -> Result<Vec<InboundSms>, SourceError>;

    /// Media URIs attached to one message. Only called when the message
    /// declares a nonzero media count; may legitimately return fewer URIs
    /// than declared.
    async fn media_uris(&self, message_sid: &str) -> Result<Vec<String>, SourceError>;

    /// Best-effort acknowledgment; a deleted message is not listed again.
    async fn delete(&self, message_sid: &str) -> Result<(), SourceError>;

    fn name(&self) -> &'static str;
}
