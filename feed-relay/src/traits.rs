use crate::types::{DeliveryPayload, FeedItem, Result};
use async_trait::async_trait;

/// Trait for pulling items from a content feed
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Unique identifier for this feed source
    fn source_id(&self) -> String;

    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch the feed and return its items in feed order (newest first).
    /// Filtering against the watermark is the caller's job.
    async fn pull(&self) -> Result<Vec<FeedItem>>;
}

/// Existence check for a URL without transferring its body.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn probe(&self, url: &str) -> bool;
}

/// Destination that accepts a captioned image.
#[async_trait]
pub trait MessageSink: Send + Sync {
    fn destination(&self) -> String;

    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()>;
}
