use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry read from a feed.
///
/// Entries without a publish time or without an image are kept here as read;
/// the novelty filter is what drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub published_at: Option<DateTime<Utc>>,
    pub link: String,
    pub image_url: Option<String>,
}

impl FeedItem {
    pub fn new(published_at: Option<DateTime<Utc>>, link: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            published_at,
            link: link.into(),
            image_url,
        }
    }

    /// True when the item carries everything delivery needs.
    pub fn is_usable(&self) -> bool {
        self.published_at.is_some() && self.image_url.is_some()
    }
}

/// What the sender hands to the messaging sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPayload {
    pub caption: String,
    pub image_url: String,
}

impl DeliveryPayload {
    /// Builds the `[src](link)` caption for an item, pointing at the given image.
    pub fn for_item(link: &str, image_url: impl Into<String>) -> Self {
        Self {
            caption: format!("[src]({})", escape_link_target(link)),
            image_url: image_url.into(),
        }
    }
}

// Inside a MarkdownV2 link target only ')' and '\' need escaping.
fn escape_link_target(link: &str) -> String {
    let mut escaped = String::with_capacity(link.len());
    for c in link.chars() {
        if c == ')' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Feed-Relay/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delivery error: {0}")]
    Delivery(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hand-off queue closed")]
    HandOffClosed,

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
