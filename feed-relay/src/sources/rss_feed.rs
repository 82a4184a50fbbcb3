use crate::traits::FeedSource;
use crate::types::{FeedItem, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Generic RSS/Atom feed source
pub struct RssFeedSource {
    pub feed_id: Uuid,
    pub url: String,
    pub title: Option<String>,
    fetcher: Arc<Fetcher>,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(url: impl Into<String>, fetcher: Arc<Fetcher>) -> Self {
        Self {
            feed_id: Uuid::new_v4(),
            url: url.into(),
            title: None,
            fetcher,
            parser: FeedParser::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_id(&self) -> String {
        format!("rss_{}", self.feed_id)
    }

    fn source_name(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            // Extract domain name from URL as fallback
            match crate::rss_utils::url::extract_domain(&self.url) {
                Some(domain) => format!("RSS Feed ({})", domain),
                None => "RSS Feed".to_string(),
            }
        })
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        debug!("Pulling RSS feed: {}", self.url);

        let content = self.fetcher.fetch_feed(&self.url).await?;
        let parsed_feed = self.parser.parse_feed(&content)?;

        info!(
            "Pulled {} items from {} ({})",
            parsed_feed.items.len(),
            parsed_feed.title.as_deref().unwrap_or("untitled"),
            self.url
        );
        Ok(parsed_feed.items)
    }
}
