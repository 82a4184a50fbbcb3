use crate::sources::RssFeedSource;
use crate::traits::FeedSource;
use crate::types::{FeedItem, Result};
use crate::Fetcher;
use async_trait::async_trait;
use std::sync::Arc;

/// All deviations of one DeviantArt artist, newest first
pub struct DeviantArtSource {
    inner: RssFeedSource,
}

impl DeviantArtSource {
    pub fn for_artist(username: &str, fetcher: Arc<Fetcher>) -> Self {
        let inner = RssFeedSource::new(Self::feed_url(username), fetcher)
            .with_title(format!("DeviantArt: {}", username));
        Self { inner }
    }

    pub fn feed_url(username: &str) -> String {
        format!(
            "https://backend.deviantart.com/rss.xml?type=deviation&q=by%3A{}+sort%3Atime+meta%3Aall",
            username
        )
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

#[async_trait]
impl FeedSource for DeviantArtSource {
    fn source_id(&self) -> String {
        format!("deviantart_{}", self.inner.feed_id)
    }

    fn source_name(&self) -> String {
        self.inner.source_name()
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        self.inner.pull().await
    }
}
