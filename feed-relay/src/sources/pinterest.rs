use crate::sources::RssFeedSource;
use crate::traits::FeedSource;
use crate::types::{FeedItem, Result};
use crate::Fetcher;
use async_trait::async_trait;
use std::sync::Arc;

/// A single Pinterest board, read through its public RSS export
pub struct PinterestBoardSource {
    inner: RssFeedSource,
}

impl PinterestBoardSource {
    pub fn new(user: &str, board: &str, fetcher: Arc<Fetcher>) -> Self {
        let inner = RssFeedSource::new(Self::feed_url(user, board), fetcher)
            .with_title(format!("Pinterest: {}/{}", user, board));
        Self { inner }
    }

    pub fn feed_url(user: &str, board: &str) -> String {
        format!("https://www.pinterest.com/{}/{}.rss", user, board)
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

#[async_trait]
impl FeedSource for PinterestBoardSource {
    fn source_id(&self) -> String {
        format!("pinterest_{}", self.inner.feed_id)
    }

    fn source_name(&self) -> String {
        self.inner.source_name()
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        self.inner.pull().await
    }
}
