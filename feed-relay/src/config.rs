use crate::prober::DEFAULT_RESOLUTIONS;
use crate::rss_utils::url::is_valid_rss_url;
use crate::sources::{DeviantArtSource, PinterestBoardSource, RssFeedSource};
use crate::traits::FeedSource;
use crate::types::{FetchConfig, RelayError, Result};
use crate::watermark::DEFAULT_STATE_FILE;
use crate::Fetcher;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// One configured feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSpec {
    Rss(String),
    PinterestBoard { user: String, board: String },
    DeviantArt(String),
}

impl FeedSpec {
    /// Parse a `user/board` pair
    pub fn pinterest(spec: &str) -> Result<Self> {
        let (user, board) = spec
            .trim()
            .trim_matches('/')
            .split_once('/')
            .filter(|(u, b)| !u.is_empty() && !b.is_empty() && !b.contains('/'))
            .ok_or_else(|| RelayError::Config(format!("expected user/board, got {:?}", spec)))?;
        Ok(Self::PinterestBoard {
            user: user.to_string(),
            board: board.to_string(),
        })
    }

    pub fn url(&self) -> String {
        match self {
            Self::Rss(url) => url.clone(),
            Self::PinterestBoard { user, board } => PinterestBoardSource::feed_url(user, board),
            Self::DeviantArt(artist) => DeviantArtSource::feed_url(artist),
        }
    }

    pub fn into_source(self, fetcher: Arc<Fetcher>) -> Box<dyn FeedSource> {
        match self {
            Self::Rss(url) => Box::new(RssFeedSource::new(url, fetcher)),
            Self::PinterestBoard { user, board } => Box::new(PinterestBoardSource::new(&user, &board, fetcher)),
            Self::DeviantArt(artist) => Box::new(DeviantArtSource::for_artist(&artist, fetcher)),
        }
    }
}

/// Random pause between two deliveries, in whole seconds, `min_secs..max_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl PacingConfig {
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Draw the next pause. Falls back to `min_secs` if the range is empty.
    pub fn next_pause(&self) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs(self.min_secs);
        }
        let secs = rand::rng().random_range(self.min_secs..self.max_secs);
        Duration::from_secs(secs)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_secs: 5,
            max_secs: 30,
        }
    }
}

/// Everything the relay needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub feeds: Vec<FeedSpec>,
    pub chat_id: i64,
    pub state_file: PathBuf,
    pub poll_interval: Duration,
    pub pacing: PacingConfig,
    pub resolutions: Vec<String>,
    pub fetch: FetchConfig,
}

impl RelayConfig {
    pub fn new(feeds: Vec<FeedSpec>, chat_id: i64) -> Self {
        Self {
            feeds,
            chat_id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(RelayError::Config("no feeds configured".to_string()));
        }
        if let Some(bad) = self.feeds.iter().map(FeedSpec::url).find(|u| !is_valid_rss_url(u)) {
            return Err(RelayError::Config(format!("invalid feed URL: {}", bad)));
        }
        if self.poll_interval.is_zero() {
            return Err(RelayError::Config("poll interval must be positive".to_string()));
        }
        if self.pacing.min_secs >= self.pacing.max_secs {
            return Err(RelayError::Config(format!(
                "pause range {}..{}s is empty",
                self.pacing.min_secs, self.pacing.max_secs
            )));
        }
        if self.resolutions.is_empty() {
            return Err(RelayError::Config("no resolution tags configured".to_string()));
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            chat_id: 0,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            poll_interval: Duration::from_secs(10 * 60),
            pacing: PacingConfig::default(),
            resolutions: DEFAULT_RESOLUTIONS.iter().map(|r| r.to_string()).collect(),
            fetch: FetchConfig::default(),
        }
    }
}
