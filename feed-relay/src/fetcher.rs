use crate::traits::ProbeTransport;
use crate::types::{FetchConfig, RelayError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Shared HTTP client for feed downloads and image probes. Never retries.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Download a feed document and return its body.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RelayError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(RelayError::FeedTooLarge { size_mb });
            }
        }

        let content = response.text().await?;

        // Chunked responses carry no content length, so check again after reading.
        let size_mb = content.len() / (1024 * 1024);
        if size_mb > self.config.max_feed_size_mb {
            return Err(RelayError::FeedTooLarge { size_mb });
        }

        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }

    /// HEAD request; only a plain 200 counts as "exists".
    pub async fn head_ok(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                debug!("HEAD {} -> {}", url, response.status());
                response.status() == StatusCode::OK
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

#[async_trait]
impl ProbeTransport for Fetcher {
    async fn probe(&self, url: &str) -> bool {
        self.head_ok(url).await
    }
}
