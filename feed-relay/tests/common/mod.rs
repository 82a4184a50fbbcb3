#![allow(dead_code)]

// Shared fakes for the relay tests
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use feed_relay::{DeliveryPayload, FeedItem, FeedSource, MessageSink, ProbeTransport, RelayError, Result};
use std::collections::HashSet;
use std::sync::{Mutex, Once};
use tokio::sync::mpsc;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Usable item published `secs_ago` seconds before now
pub fn recent_item(link: &str, secs_ago: i64) -> FeedItem {
    item_at(link, Utc::now() - Duration::seconds(secs_ago))
}

pub fn item_at(link: &str, published_at: DateTime<Utc>) -> FeedItem {
    FeedItem::new(
        Some(published_at),
        link,
        Some(format!("https://i.example.com/236x/{}.jpg", link.rsplit('/').next().unwrap_or("x"))),
    )
}

/// Feed that always returns the same items
pub struct StaticSource {
    pub name: String,
    pub items: Vec<FeedItem>,
}

impl StaticSource {
    pub fn new(name: &str, items: Vec<FeedItem>) -> Self {
        Self {
            name: name.to_string(),
            items,
        }
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    fn source_id(&self) -> String {
        format!("static_{}", self.name)
    }

    fn source_name(&self) -> String {
        self.name.clone()
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        Ok(self.items.clone())
    }
}

/// Feed whose fetch always fails
pub struct FailingSource;

#[async_trait]
impl FeedSource for FailingSource {
    fn source_id(&self) -> String {
        "failing".to_string()
    }

    fn source_name(&self) -> String {
        "failing".to_string()
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        Err(RelayError::Parse("not a feed".to_string()))
    }
}

/// Probe transport that only knows a fixed set of URLs and records every probe
#[derive(Default)]
pub struct ScriptedTransport {
    existing: HashSet<String>,
    probes: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn with_existing(urls: &[&str]) -> Self {
        Self {
            existing: urls.iter().map(|u| u.to_string()).collect(),
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProbeTransport for ScriptedTransport {
    async fn probe(&self, url: &str) -> bool {
        self.probes.lock().unwrap().push(url.to_string());
        self.existing.contains(url)
    }
}

/// Probe transport whose requests never complete
pub struct StalledTransport;

#[async_trait]
impl ProbeTransport for StalledTransport {
    async fn probe(&self, _url: &str) -> bool {
        std::future::pending().await
    }
}

/// A delivery as seen by the recording sink
#[derive(Debug, Clone)]
pub struct Delivery {
    pub payload: DeliveryPayload,
    pub at: tokio::time::Instant,
    pub succeeded: bool,
}

/// Sink that records every attempt and can be told to fail for given captions
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<Delivery>,
    failing_links: HashSet<String>,
}

impl RecordingSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                failing_links: HashSet::new(),
            },
            rx,
        )
    }

    pub fn failing_for(mut self, links: &[&str]) -> Self {
        self.failing_links = links.iter().map(|l| l.to_string()).collect();
        self
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    fn destination(&self) -> String {
        "test-chat".to_string()
    }

    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()> {
        let fail = self
            .failing_links
            .iter()
            .any(|link| payload.caption == format!("[src]({})", link));
        let _ = self.tx.send(Delivery {
            payload: payload.clone(),
            at: tokio::time::Instant::now(),
            succeeded: !fail,
        });
        if fail {
            return Err(RelayError::General("chat unavailable".to_string()));
        }
        Ok(())
    }
}
