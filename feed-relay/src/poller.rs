use crate::hand_off::HandOffSender;
use crate::novelty::NoveltyFilter;
use crate::rss_utils::time::format_duration;
use crate::traits::FeedSource;
use crate::types::FeedItem;
use crate::watermark::WatermarkStore;
use chrono::Utc;
use rand::seq::SliceRandom;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Producer side of the relay: polls every feed on a timer and hands new items
/// to the sender one at a time.
pub struct Poller {
    sources: Vec<Box<dyn FeedSource>>,
    store: WatermarkStore,
    filter: NoveltyFilter,
    hand_off: HandOffSender<FeedItem>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        sources: Vec<Box<dyn FeedSource>>,
        store: WatermarkStore,
        hand_off: HandOffSender<FeedItem>,
        interval: Duration,
    ) -> Self {
        Self {
            sources,
            store,
            filter: NoveltyFilter::new(),
            hand_off,
            interval,
        }
    }

    pub fn with_filter(mut self, filter: NoveltyFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run until cancelled. The first cycle starts one interval after launch.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "Started feed poller: {} sources every {}",
            self.sources.len(),
            format_duration(self.interval)
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let batch = self.poll_cycle().await;
            if !self.dispatch(batch, &cancel).await {
                break;
            }
        }

        info!("Feed poller stopped");
    }

    /// One poll cycle: load the watermark, collect new items from every source,
    /// advance the watermark to the cycle time (or keep it, if it is already
    /// later) and return the shuffled batch.
    pub async fn poll_cycle(&self) -> Vec<FeedItem> {
        let cycle_time = Utc::now();
        let watermark = self.store.load().await;
        info!("Polling {} feeds (watermark {})", self.sources.len(), watermark.to_rfc3339());

        let mut batch = Vec::new();
        for source in &self.sources {
            match source.pull().await {
                Ok(items) => {
                    let new_items = self.filter.select_new(items, watermark);
                    info!("Got {} new items from {}", new_items.len(), source.source_name());
                    batch.extend(new_items);
                }
                Err(e) => {
                    error!("Couldn't get new items from {}: {}", source.source_name(), e);
                }
            }
        }

        // Never step back, even if the clock did
        self.store.save(cycle_time.max(watermark)).await;

        // Keep consecutive posts from landing grouped by feed
        batch.shuffle(&mut rand::rng());
        batch
    }

    /// Push a batch through the hand-off. Returns false when the relay should stop.
    async fn dispatch(&self, batch: Vec<FeedItem>, cancel: &CancellationToken) -> bool {
        let total = batch.len();
        for (index, item) in batch.into_iter().enumerate() {
            debug!("Handing off item {}/{}: {}", index + 1, total, item.link);
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!("Cancelled with {} items not handed off", total - index);
                    return false;
                }
                pushed = self.hand_off.push(item) => {
                    if let Err(e) = pushed {
                        warn!("Sender is gone, dropping {} items: {}", total - index, e);
                        return false;
                    }
                }
            }
        }
        true
    }
}
