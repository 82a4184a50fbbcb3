use crate::config::PacingConfig;
use crate::hand_off;
use crate::novelty::NoveltyFilter;
use crate::poller::Poller;
use crate::prober::ResolutionProber;
use crate::sender::Sender;
use crate::traits::{FeedSource, MessageSink};
use crate::types::{RelayError, Result};
use crate::watermark::WatermarkStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Poller and sender, connected by a rendezvous hand-off
pub struct RelayPipeline {
    poller: Poller,
    sender: Sender,
}

impl RelayPipeline {
    pub fn new(poller: Poller, sender: Sender) -> Self {
        Self { poller, sender }
    }

    /// Spawn both loops. Cancelling `cancel` (or calling
    /// [`PipelineHandle::shutdown`]) stops them.
    pub fn start(self, cancel: CancellationToken) -> PipelineHandle {
        info!("Starting relay pipeline with {} sources", self.poller.source_count());

        let poller = tokio::spawn(self.poller.run(cancel.child_token()));
        let sender = tokio::spawn(self.sender.run(cancel.child_token()));

        PipelineHandle {
            cancel,
            poller,
            sender,
        }
    }
}

pub struct PipelineHandle {
    cancel: CancellationToken,
    poller: JoinHandle<()>,
    sender: JoinHandle<()>,
}

impl PipelineHandle {
    /// Stop both loops and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Stopping relay pipeline");
        self.cancel.cancel();
        self.join().await;
    }

    /// Wait for both loops without cancelling them.
    pub async fn join(self) {
        if let Err(e) = self.poller.await {
            error!("Poller task failed: {}", e);
        }
        if let Err(e) = self.sender.await {
            error!("Sender task failed: {}", e);
        }
    }
}

/// Pipeline builder for easier configuration
pub struct PipelineBuilder {
    sources: Vec<Box<dyn FeedSource>>,
    store: WatermarkStore,
    filter: NoveltyFilter,
    prober: Option<ResolutionProber>,
    sink: Option<Arc<dyn MessageSink>>,
    poll_interval: Duration,
    pacing: PacingConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            store: WatermarkStore::default(),
            filter: NoveltyFilter::new(),
            prober: None,
            sink: None,
            poll_interval: Duration::from_secs(10 * 60),
            pacing: PacingConfig::default(),
        }
    }

    pub fn add_source(mut self, source: Box<dyn FeedSource>) -> Self {
        info!("Adding source to pipeline: {}", source.source_name());
        self.sources.push(source);
        self
    }

    pub fn watermark_store(mut self, store: WatermarkStore) -> Self {
        self.store = store;
        self
    }

    pub fn novelty_filter(mut self, filter: NoveltyFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn prober(mut self, prober: ResolutionProber) -> Self {
        self.prober = Some(prober);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn build(self) -> Result<RelayPipeline> {
        let prober = self
            .prober
            .ok_or_else(|| RelayError::Config("pipeline needs a resolution prober".to_string()))?;
        let sink = self
            .sink
            .ok_or_else(|| RelayError::Config("pipeline needs a message sink".to_string()))?;

        let (tx, rx) = hand_off::channel();
        let poller = Poller::new(self.sources, self.store, tx, self.poll_interval).with_filter(self.filter);
        let sender = Sender::new(rx, prober, sink, self.pacing);

        Ok(RelayPipeline::new(poller, sender))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
