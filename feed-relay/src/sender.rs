use crate::config::PacingConfig;
use crate::hand_off::HandOffReceiver;
use crate::prober::ResolutionProber;
use crate::rss_utils::{time::format_duration, url::author_from_link};
use crate::traits::MessageSink;
use crate::types::{DeliveryPayload, FeedItem};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Consumer side of the relay: delivers one item, then waits a random pause.
pub struct Sender {
    items: HandOffReceiver<FeedItem>,
    prober: ResolutionProber,
    sink: Arc<dyn MessageSink>,
    pacing: PacingConfig,
}

impl Sender {
    pub fn new(
        items: HandOffReceiver<FeedItem>,
        prober: ResolutionProber,
        sink: Arc<dyn MessageSink>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            items,
            prober,
            sink,
            pacing,
        }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Started sender for {}", self.sink.destination());

        loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => break,
                item = self.items.pop() => item,
            };
            let Some(item) = item else {
                info!("Hand-off closed");
                break;
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!("Cancelled while delivering {}", item.link);
                    break;
                }
                _ = self.deliver(&item) => {}
            }

            let pause = self.pacing.next_pause();
            info!("Posted {} - sleeping for {}", item.link, format_duration(pause));
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("Sender stopped");
    }

    /// Upgrade the image and send the item. Failures are logged, never returned.
    pub async fn deliver(&self, item: &FeedItem) {
        let Some(thumbnail) = item.image_url.as_deref() else {
            warn!("Skipping {}: no image", item.link);
            return;
        };

        let image_url = self.prober.upgrade(thumbnail).await;
        let payload = DeliveryPayload::for_item(&item.link, image_url);

        match self.sink.deliver(&payload).await {
            Ok(()) => info!(
                "Delivered {} by {} to {}",
                item.link,
                author_from_link(&item.link).as_deref().unwrap_or("unknown"),
                self.sink.destination()
            ),
            Err(e) => error!("Failed to deliver {}: {}", item.link, e),
        }
    }
}
