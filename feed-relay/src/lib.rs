pub mod config;
pub mod fetcher;
pub mod hand_off;
pub mod novelty;
pub mod parser;
pub mod pipeline;
pub mod poller;
pub mod prober;
pub mod rss_utils;
pub mod sender;
pub mod sources;
pub mod telegram;
pub mod traits;
pub mod types;
pub mod watermark;

pub use config::{FeedSpec, PacingConfig, RelayConfig};
pub use fetcher::Fetcher;
pub use novelty::NoveltyFilter;
pub use parser::FeedParser;
pub use pipeline::{PipelineBuilder, PipelineHandle, RelayPipeline};
pub use poller::Poller;
pub use prober::ResolutionProber;
pub use sender::Sender;
pub use sources::{DeviantArtSource, PinterestBoardSource, RssFeedSource};
pub use telegram::TelegramSink;
pub use traits::{FeedSource, MessageSink, ProbeTransport};
pub use types::*;
pub use watermark::WatermarkStore;
