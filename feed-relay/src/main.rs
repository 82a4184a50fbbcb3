use anyhow::Context;
use clap::Parser;
use feed_relay::watermark::DEFAULT_STATE_FILE;
use feed_relay::{
    FeedSpec, FetchConfig, Fetcher, PacingConfig, PipelineBuilder, RelayConfig, ResolutionProber, TelegramSink,
    WatermarkStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Relays new images from RSS feeds into a Telegram chat
#[derive(Parser, Debug)]
#[command(name = "feed-relay", version)]
struct Cli {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Chat that receives the posts
    #[arg(long, env = "CHAT_ID", allow_negative_numbers = true)]
    chat_id: i64,

    /// Plain RSS/Atom feed URL (repeatable)
    #[arg(long = "feed", env = "FEED_URLS", value_delimiter = ',')]
    feeds: Vec<String>,

    /// Pinterest board as user/board (repeatable)
    #[arg(long = "pinterest-board", env = "PINTEREST_BOARDS", value_delimiter = ',')]
    pinterest_boards: Vec<String>,

    /// DeviantArt artist whose gallery is followed (repeatable)
    #[arg(long = "deviantart", env = "DEVIANTART_ARTISTS", value_delimiter = ',')]
    deviantart_artists: Vec<String>,

    /// Where the last poll timestamp is kept
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    #[arg(long, default_value_t = 600)]
    poll_interval_secs: u64,

    #[arg(long, default_value_t = 5)]
    min_pause_secs: u64,

    #[arg(long, default_value_t = 30)]
    max_pause_secs: u64,

    #[arg(long, default_value = "Feed-Relay/1.0")]
    user_agent: String,

    /// HTTP timeout for feed downloads and image probes
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Cli {
    fn to_config(&self) -> feed_relay::Result<RelayConfig> {
        let mut feeds: Vec<FeedSpec> = self.feeds.iter().map(|url| FeedSpec::Rss(url.trim().to_string())).collect();
        for board in &self.pinterest_boards {
            feeds.push(FeedSpec::pinterest(board)?);
        }
        feeds.extend(
            self.deviantart_artists
                .iter()
                .map(|artist| FeedSpec::DeviantArt(artist.trim().to_string())),
        );

        Ok(RelayConfig {
            feeds,
            chat_id: self.chat_id,
            state_file: self.state_file.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            pacing: PacingConfig::new(self.min_pause_secs, self.max_pause_secs),
            fetch: FetchConfig {
                user_agent: self.user_agent.clone(),
                timeout_seconds: self.timeout_secs,
                ..FetchConfig::default()
            },
            ..RelayConfig::default()
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine, the variables may come from the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.to_config()?;
    config.validate()?;

    info!(
        "Starting feed relay: {} feeds -> chat {}, state in {}",
        config.feeds.len(),
        config.chat_id,
        config.state_file.display()
    );

    let sink = TelegramSink::connect(&cli.bot_token, config.chat_id)
        .await
        .context("failed to establish bot session")?;

    let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
    let prober = ResolutionProber::new(fetcher.clone()).with_resolutions(config.resolutions.clone());

    let mut builder = PipelineBuilder::new()
        .watermark_store(WatermarkStore::new(config.state_file.clone()))
        .prober(prober)
        .sink(Arc::new(sink))
        .poll_interval(config.poll_interval)
        .pacing(config.pacing);
    for feed in config.feeds {
        builder = builder.add_source(feed.into_source(fetcher.clone()));
    }

    let handle = builder.build()?.start(CancellationToken::new());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    handle.shutdown().await;

    info!("Feed relay finished");
    Ok(())
}
