pub mod deviantart;
pub mod pinterest;
pub mod rss_feed;

pub use deviantart::DeviantArtSource;
pub use pinterest::PinterestBoardSource;
pub use rss_feed::RssFeedSource;
