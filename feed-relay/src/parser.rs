use crate::rss_utils::feed::first_image_src;
use crate::types::{FeedItem, ParsedFeed, RelayError, Result};
use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| RelayError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let total = feed.entries.len();
        let items: Vec<FeedItem> = feed.entries.into_iter().filter_map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries ({} kept)", total, items.len());

        Ok(ParsedFeed { title, items })
    }

    fn parse_entry(entry: Entry) -> Option<FeedItem> {
        // Entries without a link can't be captioned, so they are dropped here
        let link = entry.links.first()?.href.clone();
        let published_at = entry.published.or(entry.updated);
        let image_url = Self::find_image(&entry);

        Some(FeedItem {
            published_at,
            link,
            image_url,
        })
    }

    /// Media RSS first, then whatever `<img>` the description embeds.
    fn find_image(entry: &Entry) -> Option<String> {
        for media in &entry.media {
            if let Some(thumbnail) = media.thumbnails.first() {
                return Some(thumbnail.image.uri.clone());
            }
            for content in &media.content {
                let Some(url) = &content.url else { continue };
                let is_image = content
                    .content_type
                    .as_ref()
                    .map(|m| m.as_str().starts_with("image/"))
                    .unwrap_or_else(|| looks_like_image(url.as_str()));
                if is_image {
                    return Some(url.to_string());
                }
            }
        }

        let summary = entry.summary.as_ref().map(|s| s.content.as_str());
        let body = entry.content.as_ref().and_then(|c| c.body.as_deref());

        summary
            .and_then(first_image_src)
            .or_else(|| body.and_then(first_image_src))
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_image(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    [".jpg", ".jpeg", ".png", ".gif", ".webp"]
        .iter()
        .any(|ext| path.ends_with(ext))
}
