use crate::types::FeedItem;
use chrono::{DateTime, Datelike, Utc};

/// Picks the items of one feed that are newer than the watermark.
///
/// Feeds are read newest first, so scanning stops early: once more than
/// `max_items` have been taken, or once an item from a previous calendar year
/// has been looked at.
#[derive(Debug, Clone)]
pub struct NoveltyFilter {
    max_items: usize,
}

impl NoveltyFilter {
    pub const DEFAULT_MAX_ITEMS: usize = 10;

    pub fn new() -> Self {
        Self {
            max_items: Self::DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_max_items(max_items: usize) -> Self {
        Self { max_items }
    }

    pub fn select_new(&self, items: Vec<FeedItem>, watermark: DateTime<Utc>) -> Vec<FeedItem> {
        self.select_new_in_year(items, watermark, Utc::now().year())
    }

    /// Same as [`select_new`](Self::select_new) with the current year supplied by the caller.
    pub fn select_new_in_year(
        &self,
        items: Vec<FeedItem>,
        watermark: DateTime<Utc>,
        current_year: i32,
    ) -> Vec<FeedItem> {
        let mut selected = Vec::new();

        for item in items {
            // Unusable items never reach the stop checks below
            let Some(published_at) = item.published_at else { continue };
            if item.image_url.is_none() {
                continue;
            }

            if published_at > watermark {
                selected.push(item);
            }

            if selected.len() > self.max_items || published_at.year() < current_year {
                break;
            }
        }

        selected
    }
}

impl Default for NoveltyFilter {
    fn default() -> Self {
        Self::new()
    }
}
