//! Feed building: article bodies to excerpts, excerpts to RSS.

pub mod excerpt;
pub mod rss;

use crate::models::FeedConfig;

pub use excerpt::{ExcerptLimits, PLACEHOLDER};
pub use rss::{Channel, FeedItem, build_feed, items_from_articles};

impl From<&FeedConfig> for ExcerptLimits {
    fn from(config: &FeedConfig) -> Self {
        Self {
            max_paragraphs: config.max_paragraphs,
            max_paragraph_chars: config.max_paragraph_chars,
        }
    }
}

