//! Service layer: talking to the content provider.
//!
//! - Top-list and article body fetching (`DevToClient`, `fetch_top_articles`)

mod articles;

pub use articles::{ArticleSource, DevToClient, FetchOutcome, fetch_top_articles};
