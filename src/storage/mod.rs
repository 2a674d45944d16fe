//! Storage for the two files the generator owns.
//!
//! ```text
//! devto_top_month.xml          # feed, replaced wholesale each cycle
//! devto_top_month_state.json   # seen-set, read-modify-write each cycle
//! ```
//!
//! Both are written to a sibling temp file and renamed into place, so a
//! reader never observes a partial file.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SeenState;

pub use local::{FeedFile, JsonStateStore, write_atomic};
pub use memory::MemoryStateStore;

/// Trait for seen-state backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted state. Missing or unreadable state is empty.
    async fn load(&self) -> Result<SeenState>;

    /// Persist the state, replacing what was there.
    async fn save(&self, state: &SeenState) -> Result<()>;
}
