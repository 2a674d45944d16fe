// src/pipeline/refresh.rs

//! One fetch → build → write → track cycle.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::feed::{Channel, ExcerptLimits, build_feed, items_from_articles};
use crate::models::Config;
use crate::pipeline::SeenDiff;
use crate::services::{ArticleSource, fetch_top_articles};
use crate::storage::local::ensure_parent;
use crate::storage::{FeedFile, StateStore};

/// Outcome of a successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Items written to the feed
    pub item_count: usize,
    /// Entries in the top listing
    pub listed: usize,
    /// Articles skipped because their body could not be fetched
    pub detail_failures: usize,
    /// Ids not in the seen-set before this cycle, in rank order
    pub new_ids: Vec<String>,
    /// Where the feed was written
    pub output: PathBuf,
}

/// Drives refresh cycles against a source, a feed file and a state store.
pub struct Refresher {
    config: Arc<Config>,
    source: Arc<dyn ArticleSource>,
    state: Arc<dyn StateStore>,
    feed_file: FeedFile,
}

impl Refresher {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn ArticleSource>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        let feed_file = FeedFile::new(&config.paths.output);
        Self {
            config,
            source,
            state,
            feed_file,
        }
    }

    pub fn feed_file(&self) -> &FeedFile {
        &self.feed_file
    }

    /// Create the output and state directories.
    ///
    /// Failing here is a startup error rather than a cycle error.
    pub async fn prepare(&self) -> Result<()> {
        ensure_parent(&self.config.paths.output).await?;
        ensure_parent(&self.config.paths.state_file).await?;
        Ok(())
    }

    /// Run one full cycle.
    ///
    /// Fetch and feed-write failures are returned; the previous feed file is
    /// left untouched. State-tracking failures are only logged.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let provider = &self.config.provider;
        let outcome = fetch_top_articles(
            self.source.as_ref(),
            provider.top_days,
            provider.limit,
            provider.max_concurrent,
        )
        .await?;

        let items = items_from_articles(&outcome.articles, ExcerptLimits::from(&self.config.feed));
        let xml = build_feed(&Channel::from(&self.config.feed), &items, Utc::now())?;
        self.feed_file.write(&xml).await?;
        log::info!(
            "Wrote RSS feed with {} items to {}",
            items.len(),
            self.feed_file.path().display()
        );

        let current_ids: Vec<String> = outcome.articles.iter().map(|a| a.id.clone()).collect();
        let new_ids = self.track(&current_ids).await;

        if new_ids.is_empty() {
            log::info!("No new articles. Feed refreshed.");
        } else {
            log::info!("Found {} new articles. Feed updated.", new_ids.len());
            for id in &new_ids {
                log::debug!("New article: {}", id);
            }
        }

        Ok(CycleReport {
            item_count: items.len(),
            listed: outcome.listed,
            detail_failures: outcome.detail_failures,
            new_ids,
            output: self.feed_file.path().to_path_buf(),
        })
    }

    /// Update the seen-set and return the ids it did not contain.
    async fn track(&self, current_ids: &[String]) -> Vec<String> {
        let mut state = match self.state.load().await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to load seen state: {}. Treating as empty.", e);
                Default::default()
            }
        };

        let diff = SeenDiff::compute(&state, current_ids);
        state.record(current_ids, Utc::now());

        if let Err(e) = self.state.save(&state).await {
            log::warn!("Failed to save seen state: {}", e);
        }
        diff.added
    }
}
