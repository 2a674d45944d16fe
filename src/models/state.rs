//! Persisted record of previously observed article ids.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::article::deserialize_ids;

/// Cumulative seen-set, stored as JSON between runs.
///
/// `seen_ids` only ever grows. `latest_ids` is the most recent run in rank
/// order. Files that only carry `latest_ids` still load; those ids count as
/// seen. Ids may be stored as JSON numbers or strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenState {
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub seen_ids: BTreeSet<String>,

    #[serde(default, deserialize_with = "deserialize_ids")]
    pub latest_ids: Vec<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeenState {
    /// Fold ids from the legacy `latest_ids` field into the seen-set.
    pub fn normalized(mut self) -> Self {
        self.seen_ids.extend(self.latest_ids.iter().cloned());
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// Record the current run's ids.
    pub fn record(&mut self, current_ids: &[String], now: DateTime<Utc>) {
        self.seen_ids.extend(current_ids.iter().cloned());
        self.latest_ids = current_ids.to_vec();
        self.updated_at = Some(now);
    }
}
