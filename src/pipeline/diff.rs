//! New-article detection against the seen-set.
//!
//! Only feeds the "new articles" log line; the feed itself always mirrors
//! the latest fetch.

use std::collections::HashSet;

use crate::models::SeenState;

/// Ids of the current run split by whether they were seen before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenDiff {
    /// Never seen before, in current rank order
    pub added: Vec<String>,
    /// Already in the seen-set
    pub known: Vec<String>,
}

impl SeenDiff {
    /// Compare the current run's ids with the persisted state.
    pub fn compute(previous: &SeenState, current_ids: &[String]) -> Self {
        let mut diff = Self::default();
        let mut emitted = HashSet::new();

        for id in current_ids {
            if !emitted.insert(id.as_str()) {
                continue;
            }
            if previous.contains(id) {
                diff.known.push(id.clone());
            } else {
                diff.added.push(id.clone());
            }
        }
        diff
    }

    pub fn has_new(&self) -> bool {
        !self.added.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn state_with(values: &[&str]) -> SeenState {
        let mut state = SeenState::default();
        state.record(&ids(values), Utc::now());
        state
    }

    #[test]
    fn test_empty_state_all_new() {
        let diff = SeenDiff::compute(&SeenState::default(), &ids(&["a", "b"]));
        assert_eq!(diff.added, ids(&["a", "b"]));
        assert!(diff.known.is_empty());
        assert!(diff.has_new());
    }

    #[test]
    fn test_no_changes() {
        let diff = SeenDiff::compute(&state_with(&["a", "b"]), &ids(&["b", "a"]));
        assert!(!diff.has_new());
        assert_eq!(diff.known, ids(&["b", "a"]));
    }

    #[test]
    fn test_additions_keep_rank_order() {
        let diff = SeenDiff::compute(&state_with(&["b"]), &ids(&["c", "b", "a"]));
        assert_eq!(diff.added, ids(&["c", "a"]));
    }

    #[test]
    fn test_ids_dropped_from_top_are_not_reported() {
        // "old" fell out of the ranking; the seen-set still remembers it.
        let diff = SeenDiff::compute(&state_with(&["old", "x"]), &ids(&["x"]));
        assert!(diff.added.is_empty());
        assert_eq!(diff.known, ids(&["x"]));
    }

    #[test]
    fn test_duplicate_ids_counted_once() {
        let diff = SeenDiff::compute(&SeenState::default(), &ids(&["a", "a"]));
        assert_eq!(diff.added, ids(&["a"]));
    }
}
