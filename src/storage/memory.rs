//! In-memory state backend.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::SeenState;
use crate::storage::StateStore;

/// Keeps the seen-state in process memory.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<SeenState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SeenState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Drop everything, as if the state file were deleted.
    pub async fn clear(&self) {
        *self.state.lock().await = SeenState::default();
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<SeenState> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &SeenState) -> Result<()> {
        *self.state.lock().await = state.clone();
        Ok(())
    }
}
