//! Storage backends for the canonical state document.

use futures::future::BoxFuture;
use larder_engine::CanonicalState;
use tokio::sync::RwLock;

/// Storage failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The stored state could not be read or decoded.
    #[error("State unavailable: {0}")]
    Unavailable(String),

    /// The new state could not be written.
    #[error("State write failed: {0}")]
    WriteFailed(String),

    /// The new state could not be serialized.
    #[error("State encode failed: {0}")]
    Encode(String),
}

/// A place the canonical state document lives.
///
/// Implementations only need whole-document load and save. Mutual exclusion
/// between writers is handled by [`StoreGateway`](super::StoreGateway).
pub trait StateBackend: Send + Sync {
    /// Load the full state.
    fn load(&self) -> BoxFuture<'_, Result<CanonicalState, StoreError>>;

    /// Replace the full state. Readers never observe a partial write.
    fn save<'a>(&'a self, state: &'a CanonicalState) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// In-process backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<CanonicalState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: CanonicalState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> BoxFuture<'_, Result<CanonicalState, StoreError>> {
        Box::pin(async move { Ok(self.state.read().await.clone()) })
    }

    fn save<'a>(&'a self, state: &'a CanonicalState) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            *self.state.write().await = state.clone();
            Ok(())
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
