//! Single-writer access to the canonical state.

use std::sync::Arc;

use larder_engine::CanonicalState;
use tokio::sync::Mutex;

use super::{StateBackend, StoreError};

/// Owns the persisted canonical state.
///
/// Every read-modify-write goes through [`StoreGateway::update`], which holds
/// one async mutex from load until the save completes. Plain reads skip the
/// lock; backends guarantee they never see a half-written document.
pub struct StoreGateway {
    backend: Arc<dyn StateBackend>,
    write_lock: Mutex<()>,
}

impl StoreGateway {
    pub fn new(backend: Arc<dyn StateBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Where the state lives, for logs.
    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// Load the current state.
    ///
    /// An unreadable store yields an empty state. The substitute is not
    /// written back; the next successful update replaces the stored document.
    pub async fn read(&self) -> CanonicalState {
        match self.backend.load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    store = %self.backend.describe(),
                    error = %e,
                    "Failed to load state, using empty state"
                );
                CanonicalState::empty()
            }
        }
    }

    /// Run `f` against the current state and persist the result.
    ///
    /// The write section covers the load, `f`, and the save. If `f` fails
    /// nothing is written; if the save fails the stored document is unchanged.
    /// Dropping the returned future releases the section.
    pub async fn update<T, E, F>(&self, f: F) -> Result<(CanonicalState, T), E>
    where
        F: FnOnce(&mut CanonicalState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut state = self.read().await;
        let output = f(&mut state)?;

        self.backend.save(&state).await.map_err(|e| {
            tracing::error!(store = %self.backend.describe(), error = %e, "Failed to persist state");
            E::from(e)
        })?;

        Ok((state, output))
    }
}
