//! JSON file backend.

use std::io;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use larder_engine::CanonicalState;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{StateBackend, StoreError};

/// Stores the canonical state as one JSON document on disk.
///
/// Writes go to a sibling temp file which is fsynced and renamed over the
/// target, so a reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Open the backend at `path`, creating parent directories and an empty
    /// state document if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backend = Self { path: path.into() };

        if let Some(parent) = backend.parent_dir() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::WriteFailed(backend.io_context("create directory", e)))?;
        }

        let exists = fs::try_exists(&backend.path)
            .await
            .map_err(|e| StoreError::Unavailable(backend.io_context("stat", e)))?;

        if !exists {
            tracing::info!(path = %backend.path.display(), "Initializing empty state file");
            backend.write_atomic(&CanonicalState::empty()).await?;
        }

        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    fn io_context(&self, action: &str, err: io::Error) -> String {
        format!("{} {}: {}", action, self.path.display(), err)
    }

    async fn read_state(&self) -> Result<CanonicalState, StoreError> {
        let contents = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Unavailable(self.io_context("read", e)))?;

        CanonicalState::from_json(&contents)
            .map_err(|e| StoreError::Unavailable(format!("decode {}: {}", self.path.display(), e)))
    }

    async fn write_atomic(&self, state: &CanonicalState) -> Result<(), StoreError> {
        let data = state
            .to_json_pretty()
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        let temp_path = self.temp_path();

        let write = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);

            // Atomic rename
            fs::rename(&temp_path, &self.path).await?;
            self.sync_directory().await
        };

        if let Err(e) = write.await {
            // Best effort; the target is untouched either way.
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::WriteFailed(self.io_context("write", e)));
        }

        Ok(())
    }

    #[cfg(unix)]
    async fn sync_directory(&self) -> io::Result<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        fs::File::open(dir).await?.sync_all().await
    }

    #[cfg(not(unix))]
    async fn sync_directory(&self) -> io::Result<()> {
        Ok(())
    }
}

impl StateBackend for FileBackend {
    fn load(&self) -> BoxFuture<'_, Result<CanonicalState, StoreError>> {
        Box::pin(self.read_state())
    }

    fn save<'a>(&'a self, state: &'a CanonicalState) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.write_atomic(state))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
