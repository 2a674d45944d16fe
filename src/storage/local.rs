//! Local filesystem storage.
//!
//! ## Features
//!
//! - **Atomic replace**: write to `<name>.tmp`, flush, rename over `<name>`
//! - **Fail open**: a missing or corrupt state file loads as empty state

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::SeenState;
use crate::storage::StateStore;

/// Ensure the parent directory of `path` exists.
pub async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Sibling temp path used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes atomically (write to temp, then rename).
///
/// The temp file is removed if any step after creating it fails.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path).await?;

    let tmp = temp_path(path);
    let result = write_and_rename(&tmp, path, bytes).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(tmp, path).await?;
    Ok(())
}

/// The RSS output file.
#[derive(Debug, Clone)]
pub struct FeedFile {
    path: PathBuf,
}

impl FeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the feed with `xml`.
    pub async fn write(&self, xml: &str) -> Result<()> {
        write_atomic(&self.path, xml.as_bytes()).await
    }

    /// Read the current feed, `None` if none has been written yet.
    pub async fn read(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Seen-state persisted as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<SeenState> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No state file at {}, starting fresh", self.path.display());
                return Ok(SeenState::default());
            }
            Err(e) => {
                log::warn!(
                    "Cannot read state file {}: {}. Treating as empty.",
                    self.path.display(),
                    e
                );
                return Ok(SeenState::default());
            }
        };

        match serde_json::from_slice::<SeenState>(&bytes) {
            Ok(state) => Ok(state.normalized()),
            Err(e) => {
                log::warn!(
                    "Corrupt state file {}: {}. Treating as empty.",
                    self.path.display(),
                    e
                );
                Ok(SeenState::default())
            }
        }
    }

    async fn save(&self, state: &SeenState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        write_atomic(&self.path, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let feed = FeedFile::new(tmp.path().join("feed.xml"));

        feed.write("<rss/>").await.unwrap();
        let data = feed.read().await.unwrap();
        assert_eq!(data, Some(b"<rss/>".to_vec()));
        assert!(!tmp.path().join("feed.xml.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let feed = FeedFile::new(tmp.path().join("nope.xml"));

        assert!(feed.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/deeper/feed.xml");

        write_atomic(&path, b"x").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_file() {
        let tmp = TempDir::new().unwrap();
        let feed = FeedFile::new(tmp.path().join("feed.xml"));

        feed.write("a much longer first version").await.unwrap();
        feed.write("short").await.unwrap();
        assert_eq!(feed.read().await.unwrap(), Some(b"short".to_vec()));
    }

    #[tokio::test]
    async fn test_state_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));

        let mut state = SeenState::default();
        state.record(&["1".to_string(), "2".to_string()], Utc::now());
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_missing_state_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("absent.json"));

        assert_eq!(store.load().await.unwrap(), SeenState::default());
    }

    #[tokio::test]
    async fn test_corrupt_state_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStateStore::new(&path);
        assert_eq!(store.load().await.unwrap(), SeenState::default());
    }

    #[tokio::test]
    async fn test_legacy_numeric_state_loads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"latest_ids": [1234, 5678], "updated_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let state = JsonStateStore::new(&path).load().await.unwrap();
        assert!(state.contains("1234"));
        assert!(state.contains("5678"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("feed.xml");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), "x").unwrap();

        assert!(write_atomic(&target, b"<rss/>").await.is_err());
        assert!(!tmp.path().join("feed.xml.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path(Path::new("/srv/feed.xml")),
            PathBuf::from("/srv/feed.xml.tmp")
        );
    }
}
