//! Local filesystem store scoped to one session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::RawReport;
use crate::storage::{ResultStore, StoredReport, check_name, warn_on_overwrite};

/// Session of the calling terminal.
///
/// Every command started from the same shell shares the shell's process id
/// as parent, so one terminal maps to one session and terminals never share
/// a slot.
#[cfg(unix)]
pub fn default_session_id() -> String {
    session_id_for(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
pub fn default_session_id() -> String {
    "default".to_string()
}

/// Session id owned by the process `pid`.
pub fn session_id_for(pid: u32) -> String {
    format!("term-{pid}")
}

/// Stores reports under `{root}/{session}/{key}.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session_dir: PathBuf,
}

impl SessionStore {
    /// Open the store of `session` below `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, session: &str) -> Result<Self> {
        check_name("session", session)?;
        Ok(Self {
            session_dir: root_dir.into().join(session),
        })
    }

    pub fn session_dir(&self) -> &PathBuf {
        &self.session_dir
    }

    /// Remove everything this session stored.
    pub async fn end_session(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.session_dir).await {
            Ok(()) => {
                log::info!("Ended session at {}", self.session_dir.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        check_name("key", key)?;
        Ok(self.session_dir.join(format!("{key}.json")))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.session_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_entry(path: &Path) -> Result<Option<StoredReport>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl ResultStore for SessionStore {
    async fn put(&self, key: &str, report: &RawReport) -> Result<()> {
        let path = self.path(key)?;
        let entry = StoredReport::new(report.clone());
        let previous = match Self::read_entry(&path).await {
            Ok(previous) => previous,
            Err(e) => {
                log::debug!("Ignoring unreadable entry at {}: {}", path.display(), e);
                None
            }
        };
        warn_on_overwrite(key, previous.as_ref(), &entry);

        self.write_bytes(&path, &serde_json::to_vec(&entry)?).await?;
        log::debug!("Stored {} bytes under '{}'", report.len(), key);
        Ok(())
    }

    /// Best-effort read; an unreadable entry is treated as absent.
    async fn take(&self, key: &str) -> Result<Option<RawReport>> {
        let path = self.path(key)?;
        match Self::read_entry(&path).await {
            Ok(entry) => Ok(entry.map(|entry| entry.report)),
            Err(e) => {
                log::warn!("Discarding unreadable entry at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
