//! Session-scoped hand-off of raw reports between views.
//!
//! The submission view writes the most recent report under a well-known key;
//! the results view reads it back after the transition. Each session (one
//! terminal session, like one browser tab) has its own slot per key, and the
//! slot disappears when the session ends.
//!
//! ## Directory Structure (local backend)
//!
//! ```text
//! storage/sessions/
//! └── {session}/
//!     └── analysisResults.json   # StoredReport
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};
use crate::models::RawReport;

pub use local::{SessionStore, default_session_id, session_id_for};
pub use memory::MemoryStore;

/// A report as kept in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReport {
    pub stored_at: DateTime<Utc>,
    /// Hex SHA-256 of the report body
    pub digest: String,
    pub report: RawReport,
}

impl StoredReport {
    pub fn new(report: RawReport) -> Self {
        Self {
            stored_at: Utc::now(),
            digest: digest(&report),
            report,
        }
    }
}

/// Hex SHA-256 of a report body.
pub fn digest(report: &RawReport) -> String {
    hex::encode(Sha256::digest(report.as_str().as_bytes()))
}

/// Log when a put replaces a report nobody has consumed.
pub(crate) fn warn_on_overwrite(key: &str, previous: Option<&StoredReport>, next: &StoredReport) {
    if let Some(previous) = previous {
        if previous.digest != next.digest {
            log::warn!(
                "Overwriting unconsumed result '{}' stored at {}",
                key,
                previous.stored_at
            );
        }
    }
}

/// Reject keys that would escape the session directory.
pub(crate) fn check_name(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::store(format!("invalid {kind} name '{name}'")))
    }
}

/// Single-slot-per-key storage for raw reports.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Store a report, replacing whatever the slot held.
    async fn put(&self, key: &str, report: &RawReport) -> Result<()>;

    /// Read the stored report without removing it.
    async fn take(&self, key: &str) -> Result<Option<RawReport>>;

    /// Empty the slot.
    async fn clear(&self, key: &str) -> Result<()>;

    /// Read the stored report and empty the slot.
    async fn consume(&self, key: &str) -> Result<Option<RawReport>> {
        let report = self.take(key).await?;
        if report.is_some() {
            self.clear(key).await?;
        }
        Ok(report)
    }
}
