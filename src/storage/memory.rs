//! In-process store for hand-offs that never leave one invocation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::RawReport;
use crate::storage::{ResultStore, StoredReport, warn_on_overwrite};

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, StoredReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn put(&self, key: &str, report: &RawReport) -> Result<()> {
        let entry = StoredReport::new(report.clone());
        let mut slots = self.slots.lock().await;
        warn_on_overwrite(key, slots.get(key), &entry);
        slots.insert(key.to_string(), entry);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<RawReport>> {
        Ok(self
            .slots
            .lock()
            .await
            .get(key)
            .map(|entry| entry.report.clone()))
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.slots.lock().await.remove(key);
        Ok(())
    }

    async fn consume(&self, key: &str) -> Result<Option<RawReport>> {
        Ok(self.slots.lock().await.remove(key).map(|entry| entry.report))
    }
}
