//! Append-only audit trail of settlement-status determinations.
//!
//! Every status decision a financial action depends on is recorded here so
//! disputes can be resolved against a trail anchored to server time. The
//! store is a pure recorder: it holds no business logic and must never
//! fail the settlement flow that writes to it.

use crate::domain::{AuditEntry, BookingId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

/// Error type for audit persistence operations.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    #[error("Audit storage error: {0}")]
    Storage(String),
}

/// Append-only store of audit entries.
///
/// Entries are never mutated or removed except via retention trimming.
/// Ordering between concurrent appenders is only guaranteed through the
/// timestamp fields.
#[async_trait]
pub trait AuditStore: Send + Sync + fmt::Debug {
    /// Append an entry.
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// The most recent `limit` entries, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, AuditError>;

    /// The most recent `limit` entries for one booking, newest first.
    async fn for_booking(
        &self,
        booking_id: &BookingId,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Record a determination, swallowing persistence failures.
///
/// Losing an audit entry is less harmful than blocking a payout, so append
/// errors are logged and the surrounding flow continues.
pub async fn record_decision(store: &dyn AuditStore, entry: AuditEntry) {
    let booking_id = entry.booking_id.clone();
    if let Err(e) = store.append(entry).await {
        warn!("Audit append failed for booking {}: {}", booking_id, e);
    }
}

/// In-memory audit store with a capped retention count: beyond the cap the
/// oldest entries are silently dropped. Suitable for tests and embedders;
/// the SQLite-backed store retains everything.
#[derive(Debug)]
pub struct MemoryAuditStore {
    entries: Mutex<VecDeque<AuditEntry>>,
    retention: usize,
}

impl MemoryAuditStore {
    pub fn new(retention: usize) -> Self {
        MemoryAuditStore {
            entries: Mutex::new(VecDeque::new()),
            retention,
        }
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::Storage("audit store lock poisoned".to_string()))?;
        entries.push_back(entry);
        while entries.len() > self.retention {
            entries.pop_front();
        }
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::Storage("audit store lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn for_booking(
        &self,
        booking_id: &BookingId,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::Storage("audit store lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| &e.booking_id == booking_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettlementStatus;
    use uuid::Uuid;

    /// Store whose appends always fail, for exercising the fail-soft path.
    #[derive(Debug)]
    struct FailingAuditStore;

    #[async_trait]
    impl AuditStore for FailingAuditStore {
        async fn append(&self, _entry: AuditEntry) -> Result<(), AuditError> {
            Err(AuditError::Storage("disk on fire".to_string()))
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<AuditEntry>, AuditError> {
            Ok(Vec::new())
        }

        async fn for_booking(
            &self,
            _booking_id: &BookingId,
            _limit: u32,
        ) -> Result<Vec<AuditEntry>, AuditError> {
            Ok(Vec::new())
        }
    }

    fn entry(booking: &str, server_time_ms: i64) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            booking_id: BookingId::new(booking.to_string()),
            status: SettlementStatus::Confirmed,
            server_time_iso: "2025-05-03T00:00:00.000Z".to_string(),
            server_time_ms,
            check_in_iso: "2025-05-01T07:00:00.000Z".to_string(),
            check_out_iso: "2025-05-08T05:00:00.000Z".to_string(),
            payable_after_iso: "2025-05-08T05:00:00.000Z".to_string(),
            recorded_at_ms: server_time_ms,
        }
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let store = MemoryAuditStore::new(10);
        store.append(entry("bk_1", 1000)).await.unwrap();
        store.append(entry("bk_2", 2000)).await.unwrap();
        store.append(entry("bk_3", 3000)).await.unwrap();

        let got = store.recent(2).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].booking_id.as_str(), "bk_3");
        assert_eq!(got[1].booking_id.as_str(), "bk_2");
    }

    #[tokio::test]
    async fn test_retention_cap_drops_oldest() {
        let store = MemoryAuditStore::new(2);
        store.append(entry("bk_1", 1000)).await.unwrap();
        store.append(entry("bk_2", 2000)).await.unwrap();
        store.append(entry("bk_3", 3000)).await.unwrap();

        let got = store.recent(10).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].booking_id.as_str(), "bk_3");
        assert_eq!(got[1].booking_id.as_str(), "bk_2");
    }

    #[tokio::test]
    async fn test_record_decision_swallows_store_failure() {
        // Losing the entry must not propagate; the settlement flow that
        // called us continues.
        let store = FailingAuditStore;
        record_decision(&store, entry("bk_1", 1000)).await;
    }

    #[tokio::test]
    async fn test_for_booking_filters() {
        let store = MemoryAuditStore::new(10);
        store.append(entry("bk_1", 1000)).await.unwrap();
        store.append(entry("bk_2", 2000)).await.unwrap();
        store.append(entry("bk_1", 3000)).await.unwrap();

        let got = store
            .for_booking(&BookingId::new("bk_1".to_string()), 10)
            .await
            .unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].server_time_ms, 3000);
        assert_eq!(got[1].server_time_ms, 1000);
    }
}
