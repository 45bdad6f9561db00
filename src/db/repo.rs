//! Repository layer: SQLite-backed audit store.
//!
//! Unlike the in-memory store, this one retains every entry; rowid gives a
//! monotonic sequence and `booking_id` is indexed for dispute lookups.

use crate::audit::{AuditError, AuditStore};
use crate::domain::{AuditEntry, BookingId, SettlementStatus};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

/// Repository for database operations.
#[derive(Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

fn map_row(row: &SqliteRow) -> Result<AuditEntry, AuditError> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| AuditError::Storage(e.to_string()))?;
    let status: String = row.get("status");
    let status: SettlementStatus = status.parse().map_err(AuditError::Storage)?;

    Ok(AuditEntry {
        id,
        booking_id: BookingId::new(row.get("booking_id")),
        status,
        server_time_iso: row.get("server_time_iso"),
        server_time_ms: row.get("server_time_ms"),
        check_in_iso: row.get("check_in_iso"),
        check_out_iso: row.get("check_out_iso"),
        payable_after_iso: row.get("payable_after_iso"),
        recorded_at_ms: row.get("recorded_at_ms"),
    })
}

#[async_trait]
impl AuditStore for Repository {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        sqlx::query(
            r#"
            INSERT INTO audit_entries (
                id, booking_id, status, server_time_iso, server_time_ms,
                check_in_iso, check_out_iso, payable_after_iso, recorded_at_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.booking_id.as_str())
        .bind(entry.status.to_string())
        .bind(&entry.server_time_iso)
        .bind(entry.server_time_ms)
        .bind(&entry.check_in_iso)
        .bind(&entry.check_out_iso)
        .bind(&entry.payable_after_iso)
        .bind(entry.recorded_at_ms)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, status, server_time_iso, server_time_ms,
                   check_in_iso, check_out_iso, payable_after_iso, recorded_at_ms
            FROM audit_entries
            ORDER BY seq DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }

    async fn for_booking(
        &self,
        booking_id: &BookingId,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, status, server_time_iso, server_time_ms,
                   check_in_iso, check_out_iso, payable_after_iso, recorded_at_ms
            FROM audit_entries
            WHERE booking_id = ?
            ORDER BY seq DESC
            LIMIT ?
            "#,
        )
        .bind(booking_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn entry(booking: &str, server_time_ms: i64, status: SettlementStatus) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            booking_id: BookingId::new(booking.to_string()),
            status,
            server_time_iso: "2025-05-03T00:00:00.000Z".to_string(),
            server_time_ms,
            check_in_iso: "2025-05-01T07:00:00.000Z".to_string(),
            check_out_iso: "2025-05-08T05:00:00.000Z".to_string(),
            payable_after_iso: "2025-05-08T05:00:00.000Z".to_string(),
            recorded_at_ms: server_time_ms,
        }
    }

    #[tokio::test]
    async fn test_append_and_recent_round_trip() {
        let (repo, _tmp) = setup().await;
        let e = entry("bk_1", 1000, SettlementStatus::Pending);
        repo.append(e.clone()).await.unwrap();

        let got = repo.recent(10).await.unwrap();
        assert_eq!(got, vec![e]);
    }

    #[tokio::test]
    async fn test_recent_orders_newest_first() {
        let (repo, _tmp) = setup().await;
        repo.append(entry("bk_1", 1000, SettlementStatus::Pending))
            .await
            .unwrap();
        repo.append(entry("bk_2", 2000, SettlementStatus::Confirmed))
            .await
            .unwrap();
        repo.append(entry("bk_3", 3000, SettlementStatus::Paid))
            .await
            .unwrap();

        let got = repo.recent(2).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].booking_id.as_str(), "bk_3");
        assert_eq!(got[1].booking_id.as_str(), "bk_2");
    }

    #[tokio::test]
    async fn test_for_booking_filters_and_limits() {
        let (repo, _tmp) = setup().await;
        for i in 0..5 {
            repo.append(entry("bk_a", 1000 + i, SettlementStatus::Confirmed))
                .await
                .unwrap();
        }
        repo.append(entry("bk_b", 9000, SettlementStatus::Paid))
            .await
            .unwrap();

        let got = repo
            .for_booking(&BookingId::new("bk_a".to_string()), 3)
            .await
            .unwrap();
        assert_eq!(got.len(), 3);
        assert!(got.iter().all(|e| e.booking_id.as_str() == "bk_a"));
        assert_eq!(got[0].server_time_ms, 1004);
    }

    #[tokio::test]
    async fn test_no_retention_trimming() {
        let (repo, _tmp) = setup().await;
        for i in 0..20 {
            repo.append(entry("bk_1", i, SettlementStatus::Pending))
                .await
                .unwrap();
        }
        let got = repo.recent(100).await.unwrap();
        assert_eq!(got.len(), 20);
    }
}
