//! Server-anchored time source.
//!
//! Every time-sensitive decision in the system uses this clock; client
//! device clocks are untrusted input, since a tenant or owner could shift
//! local time to force a favorable settlement status.

use crate::domain::CalendarDate;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod http;
pub mod mock;

pub use http::HttpClockSource;
pub use mock::MockClockSource;

/// Error type for server-clock operations.
///
/// Never silently defaulted to local time: callers that need certainty
/// must propagate the failure and abort the dependent flow.
#[derive(Debug, Clone, Error)]
pub enum ClockError {
    #[error("Server clock unavailable: {0}")]
    Unavailable(String),
    #[error("Server clock returned invalid payload: {0}")]
    InvalidPayload(String),
}

/// Source of the authoritative current instant.
#[async_trait]
pub trait ClockSource: Send + Sync + fmt::Debug {
    /// Fetch the current instant from the authoritative source.
    async fn fetch(&self) -> Result<DateTime<Utc>, ClockError>;
}

#[derive(Debug, Clone, Copy)]
struct CachedSample {
    server_time: DateTime<Utc>,
    fetched_at: Instant,
}

/// Injected clock provider with a short TTL cache.
///
/// A previously fetched instant is reused and advanced by locally elapsed
/// monotonic time while within the TTL; beyond it a fresh fetch is
/// mandatory. The cache is a last-writer-wins slot: concurrent callers may
/// race on population, costing at most one redundant fetch.
#[derive(Debug)]
pub struct ServerClock {
    source: Arc<dyn ClockSource>,
    ttl: Duration,
    cache: Mutex<Option<CachedSample>>,
}

impl ServerClock {
    pub fn new(source: Arc<dyn ClockSource>, ttl: Duration) -> Self {
        ServerClock {
            source,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Current server instant, from cache when fresh, otherwise fetched.
    pub async fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        if let Some(cached) = self.fresh_sample() {
            return Ok(cached);
        }

        let fetched = self.source.fetch().await?;
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CachedSample {
                server_time: fetched,
                fetched_at: Instant::now(),
            });
        }
        Ok(fetched)
    }

    /// Today's date in the platform reference timezone, server-anchored.
    pub async fn today(&self, reference: FixedOffset) -> Result<CalendarDate, ClockError> {
        let now = self.now().await?;
        Ok(CalendarDate::new(now.with_timezone(&reference).date_naive()))
    }

    fn fresh_sample(&self) -> Option<DateTime<Utc>> {
        let guard = self.cache.lock().ok()?;
        let cached = (*guard)?;
        let elapsed = cached.fetched_at.elapsed();
        if elapsed <= self.ttl {
            Some(cached.server_time + chrono::Duration::from_std(elapsed).ok()?)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_now_fetches_from_source() {
        let source = Arc::new(MockClockSource::new(sample_time()));
        let clock = ServerClock::new(source.clone(), Duration::from_secs(60));
        let now = clock.now().await.unwrap();
        assert_eq!(now, sample_time());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_now_reuses_fresh_cache() {
        let source = Arc::new(MockClockSource::new(sample_time()));
        let clock = ServerClock::new(source.clone(), Duration::from_secs(60));

        let first = clock.now().await.unwrap();
        let second = clock.now().await.unwrap();
        assert_eq!(source.fetch_count(), 1);
        // Cached value only ever advances.
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_expired_ttl_forces_fetch() {
        let source = Arc::new(MockClockSource::new(sample_time()));
        let clock = ServerClock::new(source.clone(), Duration::ZERO);

        clock.now().await.unwrap();
        clock.now().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_without_local_fallback() {
        let source = Arc::new(MockClockSource::new(sample_time()).failing());
        let clock = ServerClock::new(source, Duration::from_secs(60));
        let err = clock.now().await.unwrap_err();
        assert!(matches!(err, ClockError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_fresh_cache_survives_source_outage() {
        let source = Arc::new(MockClockSource::new(sample_time()));
        let clock = ServerClock::new(source.clone(), Duration::from_secs(60));

        clock.now().await.unwrap();
        source.set_failing(true);
        // Still within TTL; the cached sample answers.
        assert!(clock.now().await.is_ok());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_today_uses_reference_zone() {
        // 18:30 UTC is already the next day in UTC+7.
        let source = Arc::new(MockClockSource::new(
            Utc.with_ymd_and_hms(2025, 4, 30, 18, 30, 0).unwrap(),
        ));
        let clock = ServerClock::new(source, Duration::from_secs(60));
        let today = clock
            .today(FixedOffset::east_opt(7 * 3600).unwrap())
            .await
            .unwrap();
        assert_eq!(today.to_string(), "2025-05-01");
    }
}
