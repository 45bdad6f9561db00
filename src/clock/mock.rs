//! Mock clock source for testing without network calls.

use super::{ClockError, ClockSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Mock clock source returning a settable instant.
#[derive(Debug, Clone)]
pub struct MockClockSource {
    now: Arc<Mutex<DateTime<Utc>>>,
    fail: Arc<AtomicBool>,
    fetch_count: Arc<AtomicU64>,
}

impl MockClockSource {
    /// Create a mock source pinned at the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
            fail: Arc::new(AtomicBool::new(false)),
            fetch_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Builder form of `set_failing(true)`.
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Move the mock's current instant.
    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Toggle whether fetches fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of fetch attempts made against this source.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClockSource for MockClockSource {
    async fn fetch(&self) -> Result<DateTime<Utc>, ClockError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClockError::Unavailable("mock clock failure".to_string()));
        }
        self.now
            .lock()
            .map(|guard| *guard)
            .map_err(|_| ClockError::Unavailable("mock clock poisoned".to_string()))
    }
}
