//! HTTP clock source backed by the platform time endpoint.

use super::{ClockError, ClockSource};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_RETRY_BUDGET: Duration = Duration::from_secs(10);

/// Clock source over an HTTP endpoint returning `{iso, timestamp}` where
/// `timestamp` is current UTC time in milliseconds. Any non-2xx response
/// or non-finite timestamp is a failure.
#[derive(Debug, Clone)]
pub struct HttpClockSource {
    client: Client,
    url: String,
    request_timeout: Duration,
    retry_budget: Duration,
}

impl HttpClockSource {
    /// Create a new HTTP clock source for the given endpoint URL.
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Override the per-request timeout and the total retry budget.
    pub fn with_timeouts(mut self, request_timeout: Duration, retry_budget: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.retry_budget = retry_budget;
        self
    }
}

#[async_trait]
impl ClockSource for HttpClockSource {
    async fn fetch(&self) -> Result<DateTime<Utc>, ClockError> {
        debug!("Fetching server time from {}", self.url);

        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.retry_budget),
            ..Default::default()
        };

        retry(backoff, || async {
            // Timeout applied per request; a settlement check must never
            // hang on the clock fetch.
            let response = self
                .client
                .get(&self.url)
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(ClockError::Unavailable(e.to_string()))
                })?;

            let status = response.status();
            if status.is_server_error() {
                return Err(backoff::Error::transient(ClockError::Unavailable(
                    format!("server error {}", status.as_u16()),
                )));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(ClockError::Unavailable(
                    format!("unexpected status {}", status.as_u16()),
                )));
            }

            let body = response.json::<serde_json::Value>().await.map_err(|e| {
                backoff::Error::permanent(ClockError::InvalidPayload(e.to_string()))
            })?;

            parse_time_payload(&body).map_err(backoff::Error::permanent)
        })
        .await
    }
}

/// Extract the trusted instant from a `{iso, timestamp}` payload.
fn parse_time_payload(body: &serde_json::Value) -> Result<DateTime<Utc>, ClockError> {
    let timestamp = body
        .get("timestamp")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ClockError::InvalidPayload("missing timestamp field".to_string()))?;

    if !timestamp.is_finite() {
        return Err(ClockError::InvalidPayload(
            "non-finite timestamp".to_string(),
        ));
    }

    Utc.timestamp_millis_opt(timestamp as i64)
        .single()
        .ok_or_else(|| ClockError::InvalidPayload(format!("timestamp out of range: {}", timestamp)))
}
