// Retry handling for provider API calls
//
// Only transient failures are retried: rate limiting (429), server-side
// errors (5xx), and transport problems like timeouts or refused
// connections. Client errors such as an invalid API key (401) or a
// malformed request (400) fail immediately since repeating them cannot
// succeed.

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;

/// Retry tuning, taken from the `[retry]` config section.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent attempt
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Non-2xx response from a provider API, kept typed so the retry loop
/// can distinguish transient statuses from permanent ones.
#[derive(Debug, thiserror::Error)]
#[error("{api} API request failed\n\nStatus: {status}\nBody: {body}")]
pub struct ApiStatusError {
    pub api: &'static str,
    pub status: u16,
    pub body: String,
}

impl ApiStatusError {
    pub fn new(api: &'static str, status: u16, body: String) -> Self {
        Self { api, status, body }
    }

    pub fn is_transient(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

fn is_transient(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(api_err) = cause.downcast_ref::<ApiStatusError>() {
            return api_err.is_transient();
        }
        if let Some(req_err) = cause.downcast_ref::<reqwest::Error>() {
            return req_err.is_timeout() || req_err.is_connect() || req_err.is_request();
        }
        false
    })
}

/// Execute a provider call, retrying transient failures with exponential
/// backoff up to the policy's attempt bound.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = policy.max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_transient(&e) {
                    return Err(e);
                }
                last_error = Some(e);

                if attempt < attempts - 1 {
                    let delay = Duration::from_millis(policy.base_delay_ms * 2u64.pow(attempt));
                    tracing::warn!(
                        "Transient provider failure (attempt {}/{}), retrying in {:?}",
                        attempt + 1,
                        attempts,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap())
}
