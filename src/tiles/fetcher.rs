//! HTTP fetch with a bounded, cancellation-aware retry policy.

use std::time::Duration;

use log::warn;
use once_cell::sync::Lazy;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Shared async HTTP client for the archive page, the full-image link and
/// every tile. Building the client once avoids TLS and connection pool setup
/// per request.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent("himawall/0.1.0")
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(16)
        .build()
        .expect("failed to build reqwest async client")
});

/// The process-wide HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &HTTP_CLIENT
}

/// How often and how patiently a single fetch is retried. Each task runs its
/// retries synchronously on its own worker; the delay is observed between
/// attempts unless the run is cancelled first.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> std::result::Result<Vec<u8>, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

/// Fetches `url`, retrying up to `policy.max_attempts` times. Every failed
/// attempt is logged with its index; the last failure is surfaced as
/// [`Error::Download`]. Cancellation is observed between attempts so a
/// deadline does not sit out a retry sleep.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let mut last_reason = String::from("no attempt was made");

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            last_reason = String::from("cancelled");
            break;
        }

        match try_fetch(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(reason) => {
                warn!(
                    "[{attempt}/{max}] retrying to download '{url}': {reason}",
                    max = policy.max_attempts
                );
                last_reason = reason;
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    last_reason = String::from("cancelled");
                    break;
                }
                _ = tokio::time::sleep(policy.delay) => {}
            }
        }
    }

    Err(Error::Download {
        url: url.to_string(),
        reason: last_reason,
    })
}
