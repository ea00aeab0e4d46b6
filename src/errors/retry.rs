use std::future::Future;
use std::time::Duration;

use super::types::ScanError;
use rand::Rng;
use tracing::{debug, warn};

/// Backoff for container create/start. The daemon usually recovers from a
/// busy or racing state within a few seconds, so delays start short.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries, ..Default::default() }
    }

    /// Delay before retry number `retry` (0-indexed): `base * 2^retry` plus
    /// up to half a base of jitter, never above `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let backoff = self.base_delay.saturating_mul(1u32 << retry.min(16));
        let jitter_ms = self.base_delay.as_millis() as u64 / 2;
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms));
        backoff.saturating_add(jitter).min(self.max_delay)
    }
}

/// Run a container provisioning step, retrying while the error is classified
/// retryable and attempts remain. With the default config the step runs once.
pub async fn with_retry<F, Fut, T>(
    container_op: &str,
    config: &RetryConfig,
    mut step: F,
) -> Result<T, ScanError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScanError>>,
{
    let mut retry = 0;
    loop {
        let err = match step().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(container_op, retries = retry, "Container step succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        let class = err.classify();
        if !class.retryable || retry >= config.max_retries {
            if class.retryable && config.max_retries > 0 {
                warn!(container_op, retries = retry, error = %err, "Giving up on container step");
            }
            return Err(err);
        }

        let delay = config.delay_for(retry);
        warn!(
            container_op,
            retry = retry + 1,
            of = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Container step failed, retrying"
        );
        tokio::time::sleep(delay).await;
        retry += 1;
    }
}
