use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs `operation` until it succeeds or `retries` extra attempts have failed,
/// sleeping `delay_ms` between attempts. Only transport errors are retried;
/// HTTP status codes are left to the caller.
pub async fn with_retry<F, Fut, T>(mut operation: F, retries: usize, delay_ms: u64) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt < retries => {
                attempt += 1;
                debug!("Attempt {}/{} failed: {}. Retrying...", attempt, retries + 1, err);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
