use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

const FINAL_DELAY_SECS: u64 = 10;

/// Retry an async operation, sleeping between attempts.
///
/// `base_delays` gives the waits (in seconds) after the first failures;
/// once exhausted, the schedule stays at 10s for `final_retries` more
/// attempts. Total attempts = `base_delays.len() + final_retries`, with
/// at least one attempt always made.
///
/// Returns the first success, or the last error once the schedule runs
/// out.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    base_delays: &[u64],
    final_retries: usize,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total_attempts = (base_delays.len() + final_retries).max(1);
    let mut last_error = None;

    for attempt in 1..=total_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt < total_attempts {
                    let delay_secs = base_delays
                        .get(attempt - 1)
                        .copied()
                        .unwrap_or(FINAL_DELAY_SECS);
                    warn!(
                        "Request failed (attempt {attempt}/{total_attempts}): {e}. Retrying after {delay_secs}s..."
                    );
                    sleep(Duration::from_secs(delay_secs)).await;
                }
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        // total_attempts >= 1, so the loop stored an error before falling through
        None => unreachable!("retry loop made no attempts"),
    }
}
