use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::app::{HnError, Result};

/// Runs `operation` against a hard deadline.
///
/// The operation gets a [`CancellationToken`] to pass down to any work it
/// spawns. If the deadline wins, the token is cancelled, the operation future
/// is dropped and [`HnError::TimeoutExceeded`] is returned. If the operation
/// wins, the deadline timer is dropped with the race and never fires.
pub async fn with_timeout<T, F, Fut>(duration: Duration, operation: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = T>,
{
    let token = CancellationToken::new();
    let operation = operation(token.clone());

    tokio::select! {
        biased;
        output = operation => Ok(output),
        _ = tokio::time::sleep(duration) => {
            token.cancel();
            Err(HnError::TimeoutExceeded(duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_returns_output() {
        let result = with_timeout(Duration::from_secs(60), |_| async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_is_cut_off_at_deadline() {
        let started = Instant::now();

        let result = with_timeout(Duration::from_secs(60), |_| async {
            tokio::time::sleep(Duration::from_secs(600)).await;
            "late"
        })
        .await;

        assert!(matches!(result, Err(HnError::TimeoutExceeded(d)) if d == Duration::from_secs(60)));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(60));
        assert!(elapsed < Duration::from_secs(61));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_spawned_work() {
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();

        let result = with_timeout(Duration::from_secs(1), |token| async move {
            let watcher = tokio::spawn(async move {
                token.cancelled().await;
                flag.store(true, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_secs(30)).await;
            let _ = watcher.await;
        })
        .await;

        assert!(result.is_err());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_cancellation_after_completion() {
        let mut seen = None;

        let result = with_timeout(Duration::from_secs(5), |token| {
            seen = Some(token.clone());
            async { "done" }
        })
        .await;
        assert_eq!(result.unwrap(), "done");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!seen.unwrap().is_cancelled());
    }
}
