use std::future::Future;
use std::time::Duration;

use super::r#trait::{StoreError, StoreResult};

/// Run one storage operation under a deadline.
///
/// Expiry is reported once as [`StoreError::Timeout`]; nothing is retried.
pub async fn with_deadline<T, F>(limit: Duration, op: &'static str, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(op, limit_ms = limit.as_millis() as u64, "storage operation timed out");
            Err(StoreError::Timeout { op, limit })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fast_operation_passes_through() {
        let out = with_deadline(Duration::from_secs(1), "fast", async { Ok::<_, StoreError>(5) }).await;
        assert_eq!(out, Ok(5));
    }

    #[tokio::test]
    async fn inner_error_is_preserved() {
        let out: StoreResult<()> = with_deadline(Duration::from_secs(1), "failing", async {
            Err(StoreError::Backend("disk on fire".to_string()))
        })
        .await;
        assert_eq!(out, Err(StoreError::Backend("disk on fire".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out() {
        let out: StoreResult<()> = with_deadline(Duration::from_millis(50), "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(out, Err(StoreError::Timeout { op: "slow", .. })));
    }
}
