//! Background eviction of expired client windows.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::limiter::AdmissionLimiter;

/// Spawn a task that periodically evicts expired client windows.
///
/// Returns `None` when `period` is zero. Abort the handle to stop the task.
pub fn spawn_sweeper(limiter: Arc<AdmissionLimiter>, period: Duration) -> Option<JoinHandle<()>> {
    if period.is_zero() {
        info!("Client window sweeper disabled");
        return None;
    }

    info!(
        period_secs = period.as_secs(),
        "Client window sweeper started"
    );

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = limiter.sweep();
            debug!(
                removed,
                remaining = limiter.client_count(),
                "Swept expired client windows"
            );
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::{ClientId, WindowConfig};
    use chrono::Utc;

    #[test]
    fn test_zero_period_disables_sweeper() {
        let limiter = Arc::new(AdmissionLimiter::default());
        assert!(spawn_sweeper(limiter, Duration::ZERO).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_windows() {
        let limiter = Arc::new(AdmissionLimiter::new(WindowConfig::new(5, 60)));
        let expired = ClientId::from_api_key("expired");
        limiter.check_and_record_at(&expired, Utc::now() - chrono::Duration::seconds(120));
        assert_eq!(limiter.client_count(), 1);

        let handle = spawn_sweeper(Arc::clone(&limiter), Duration::from_secs(10)).unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(limiter.client_count(), 0);
        handle.abort();
    }
}
