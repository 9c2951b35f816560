//! Backend liveness and readiness checks.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::{HealthProbe, PlotApi};

/// Probes `/health` and `/health/db`
pub struct HealthMonitor {
    api: Arc<dyn PlotApi>,
    max_retries: u32,
    backoff_base: Duration,
}

impl HealthMonitor {
    /// Three readiness attempts, waiting 5 s then 10 s between them.
    pub fn new(api: Arc<dyn PlotApi>) -> Self {
        Self::with_retries(api, 3, Duration::from_secs(5))
    }

    pub fn with_retries(api: Arc<dyn PlotApi>, max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            api,
            max_retries: max_retries.max(1),
            backoff_base,
        }
    }

    /// One probe; errors and unhealthy bodies both count as down.
    pub async fn check(&self, probe: HealthProbe) -> bool {
        match self.api.health(probe).await {
            Ok(report) if report.is_healthy() => true,
            Ok(report) => {
                warn!("{} reported status {:?}", probe.path(), report.status);
                false
            }
            Err(err) => {
                warn!("{} probe failed: {}", probe.path(), err);
                false
            }
        }
    }

    pub async fn is_alive(&self) -> bool {
        self.check(HealthProbe::Liveness).await
    }

    /// Retry the readiness probe with exponential backoff
    /// (`2^attempt × base` between attempts).
    pub async fn wait_until_ready(&self) -> bool {
        for attempt in 0..self.max_retries {
            info!(
                "Checking backend readiness (attempt {}/{})",
                attempt + 1,
                self.max_retries
            );

            if self.check(HealthProbe::Readiness).await {
                info!("Backend and database are ready");
                return true;
            }

            if attempt + 1 < self.max_retries {
                let wait = backoff(self.backoff_base, attempt);
                info!("Waiting {:?} before retry...", wait);
                tokio::time::sleep(wait).await;
            }
        }

        error!("Backend not ready after {} attempts", self.max_retries);
        false
    }
}

/// `2^attempt × base`, saturating at `Duration::MAX`.
fn backoff(base: Duration, attempt: u32) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| base.checked_mul(factor))
        .unwrap_or(Duration::MAX)
}
