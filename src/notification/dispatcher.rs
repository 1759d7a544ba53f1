use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::metrics::DeliveryMetrics;

use super::{DeliveryError, NotificationDeliverer, NotificationRecord};

/// Statistics for the notification dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Total records handed to the deliverer
    pub total_dispatched: AtomicU64,
    /// Deliveries that succeeded
    pub total_delivered: AtomicU64,
    /// Deliveries that failed
    pub total_failed: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_dispatched: self.total_dispatched.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_dispatched: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
}

/// Hands canonical records to the delivery backend.
///
/// Each record is delivered at most once per call; failures are logged and
/// returned, never retried here.
pub struct NotificationDispatcher {
    deliverer: Arc<dyn NotificationDeliverer>,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    pub fn new(deliverer: Arc<dyn NotificationDeliverer>) -> Self {
        Self {
            deliverer,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn backend_name(&self) -> &'static str {
        self.deliverer.name()
    }

    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, record),
        fields(
            template = %record.template,
            platform = %record.platform,
            backend = self.deliverer.name()
        )
    )]
    pub async fn dispatch(&self, record: NotificationRecord) -> Result<(), DeliveryError> {
        let platform = record.platform;
        let target_token = record.target_token.clone();
        let app_data = record.app_data.clone();

        self.stats.total_dispatched.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();

        let result = self.deliverer.deliver(record).await;
        DeliveryMetrics::observe_latency(start.elapsed());

        match result {
            Ok(()) => {
                self.stats.total_delivered.fetch_add(1, Ordering::Relaxed);
                DeliveryMetrics::record_delivered(platform);
                Ok(())
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                DeliveryMetrics::record_failed(platform);
                tracing::error!(
                    platform = %platform,
                    target_token = %target_token,
                    app_data = ?app_data,
                    error = %e,
                    "Failed to notify"
                );
                Err(e)
            }
        }
    }
}
