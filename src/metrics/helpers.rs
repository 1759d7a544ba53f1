use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::notification::Platform;

use super::{
    DELIVERIES_TOTAL, DELIVERY_LATENCY, WEBHOOKS_CLASSIFIED_TOTAL, WEBHOOKS_RECEIVED_TOTAL,
    WEBHOOKS_REJECTED_TOTAL,
};

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Helpers for inbound webhook metrics
pub struct WebhookMetrics;

impl WebhookMetrics {
    pub fn record_received() {
        WEBHOOKS_RECEIVED_TOTAL.inc();
    }

    pub fn record_classified(template: &str) {
        WEBHOOKS_CLASSIFIED_TOTAL
            .with_label_values(&[template])
            .inc();
    }

    pub fn record_invalid_target() {
        WEBHOOKS_REJECTED_TOTAL
            .with_label_values(&["invalid_target"])
            .inc();
    }

    pub fn record_unsupported_payload() {
        WEBHOOKS_REJECTED_TOTAL
            .with_label_values(&["unsupported_payload"])
            .inc();
    }
}

/// Helpers for delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_delivered(platform: Platform) {
        DELIVERIES_TOTAL
            .with_label_values(&[platform.as_str(), "delivered"])
            .inc();
    }

    pub fn record_failed(platform: Platform) {
        DELIVERIES_TOTAL
            .with_label_values(&[platform.as_str(), "failed"])
            .inc();
    }

    pub fn observe_latency(elapsed: Duration) {
        DELIVERY_LATENCY.observe(elapsed.as_secs_f64());
    }
}
