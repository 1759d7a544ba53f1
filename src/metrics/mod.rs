//! Prometheus metrics for the webhook service.
//!
//! - Webhook metrics (received, classified by template, rejected by reason)
//! - Delivery metrics (outcome by platform, latency)

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics, WebhookMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "notify";

lazy_static! {
    // ============================================================================
    // Webhook Metrics
    // ============================================================================

    /// Total webhook requests received
    pub static ref WEBHOOKS_RECEIVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_webhooks_received_total", METRIC_PREFIX),
        "Total webhook requests received"
    ).unwrap();

    /// Webhook payloads classified, by canonical template
    pub static ref WEBHOOKS_CLASSIFIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_webhooks_classified_total", METRIC_PREFIX),
        "Webhook payloads classified by template",
        &["template"]
    ).unwrap();

    /// Webhook requests rejected, by reason
    pub static ref WEBHOOKS_REJECTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_webhooks_rejected_total", METRIC_PREFIX),
        "Webhook requests rejected before dispatch",
        &["reason"]
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Deliveries by platform and outcome
    pub static ref DELIVERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_deliveries_total", METRIC_PREFIX),
        "Notification deliveries by platform and outcome",
        &["platform", "outcome"]
    ).unwrap();

    /// Time spent in the delivery backend
    pub static ref DELIVERY_LATENCY: Histogram = register_histogram!(
        format!("{}_delivery_latency_seconds", METRIC_PREFIX),
        "Delivery backend latency in seconds",
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}
