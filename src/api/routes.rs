use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::mobile_push_webhook;

use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Webhook endpoints
        .nest(
            "/api/v1",
            Router::new().route("/notify", post(mobile_push_webhook)),
        )
}
