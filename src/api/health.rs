use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub delivery_backend: String,
    pub notifications: NotificationStats,
}

#[derive(Debug, Serialize)]
pub struct NotificationStats {
    pub total_dispatched: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let dispatcher_stats = state.dispatcher.stats();

    Json(StatsResponse {
        delivery_backend: state.dispatcher.backend_name().to_string(),
        notifications: NotificationStats {
            total_dispatched: dispatcher_stats.total_dispatched,
            total_delivered: dispatcher_stats.total_delivered,
            total_failed: dispatcher_stats.total_failed,
        },
    })
}
