//! Mobile push webhook endpoint

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};

use crate::error::{AppError, Result};
use crate::metrics::WebhookMetrics;
use crate::server::AppState;

use super::classifier::classify;
use super::target::{MobilePushQuery, TargetDescriptor};

/// Classify an event callback and forward it to the device.
///
/// Responds with an empty body: 200 when delivered, 400 for a bad query or
/// unrecognized body, 500 when delivery fails.
#[tracing::instrument(name = "http.mobile_push_webhook", skip_all)]
pub async fn mobile_push_webhook(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Result<StatusCode> {
    WebhookMetrics::record_received();

    let target = query
        .map_err(|e| AppError::Validation(e.body_text()))
        .and_then(|Query(pairs)| {
            TargetDescriptor::try_from(pairs.into_iter().collect::<MobilePushQuery>())
                .map_err(|e| AppError::Validation(e.to_string()))
        })
        .inspect_err(|_| WebhookMetrics::record_invalid_target())?;

    let payload = classify(&body).map_err(|e| {
        WebhookMetrics::record_unsupported_payload();
        AppError::UnsupportedPayload {
            body: e.into_body(),
        }
    })?;

    let record = payload.to_notification(&target);
    WebhookMetrics::record_classified(&record.template);
    tracing::debug!(
        schema = payload.schema_name(),
        template = %record.template,
        platform = %record.platform,
        "Webhook payload classified"
    );

    state.dispatcher.dispatch(record).await?;

    Ok(StatusCode::OK)
}
