//! Delivery backends for canonical notification records.
//!
//! The push subsystem itself lives outside this service. A deliverer is the
//! narrow seam through which records leave it:
//!
//! - `LogDeliverer`: records the notification in the log and succeeds (default)
//! - `HttpDeliverer`: relays the record as JSON to a downstream push service

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DeliveryConfig;

use super::NotificationRecord;

/// Errors reported by a delivery backend.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Downstream service answered with a non-success status
    #[error("Delivery rejected with status {status}")]
    Rejected { status: u16 },

    /// Could not reach the downstream service
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DeliveryError::Rejected {
                status: status.as_u16(),
            },
            None => DeliveryError::Transport(err.to_string()),
        }
    }
}

/// Hands a notification record to the push delivery subsystem.
///
/// Implementations report each attempt once; retrying is their own concern.
#[async_trait]
pub trait NotificationDeliverer: Send + Sync {
    /// Backend name for logs and metrics
    fn name(&self) -> &'static str;

    /// Deliver a single record.
    async fn deliver(&self, record: NotificationRecord) -> Result<(), DeliveryError>;
}

/// Deliverer that only logs. Useful when no push subsystem is attached.
#[derive(Debug, Default)]
pub struct LogDeliverer;

#[async_trait]
impl NotificationDeliverer for LogDeliverer {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, record: NotificationRecord) -> Result<(), DeliveryError> {
        tracing::info!(
            template = %record.template,
            platform = %record.platform,
            target_token = %record.target_token,
            display_message = %record.display_message,
            data = ?record.data,
            "Notification delivered to log"
        );
        Ok(())
    }
}

/// Relays records to a downstream push service over HTTP.
pub struct HttpDeliverer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDeliverer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NotificationDeliverer for HttpDeliverer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn deliver(&self, record: NotificationRecord) -> Result<(), DeliveryError> {
        let response = self.client.post(&self.endpoint).json(&record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            template = %record.template,
            status = status.as_u16(),
            "Notification relayed"
        );
        Ok(())
    }
}

/// Create a delivery backend based on configuration.
///
/// - `"http"`: an `HttpDeliverer` if an endpoint is configured
/// - `"log"` (default): a `LogDeliverer`
pub fn create_deliverer(config: &DeliveryConfig) -> Arc<dyn NotificationDeliverer> {
    match config.backend.as_str() {
        "http" => {
            let Some(endpoint) = config.endpoint.as_deref() else {
                tracing::warn!("HTTP delivery requested but no endpoint configured, falling back to log");
                return Arc::new(LogDeliverer);
            };

            match HttpDeliverer::new(endpoint, Duration::from_secs(config.timeout_seconds)) {
                Ok(deliverer) => {
                    tracing::info!(
                        backend = "http",
                        endpoint = %endpoint,
                        timeout_seconds = config.timeout_seconds,
                        "Creating HTTP deliverer"
                    );
                    Arc::new(deliverer)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build HTTP deliverer, falling back to log");
                    Arc::new(LogDeliverer)
                }
            }
        }
        "log" => {
            tracing::info!(backend = "log", "Creating log deliverer");
            Arc::new(LogDeliverer)
        }
        other => {
            tracing::warn!(backend = %other, "Unknown delivery backend, falling back to log");
            Arc::new(LogDeliverer)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Router};
    use tokio::net::TcpListener;

    use super::*;
    use crate::notification::{NotificationData, Platform};

    fn record() -> NotificationRecord {
        NotificationRecord {
            template: "tx_confirmed".to_string(),
            display_message: "Transaction confirmed".to_string(),
            platform: Platform::Ios,
            target_token: "abc".to_string(),
            app_data: Some("opaque".to_string()),
            data: NotificationData::new(),
        }
    }

    #[tokio::test]
    async fn test_log_deliverer_succeeds() {
        assert!(LogDeliverer.deliver(record()).await.is_ok());
    }

    #[test]
    fn test_factory_defaults_to_log() {
        let deliverer = create_deliverer(&DeliveryConfig::default());
        assert_eq!(deliverer.name(), "log");
    }

    #[test]
    fn test_factory_http_without_endpoint_falls_back() {
        let config = DeliveryConfig {
            backend: "http".to_string(),
            endpoint: None,
            timeout_seconds: 5,
        };
        assert_eq!(create_deliverer(&config).name(), "log");
    }

    #[test]
    fn test_factory_http_with_endpoint() {
        let config = DeliveryConfig {
            backend: "http".to_string(),
            endpoint: Some("http://localhost:9999/push".to_string()),
            timeout_seconds: 5,
        };
        assert_eq!(create_deliverer(&config).name(), "http");
    }

    /// Serves `POST /push` on an ephemeral port, answering with `status`.
    async fn push_service(status: StatusCode) -> String {
        let app = Router::new().route("/push", post(move || async move { status }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/push", addr)
    }

    #[tokio::test]
    async fn test_http_deliverer_accepts_success_status() {
        let endpoint = push_service(StatusCode::ACCEPTED).await;
        let deliverer = HttpDeliverer::new(endpoint, Duration::from_secs(5)).unwrap();
        assert!(deliverer.deliver(record()).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_deliverer_maps_error_status_to_rejected() {
        let endpoint = push_service(StatusCode::SERVICE_UNAVAILABLE).await;
        let deliverer = HttpDeliverer::new(endpoint, Duration::from_secs(5)).unwrap();
        let err = deliverer.deliver(record()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { status: 503 }));
    }

    #[tokio::test]
    async fn test_http_deliverer_reports_transport_error() {
        // Reserve a port, then release it so nothing is listening there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let deliverer =
            HttpDeliverer::new(format!("http://{}/push", addr), Duration::from_secs(5)).unwrap();
        let err = deliverer.deliver(record()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
