use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::notification::DeliveryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported payload")]
    UnsupportedPayload { body: Bytes },

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnsupportedPayload { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnsupportedPayload { .. } => "UNSUPPORTED_PAYLOAD",
            AppError::Delivery(_) => "DELIVERY_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Callers only ever see the status; details stay in the logs.
        match &self {
            AppError::UnsupportedPayload { body } => tracing::warn!(
                code = %self.code(),
                status = %status.as_u16(),
                body = %String::from_utf8_lossy(body),
                "Invalid payload"
            ),
            AppError::Validation(msg) => tracing::warn!(
                code = %self.code(),
                status = %status.as_u16(),
                message = %msg,
                "Rejected request"
            ),
            AppError::Delivery(_) => tracing::error!(
                code = %self.code(),
                status = %status.as_u16(),
                message = %self,
                "API error"
            ),
        }

        status.into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = AppError::Validation("platform is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::UnsupportedPayload {
            body: Bytes::from_static(b"{}"),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_delivery_error_maps_to_server_error() {
        let err = AppError::from(DeliveryError::Transport("connection refused".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_response_has_empty_body() {
        let response = AppError::UnsupportedPayload {
            body: Bytes::from_static(b"{\"template\":\"unknown_kind\"}"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("content-type").is_none());
    }
}
