use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::estimator::EstimationError;

/// Errors surfaced at the HTTP boundary
#[derive(Debug)]
pub enum AppError {
    /// Missing or unparsable request parameter
    InvalidRequestParameter(String),
    /// The predictor failed on a well-formed request
    Estimation(EstimationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequestParameter(msg) => write!(f, "{}", msg),
            Self::Estimation(err) => write!(f, "Estimation failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequestParameter(_) => StatusCode::BAD_REQUEST,
            Self::Estimation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for the error metric
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidRequestParameter(_) => "invalid_request_parameter",
            Self::Estimation(_) => "estimation_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "estimated_price": null,
        }));

        (status, body).into_response()
    }
}

impl From<EstimationError> for AppError {
    fn from(err: EstimationError) -> Self {
        Self::Estimation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::InvalidRequestParameter("Location is required".to_string());
        assert_eq!(error.to_string(), "Location is required");

        let error = AppError::Estimation(EstimationError::NonFinite);
        assert_eq!(
            error.to_string(),
            "Estimation failed: model produced a non-finite estimate"
        );
    }

    #[test]
    fn test_error_type() {
        assert_eq!(
            AppError::InvalidRequestParameter("x".to_string()).error_type(),
            "invalid_request_parameter"
        );
        assert_eq!(
            AppError::Estimation(EstimationError::NonFinite).error_type(),
            "estimation_error"
        );
    }

    #[tokio::test]
    async fn test_error_response() {
        let error =
            AppError::InvalidRequestParameter("Missing required parameter: bhk".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Missing required parameter: bhk");
        assert!(json["estimated_price"].is_null());
    }

    #[tokio::test]
    async fn test_estimation_error_is_server_error() {
        let error = AppError::from(EstimationError::FeatureLengthMismatch {
            expected: 5,
            actual: 4,
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
