//! Translation of service errors into HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{FieldError, OrdergateError};

pub const CODE_VALIDATION: &str = "VAL_001";
pub const CODE_BUSINESS: &str = "BUS_001";
pub const CODE_NOT_FOUND: &str = "NOT_001";
pub const CODE_UNAUTHENTICATED: &str = "AUTH_001";
pub const CODE_UNAUTHORIZED: &str = "AUTH_002";
pub const CODE_RATE_LIMITED: &str = "RATE_001";
pub const CODE_INTERNAL: &str = "SYS_001";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Stable machine-readable code, e.g. `RATE_001`
    pub error_code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
    /// Request path, filled in by the error envelope middleware
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Diagnostic details of a 500 response, only sent when configured.
#[derive(Debug, Clone)]
pub(crate) struct InternalDetails(pub Value);

/// An error that renders as a structured JSON response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorResponse,
    internal: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse {
                error_code: code,
                message: message.into(),
                details: None,
                timestamp: Utc::now(),
                path: None,
            },
            internal: None,
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        let mut err = Self::new(StatusCode::BAD_REQUEST, CODE_VALIDATION, "Validation error");
        err.body.details = Some(json!(errors));
        err
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, CODE_NOT_FOUND, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, CODE_UNAUTHENTICATED, message)
    }

    pub fn rate_limited() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            CODE_RATE_LIMITED,
            "Request limit exceeded. Retry after the time given in X-RateLimit-Reset",
        )
    }

    pub fn internal(kind: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL,
            "Internal server error",
        );
        err.internal = Some(json!({ "type": kind, "message": message }));
        err
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ApiErrorResponse {
        &self.body
    }
}

impl From<OrdergateError> for ApiError {
    fn from(err: OrdergateError) -> Self {
        match err {
            OrdergateError::Validation(errors) => ApiError::validation(errors),
            OrdergateError::Business(message) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, CODE_BUSINESS, message)
            }
            OrdergateError::NotFound(message) => ApiError::not_found(message),
            OrdergateError::Unauthorized(_) => ApiError::new(
                StatusCode::UNAUTHORIZED,
                CODE_UNAUTHORIZED,
                "Unauthorized access",
            ),
            other => ApiError::internal(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body.clone())).into_response();
        // The envelope middleware rebuilds the body from these.
        response.extensions_mut().insert(self.body);
        if let Some(internal) = self.internal {
            response.extensions_mut().insert(InternalDetails(internal));
        }
        response
    }
}
