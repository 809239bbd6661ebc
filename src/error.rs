//! Error types for the Ordergate service.

use serde::Serialize;
use thiserror::Error;

/// A single failed validation rule, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Property path, e.g. `customerCode` or `items[0].quantity`
    pub property: String,
    /// Human-readable description of the failure
    pub error: String,
}

impl FieldError {
    pub fn new(property: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            error: error.into(),
        }
    }
}

/// Main error type for Ordergate operations.
#[derive(Error, Debug)]
pub enum OrdergateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request payload failed one or more validation rules
    #[error("Validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A business rule rejected an otherwise well-formed request
    #[error("{0}")]
    Business(String),

    /// The requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller is not allowed to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unexpected failure inside the service
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrdergateError {
    /// Short type name used when internal details are exposed.
    pub fn kind(&self) -> &'static str {
        match self {
            OrdergateError::Config(_) => "Config",
            OrdergateError::Validation(_) => "Validation",
            OrdergateError::Business(_) => "Business",
            OrdergateError::NotFound(_) => "NotFound",
            OrdergateError::Unauthorized(_) => "Unauthorized",
            OrdergateError::Internal(_) => "Internal",
            OrdergateError::Io(_) => "Io",
        }
    }
}

impl From<config::ConfigError> for OrdergateError {
    fn from(err: config::ConfigError) -> Self {
        OrdergateError::Config(err.to_string())
    }
}

/// Result type alias for Ordergate operations.
pub type Result<T> = std::result::Result<T, OrdergateError>;
