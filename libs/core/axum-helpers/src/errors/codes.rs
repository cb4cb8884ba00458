//! Error codes carried in every [`ErrorResponse`](super::ErrorResponse).
//!
//! Each code has three faces:
//! - a SCREAMING_SNAKE_CASE identifier for clients (`as_str`)
//! - an integer for logs and dashboards (`code`)
//! - a default human-readable message (`default_message`)
//!
//! Integer ranges:
//! - 1000-1999: request and domain errors
//! - 3000-3999: upstream dependency errors
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body or domain rule validation failed
    ValidationError,
    /// Path identifier is not a valid integer
    InvalidId,
    /// Request body could not be read as JSON
    JsonExtraction,
    NotFound,
    InternalError,
    /// Request conflicts with the current state of the resource
    Conflict,
    MethodNotAllowed,

    /// An external service the request depends on did not answer usefully
    UpstreamUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Conflict => "CONFLICT",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Conflict => 1008,
            Self::MethodNotAllowed => 1013,
            Self::UpstreamUnavailable => 3001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Conflict => "Request conflicts with the current state of the resource",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::UpstreamUnavailable => "A required external service is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
