use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuditOutcome};
use thiserror::Error;

use crate::verifier::VerifierError;

#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("Company not found: {0}")]
    NotFound(i32),

    #[error("Invalid or unverifiable tax ID: {0}")]
    InvalidTaxId(String),

    #[error("Tax ID verification unavailable: {0}")]
    VerifierUnavailable(String),

    #[error("Company {0} still has users")]
    HasUsers(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CompanyResult<T> = Result<T, CompanyError>;

impl CompanyError {
    /// Rule rejections are `Denied`; outages and store failures are `Failure`.
    pub fn audit_outcome(&self) -> AuditOutcome {
        match self {
            CompanyError::VerifierUnavailable(_) | CompanyError::Internal(_) => {
                AuditOutcome::Failure
            }
            _ => AuditOutcome::Denied,
        }
    }
}

impl From<VerifierError> for CompanyError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::Unavailable(msg) => CompanyError::VerifierUnavailable(msg),
            VerifierError::Configuration(msg) => CompanyError::Internal(msg),
        }
    }
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::NotFound(id) => AppError::NotFound(format!("Company {} not found", id)),
            err @ CompanyError::InvalidTaxId(_) => AppError::ValidationFailed(err.to_string()),
            CompanyError::VerifierUnavailable(msg) => {
                tracing::warn!(error = %msg, "Tax ID verifier unavailable");
                AppError::UpstreamUnavailable(
                    "Tax ID verification service is unavailable, try again later".to_string(),
                )
            }
            CompanyError::HasUsers(id) => AppError::Conflict(format!(
                "Company {} still has users and cannot be deleted",
                id
            )),
            CompanyError::Validation(msg) => AppError::ValidationFailed(msg),
            CompanyError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CompanyError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Company not found")]
    CompanyNotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            err @ UserError::CompanyNotFound(_) => AppError::ValidationFailed(err.to_string()),
            UserError::Validation(msg) => AppError::ValidationFailed(msg),
            UserError::PasswordHash(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
