use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::internal::InternalError;

/// Standardized error response body
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// A single rejected request field
#[derive(Object, Debug, Clone)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,

    /// What was wrong with it
    pub message: String,
}

/// Error response body for request validation failures
#[derive(Object, Debug)]
pub struct ValidationErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// One entry per offending field
    pub validation_errors: Vec<FieldViolation>,
}

/// Error responses shared by all RBAC endpoints
#[derive(ApiResponse, Debug)]
pub enum RbacError {
    /// A uniqueness constraint would be violated
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// A referenced or targeted entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Request field validation failed
    #[oai(status = 400)]
    ValidationFailed(Json<ValidationErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

impl RbacError {
    pub fn conflict(message: String) -> Self {
        RbacError::Conflict(Json(ErrorBody {
            error: "already_exists".to_string(),
            message,
            status_code: 409,
        }))
    }

    pub fn not_found(message: String) -> Self {
        RbacError::NotFound(Json(ErrorBody {
            error: "not_found".to_string(),
            message,
            status_code: 404,
        }))
    }

    pub fn validation_failed(violations: Vec<FieldViolation>) -> Self {
        RbacError::ValidationFailed(Json(ValidationErrorBody {
            error: "validation_failed".to_string(),
            message: "Invalid request parameters".to_string(),
            status_code: 400,
            validation_errors: violations,
        }))
    }

    pub fn internal_error() -> Self {
        RbacError::InternalError(Json(ErrorBody {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            status_code: 500,
        }))
    }
}

impl From<InternalError> for RbacError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Conflict { .. } => RbacError::conflict(err.to_string()),
            InternalError::NotFound { .. } => RbacError::not_found(err.to_string()),
            // Storage and crypto failures are logged with full context but
            // surfaced as a generic failure without internal detail.
            InternalError::Database(_) | InternalError::Crypto { .. } => {
                tracing::error!("Internal error: {}", err);
                RbacError::internal_error()
            }
        }
    }
}
