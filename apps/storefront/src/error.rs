//! # Storefront Errors
//!
//! Two error types live here:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StorefrontError  - things the runtime does: config, snapshots, I/O     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ApiError         - what a command returns to the page: { code, msg }   │
//! │        ▲                                                                │
//! │        │                                                                │
//! │  CoreError        - checkout transitions, unknown products              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mildar_core::CoreError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Storefront Error
// =============================================================================

/// Result type alias for runtime operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Runtime failures: configuration, persistence and I/O.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cart snapshot has a layout this build does not understand.
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshot { found: u32, expected: u32 },

    /// Catalog file failed to build.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CoreError),

    /// Payment timer or snapshot task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CHECKOUT_ERROR",
///   "message": "Cannot go back while browsing"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout step not allowed right now
    CheckoutError,

    /// Cart-level precondition failed (e.g. empty cart)
    CartError,

    /// Unparseable shell input
    BadRequest,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::CheckoutError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
        }
    }
}

/// Converts runtime errors to API errors.
impl From<StorefrontError> for ApiError {
    fn from(err: StorefrontError) -> Self {
        match err {
            StorefrontError::Catalog(core) => ApiError::from(core),
            other => {
                tracing::error!("Storefront error: {}", other);
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use mildar_core::{CheckoutPhase, ValidationError};

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::ProductNotFound("goat-milk".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: goat-milk");

        let err = ApiError::from(CoreError::EmptyCart);
        assert_eq!(err.code, ErrorCode::CartError);

        let err = ApiError::from(CoreError::InvalidTransition {
            phase: CheckoutPhase::Browsing,
            action: "go back",
        });
        assert_eq!(err.code, ErrorCode::CheckoutError);

        let err = ApiError::from(CoreError::from(ValidationError::Negative {
            field: "price".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_api_error_json() {
        let err = ApiError::bad_request("unknown command: dance");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["message"], "unknown command: dance");
    }

    #[test]
    fn test_runtime_errors_are_internal() {
        let err = ApiError::from(StorefrontError::UnsupportedSnapshot {
            found: 9,
            expected: 1,
        });
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.message.contains("version 9"));
    }
}
