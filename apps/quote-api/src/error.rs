//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Solar Quote                            │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  POST /api/calculate-quote                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad body? ─────── JsonRejection ─────────────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Validation? ───── ValidationError ──────────── ApiError ──────►│  │
//! │  │         │                                          ▲             │  │
//! │  │         ▼                                          │             │  │
//! │  │  Empty catalog? ── CoreError::NoEligibleEquipment ─┘             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  HTTP 400 { "code": "VALIDATION_ERROR",                                 │
//! │             "message": "customerName is required" }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use solar_catalog::CatalogError;
use solar_core::{CoreError, ValidationError};

/// API error returned from handlers.
///
/// ## Serialization
/// This is the body a client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Quote not found: 7b1e…"
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

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Request was valid but cannot be served, e.g. an empty category (422)
    BusinessLogic,

    /// Catalog could not be read or written (500)
    CatalogError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::CatalogError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoEligibleEquipment { .. } | CoreError::AmountOverflow => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts catalog errors to API errors.
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            // Upload problems are the client's to fix.
            CatalogError::Parse(_) | CatalogError::Invalid(_) => ApiError::validation(err.to_string()),
            CatalogError::Io { ref path, ref source } => {
                tracing::error!(path = %path.display(), "Catalog I/O failed: {}", source);
                ApiError::new(ErrorCode::CatalogError, "Catalog storage failed")
            }
            CatalogError::Serialize(e) => {
                tracing::error!("Catalog serialization failed: {}", e);
                ApiError::new(ErrorCode::CatalogError, "Catalog storage failed")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use solar_core::EquipmentCategory;

    #[test]
    fn test_error_code_serialization() {
        let err = ApiError::not_found("Quote", "abc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Quote not found: abc");
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::NoEligibleEquipment {
            category: EquipmentCategory::Inverter,
        }
        .into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::AmountOverflow.into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Quote amounts exceed the supported range");

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "customerName".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "customerName is required");
    }

    #[test]
    fn test_catalog_error_mapping_hides_paths() {
        let err: ApiError = CatalogError::io(
            "/srv/secret/catalog.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        )
        .into();
        assert_eq!(err.code, ErrorCode::CatalogError);
        assert!(!err.message.contains("/srv/secret"));

        let err: ApiError = CatalogError::Invalid(ValidationError::Duplicate {
            field: "code".into(),
            value: "PV-1".into(),
        })
        .into();
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::validation("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
