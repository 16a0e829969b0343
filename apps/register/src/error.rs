//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tour Desk                              │
//! │                                                                         │
//! │  UI shell                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('close_today')                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  No database? ───────────────────── NOT_CONFIGURED ─────────────►│  │
//! │  │  No session? ────────────────────── UNAUTHORIZED ───────────────►│  │
//! │  │  Rule broken? ── CoreError::AlreadyClosed ── ALREADY_CLOSED ────►│  │
//! │  │  Store failed? ─ DbError::QueryFailed ────── DATABASE_ERROR ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code = "ALREADY_CLOSED"                                         │
//! │    // e.message = "Day 2024-06-01 is already closed"                    │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ALREADY_CLOSED` is never folded into `DATABASE_ERROR`: the operator
//! must see "already closed", not "try again".

use serde::Serialize;
use tourdesk_core::{CoreError, ValidationError};
use tourdesk_db::DbError;

/// API error returned from commands.
///
/// ```json
/// {
///   "code": "PAYMENT_ERROR",
///   "message": "Payment total R$ 120.00 does not match cart total R$ 125.00"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Store rejected a read or write
    DatabaseError,

    /// No database is available; writes fail before any I/O
    NotConfigured,

    /// Write attempted without a signed-in operator
    Unauthorized,

    /// A closing record already exists for the date
    AlreadyClosed,

    /// The closing window has not opened yet
    ClosingNotAllowed,

    /// Payment legs do not match the cart, or the cart is empty
    PaymentError,

    /// Internal error
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

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_configured() -> Self {
        ApiError::new(ErrorCode::NotConfigured, "Database is not configured")
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Sign in to perform this action")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::EmptyCart
            | CoreError::PaymentMismatch { .. }
            | CoreError::InvalidPaymentSplit { .. } => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::AlreadyClosed { .. } => ApiError::new(ErrorCode::AlreadyClosed, message),
            CoreError::ClosingNotAllowed { .. } => ApiError::new(ErrorCode::ClosingNotAllowed, message),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
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
    use chrono::NaiveDate;
    use tourdesk_core::Money;

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::not_configured()).unwrap();
        assert_eq!(json["code"], "NOT_CONFIGURED");
        assert_eq!(json["message"], "Database is not configured");
    }

    #[test]
    fn test_already_closed_is_distinct_from_database_error() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = ApiError::from(CoreError::AlreadyClosed { date });
        assert_eq!(err.code, ErrorCode::AlreadyClosed);

        let err = ApiError::from(DbError::QueryFailed("disk I/O error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_payment_errors_map_to_payment_code() {
        let err = ApiError::from(CoreError::PaymentMismatch {
            expected: Money::from_cents(12_500),
            received: Money::from_cents(12_000),
        });
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::PaymentError);
    }

    #[test]
    fn test_display() {
        let err = ApiError::not_found("Tour", "abc");
        assert_eq!(err.to_string(), "[NotFound] Tour not found: abc");
    }
}
