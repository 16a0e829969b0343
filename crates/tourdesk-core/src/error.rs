//! # Error Types
//!
//! Domain-specific error types for tourdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tourdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tourdesk-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  tourdesk-register errors (app)                                        │
//! │  └── ApiError         - What the UI shell sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError ← DbError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent rule violations detected before (or instead of) any
/// store access. The controller layer maps each one to a user-facing code.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart holds nothing billable.
    #[error("Cart is empty")]
    EmptyCart,

    /// The payment legs do not add up to the cart total.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart total:   R$ 125.00
    /// Leg 1 (CASH): R$ 100.00
    /// Leg 2 (PIX):  R$  20.00
    ///      │
    ///      ▼
    /// PaymentMismatch { expected: R$ 125.00, received: R$ 120.00 }
    /// ```
    #[error("Payment total {received} does not match cart total {expected}")]
    PaymentMismatch { expected: Money, received: Money },

    /// The payment legs are malformed (missing value, useless second leg...).
    #[error("Invalid payment split: {reason}")]
    InvalidPaymentSplit { reason: String },

    /// A closing record already exists for the date.
    #[error("Day {date} is already closed")]
    AlreadyClosed { date: NaiveDate },

    /// The closing window has not opened yet.
    #[error("Closing is only allowed from {opens_at_hour:02}:00")]
    ClosingNotAllowed { opens_at_hour: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PaymentMismatch {
            expected: Money::from_cents(12_500),
            received: Money::from_cents(12_000),
        };
        assert_eq!(
            err.to_string(),
            "Payment total R$ 120.00 does not match cart total R$ 125.00"
        );

        let err = CoreError::ClosingNotAllowed { opens_at_hour: 5 };
        assert_eq!(err.to_string(), "Closing is only allowed from 05:00");

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = CoreError::AlreadyClosed { date };
        assert_eq!(err.to_string(), "Day 2024-06-01 is already closed");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
