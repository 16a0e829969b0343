//! # Validation Module
//!
//! Input validation for tour edits and identifiers.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Register command (Rust)                                       │
//! │  ├── Deserialization of the payload                                     │
//! │  └── THIS MODULE: field rules                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE (daily_closings.date)                                       │
//! │  └── Foreign keys (sale_items → sales, tours)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tourdesk_core::validation::{validate_price_cents, validate_tour_name};
//!
//! validate_tour_name("Sunset Boat").unwrap();
//! validate_price_cents("price_adult", 5_000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::TourInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted tour name.
pub const MAX_TOUR_NAME_LEN: usize = 200;

/// Longest accepted tour kind.
pub const MAX_TOUR_KIND_LEN: usize = 50;

/// Longest accepted icon (an emoji or a short icon key).
pub const MAX_ICON_LEN: usize = 32;

/// Highest accepted unit price (R$ 1.000.000,00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a tour name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use tourdesk_core::validation::validate_tour_name;
///
/// assert!(validate_tour_name("Island Hopping").is_ok());
/// assert!(validate_tour_name("  ").is_err());
/// ```
pub fn validate_tour_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_TOUR_NAME_LEN)
}

/// Validates a tour kind (category).
pub fn validate_tour_kind(kind: &str) -> ValidationResult<()> {
    validate_text("kind", kind, MAX_TOUR_KIND_LEN)
}

/// Validates a display icon. Empty is allowed (the UI falls back to a default).
pub fn validate_icon(icon: &str) -> ValidationResult<()> {
    if icon.trim().chars().count() > MAX_ICON_LEN {
        return Err(ValidationError::TooLong {
            field: "icon".to_string(),
            max: MAX_ICON_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in cents. Zero is allowed (free tickets), and
/// prices are bounded by [`MAX_PRICE_CENTS`].
///
/// ## Example
/// ```rust
/// use tourdesk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price_child", 0).is_ok());
/// assert!(validate_price_cents("price_child", -1).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates every field of a tour edit.
pub fn validate_tour_input(input: &TourInput) -> ValidationResult<()> {
    if let Some(id) = &input.id {
        validate_uuid(id)?;
    }
    validate_tour_name(&input.name)?;
    validate_tour_kind(&input.kind)?;
    validate_icon(&input.icon)?;
    validate_price_cents("price_adult", input.price_adult_cents)?;
    validate_price_cents("price_child", input.price_child_cents)?;
    validate_price_cents("price_native", input.price_native_cents)?;
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use tourdesk_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
