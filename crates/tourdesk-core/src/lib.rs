//! # tourdesk-core: Pure Business Logic for Tour Desk
//!
//! This crate is the **heart** of Tour Desk. It contains the sale and
//! day-closing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tour Desk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (out of scope)                      │   │
//! │  │   Tours ──► Cart ──► Payment split ──► Summary ──► Closing      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tourdesk-register (controller)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tourdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  cart   │ │ payment │ │ closing │ │ history │  │   │
//! │  │   │  Tour   │ │  Cart   │ │  Split  │ │ Totals  │ │ Product │  │   │
//! │  │   │  Sale   │ │CartItem │ │  rules  │ │ Window  │ │ Summary │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  tourdesk-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Tour, Sale, SaleItem, DailyClosing, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Per-audience cart and its total
//! - [`payment`] - Two-leg payment split and its validation
//! - [`closing`] - Day aggregation, closing window, closing state
//! - [`history`] - Per-product sales reconstruction from sale items
//! - [`calendar`] - Business-day boundaries (UTC-normalized)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tourdesk_core::money::Money;
//! use tourdesk_core::payment::PaymentSplit;
//! use tourdesk_core::types::PaymentMethod;
//!
//! let cart_total = Money::from_cents(12_500);
//! let split = PaymentSplit::split(
//!     PaymentMethod::Cash,
//!     Money::from_cents(10_000),
//!     PaymentMethod::Pix,
//!     Money::from_cents(2_500),
//! );
//!
//! assert!(split.validate_against(cart_total).is_ok());
//! assert_eq!(split.total(), cart_total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod cart;
pub mod closing;
pub mod error;
pub mod history;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use closing::{ClosingState, ClosingSummary, ClosingTotals, ClosingWindow};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::ProductSummary;
pub use money::Money;
pub use payment::PaymentSplit;
pub use types::*;
