//! # Domain Types
//!
//! Core domain types used throughout Tour Desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Tour       │   │      Sale       │   │  DailyClosing   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  date (unique)  │       │
//! │  │  name, kind     │   │  total_cents    │   │  total_cents    │       │
//! │  │  3 unit prices  │   │  leg 1 (+ 2)    │   │  4 buckets      │       │
//! │  │  active (soft)  │   │                 │   │  sale_count     │       │
//! │  └────────▲────────┘   └────────┬────────┘   └─────────────────┘       │
//! │           │ weak ref            │ owns (cascade)                        │
//! │  ┌────────┴────────────────────▼────────┐                              │
//! │  │               SaleItem                │                              │
//! │  │  3 quantities + 3 unit prices frozen  │                              │
//! │  │  at sale time                         │                              │
//! │  └───────────────────────────────────────┘                              │
//! │                                                                         │
//! │  PaymentMethod: CASH | PIX | DEBIT | CREDIT                             │
//! │  AudienceType:  Adult | Child | Native                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Audience Type
// =============================================================================

/// Who a ticket is for. Each audience has its own unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AudienceType {
    Adult,
    Child,
    /// Native resident (local discount price).
    Native,
}

impl AudienceType {
    /// Every audience, in display order.
    pub const ALL: [AudienceType; 3] = [AudienceType::Adult, AudienceType::Child, AudienceType::Native];
}

// =============================================================================
// Payment Method
// =============================================================================

/// A closed set of payment methods.
///
/// Adding a method is a compile-time-checked change: every `match` on it
/// (closing buckets included) must be updated.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Physical cash ("dinheiro").
    Cash,
    /// Instant bank transfer.
    Pix,
    /// Debit card on an external terminal.
    Debit,
    /// Credit card on an external terminal.
    Credit,
}

impl PaymentMethod {
    /// Every payment method, in display order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
    ];

    /// Stored/wire code.
    pub const fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debit => "DEBIT",
            PaymentMethod::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Accepts the English codes and the Portuguese labels used at the counter.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "pix" => Ok(PaymentMethod::Pix),
            "debit" | "debito" | "débito" => Ok(PaymentMethod::Debit),
            "credit" | "credito" | "crédito" => Ok(PaymentMethod::Credit),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Tour
// =============================================================================

/// A sellable tour with per-audience pricing.
///
/// Tours are never hard-deleted: sale items keep referencing them, so
/// removal flips `active` to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Tour {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the operator.
    pub name: String,

    /// Category / type of tour (boat, trail, city...).
    pub kind: String,

    /// Adult unit price in cents.
    pub price_adult_cents: i64,

    /// Child unit price in cents.
    pub price_child_cents: i64,

    /// Native-resident unit price in cents.
    pub price_native_cents: i64,

    /// Display icon (emoji or icon key).
    pub icon: String,

    /// Whether the tour is sellable (soft delete flag).
    pub active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Tour {
    /// Current unit price for an audience.
    pub fn price_for(&self, audience: AudienceType) -> Money {
        Money::from_cents(match audience {
            AudienceType::Adult => self.price_adult_cents,
            AudienceType::Child => self.price_child_cents,
            AudienceType::Native => self.price_native_cents,
        })
    }
}

/// Create/update payload for a tour. `id = None` creates a new tour.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TourInput {
    pub id: Option<String>,
    pub name: String,
    pub kind: String,
    pub price_adult_cents: i64,
    pub price_child_cents: i64,
    pub price_native_cents: i64,
    pub icon: String,
}

// =============================================================================
// Sale
// =============================================================================

/// One (method, value) pair of a sale's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentLeg {
    pub method: PaymentMethod,
    pub amount_cents: i64,
}

impl PaymentLeg {
    pub fn new(method: PaymentMethod, amount: Money) -> Self {
        PaymentLeg {
            method,
            amount_cents: amount.cents(),
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A completed sale, paid with one or two legs.
///
/// ## Invariant
/// `payment_value_1 + payment_value_2 == total` (±1 cent). Leg 2 exists only
/// when leg 1 did not cover the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub payment_method_1: PaymentMethod,
    pub payment_value_1_cents: i64,
    pub payment_method_2: Option<PaymentMethod>,
    pub payment_value_2_cents: Option<i64>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// The first leg.
    pub fn first_leg(&self) -> PaymentLeg {
        PaymentLeg {
            method: self.payment_method_1,
            amount_cents: self.payment_value_1_cents,
        }
    }

    /// The second leg, only when both its method and value are present.
    pub fn second_leg(&self) -> Option<PaymentLeg> {
        match (self.payment_method_2, self.payment_value_2_cents) {
            (Some(method), Some(amount_cents)) => Some(PaymentLeg { method, amount_cents }),
            _ => None,
        }
    }

    /// All present legs, first one first.
    pub fn legs(&self) -> impl Iterator<Item = PaymentLeg> {
        std::iter::once(self.first_leg()).chain(self.second_leg())
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line of a sale.
///
/// Unit prices are frozen at sale time so history stays computable even
/// after a tour's price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub tour_id: String,
    pub qty_adult: i64,
    pub qty_child: i64,
    pub qty_native: i64,
    pub unit_price_adult_cents: i64,
    pub unit_price_child_cents: i64,
    pub unit_price_native_cents: i64,
}

impl SaleItem {
    pub fn quantity(&self, audience: AudienceType) -> i64 {
        match audience {
            AudienceType::Adult => self.qty_adult,
            AudienceType::Child => self.qty_child,
            AudienceType::Native => self.qty_native,
        }
    }

    pub fn unit_price(&self, audience: AudienceType) -> Money {
        Money::from_cents(match audience {
            AudienceType::Adult => self.unit_price_adult_cents,
            AudienceType::Child => self.unit_price_child_cents,
            AudienceType::Native => self.unit_price_native_cents,
        })
    }

    /// Σ quantity × frozen unit price over the three audiences.
    pub fn line_total(&self) -> Money {
        AudienceType::ALL
            .iter()
            .map(|&a| self.unit_price(a).multiply_quantity(self.quantity(a)))
            .sum()
    }
}

/// A sale item joined with its tour's display fields.
///
/// `tour_name`/`tour_icon` are `None` when the tour row no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItemDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: SaleItem,
    pub tour_name: Option<String>,
    pub tour_icon: Option<String>,
}

/// A sale with its nested items (sale → sale_items → tour).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
}

impl AsRef<Sale> for Sale {
    fn as_ref(&self) -> &Sale {
        self
    }
}

impl AsRef<Sale> for SaleWithItems {
    fn as_ref(&self) -> &Sale {
        &self.sale
    }
}

// =============================================================================
// Daily Closing
// =============================================================================

/// The immutable end-of-day record. At most one exists per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailyClosing {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub cash_cents: i64,
    pub pix_cents: i64,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub sale_count: i64,
}

impl DailyClosing {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
