//! # Payment Split
//!
//! A sale is paid with one or two legs. This module checks a proposed split
//! against the cart total before anything is written.
//!
//! ## Validation Order
//! ```text
//! cart total > 0 ?──────────── no ──► EmptyCart
//!      │ yes
//! value1 > 0 ?───────────────── no ──► MustBePositive
//!      │ yes
//! method2/value2 paired ?────── no ──► InvalidPaymentSplit
//!      │ yes
//! leg 2 needed and > 0 ?─────── no ──► InvalidPaymentSplit
//!      │ yes
//! |value1 + value2 - total| ≤ 0.01 ?── no ──► PaymentMismatch
//!      │ yes
//!      ▼
//!     Ok
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentLeg, PaymentMethod};

/// Largest accepted difference between the legs' sum and the cart total.
pub const PAYMENT_TOLERANCE: Money = Money::from_cents(1);

/// How the operator intends to pay for the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub method1: PaymentMethod,
    pub value1: Money,
    pub method2: Option<PaymentMethod>,
    pub value2: Option<Money>,
}

impl PaymentSplit {
    /// The whole amount on one method.
    pub fn single(method: PaymentMethod, value: Money) -> Self {
        PaymentSplit {
            method1: method,
            value1: value,
            method2: None,
            value2: None,
        }
    }

    /// Two legs.
    pub fn split(method1: PaymentMethod, value1: Money, method2: PaymentMethod, value2: Money) -> Self {
        PaymentSplit {
            method1,
            value1,
            method2: Some(method2),
            value2: Some(value2),
        }
    }

    /// Amount recorded as the sale total: `value1 + (value2 ?? 0)`.
    pub fn total(&self) -> Money {
        self.value1 + self.value2.unwrap_or_default()
    }

    /// Present legs, first one first.
    pub fn legs(&self) -> Vec<PaymentLeg> {
        let mut legs = vec![PaymentLeg::new(self.method1, self.value1)];
        if let (Some(method), Some(value)) = (self.method2, self.value2) {
            legs.push(PaymentLeg::new(method, value));
        }
        legs
    }

    /// Checks the split against the cart total.
    ///
    /// ## Example
    /// ```rust
    /// use tourdesk_core::{CoreError, Money, PaymentMethod, PaymentSplit};
    ///
    /// let split = PaymentSplit::single(PaymentMethod::Cash, Money::from_cents(9_000));
    /// let err = split.validate_against(Money::from_cents(10_000)).unwrap_err();
    /// assert!(matches!(err, CoreError::PaymentMismatch { .. }));
    /// ```
    pub fn validate_against(&self, cart_total: Money) -> CoreResult<()> {
        if !cart_total.is_positive() {
            return Err(CoreError::EmptyCart);
        }

        if !self.value1.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "value1".to_string(),
            }
            .into());
        }

        match (self.method2, self.value2) {
            (None, None) => {}
            (Some(_), Some(value2)) => {
                if !value2.is_positive() {
                    return Err(CoreError::InvalidPaymentSplit {
                        reason: "second payment value must be positive".to_string(),
                    });
                }
                if self.value1 >= cart_total {
                    return Err(CoreError::InvalidPaymentSplit {
                        reason: "first payment already covers the total".to_string(),
                    });
                }
            }
            _ => {
                return Err(CoreError::InvalidPaymentSplit {
                    reason: "second payment needs both a method and a value".to_string(),
                });
            }
        }

        let received = self.total();
        if !received.is_within(cart_total, PAYMENT_TOLERANCE) {
            return Err(CoreError::PaymentMismatch {
                expected: cart_total,
                received,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
