//! # Daily Closing
//!
//! Aggregation of a day's sales into payment-method buckets, the closing
//! time window, and the per-date closing state machine.
//!
//! ## Closing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   sales of the day ──► ClosingTotals::aggregate ──► ClosingSummary      │
//! │                                                        │                │
//! │   local time ──► ClosingWindow::check ─── too early ──►│ ClosingNotAllowed
//! │                                                        │                │
//! │   record exists? ──► ClosingState::close ── Closed ───►│ AlreadyClosed  │
//! │                                                        ▼                │
//! │                                              DailyClosing (immutable)   │
//! │                                                                         │
//! │   State per date:   OPEN ──close──► CLOSED   (terminal)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here reads a clock or a store. Callers pass the current time and
//! the existence check result in.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DailyClosing, PaymentMethod, Sale};

/// Default hour (local) from which a day may be closed.
pub const DEFAULT_CLOSING_HOUR: u32 = 5;

// =============================================================================
// Totals
// =============================================================================

/// Bucketed sums for a set of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClosingTotals {
    pub total: Money,
    pub cash: Money,
    pub pix: Money,
    pub debit: Money,
    pub credit: Money,
    pub count: i64,
}

impl ClosingTotals {
    /// Sums `sales` into the buckets.
    ///
    /// Every sale adds its total to `total`; each present leg adds its value
    /// to the bucket of its method. The result does not depend on order.
    ///
    /// ## Example
    /// ```rust
    /// use tourdesk_core::{ClosingTotals, Money, Sale};
    ///
    /// let none: Vec<Sale> = Vec::new();
    /// let totals = ClosingTotals::aggregate(&none);
    /// assert_eq!(totals.count, 0);
    /// assert_eq!(totals.total, Money::zero());
    /// ```
    pub fn aggregate<I, S>(sales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Sale>,
    {
        let mut totals = ClosingTotals::default();
        for sale in sales {
            totals.add_sale(sale.as_ref());
        }
        totals
    }

    fn add_sale(&mut self, sale: &Sale) {
        self.total += sale.total();
        self.count += 1;
        for leg in sale.legs() {
            *self.bucket_mut(leg.method) += leg.amount();
        }
    }

    fn bucket_mut(&mut self, method: PaymentMethod) -> &mut Money {
        match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Pix => &mut self.pix,
            PaymentMethod::Debit => &mut self.debit,
            PaymentMethod::Credit => &mut self.credit,
        }
    }

    /// The bucket for one method.
    pub fn by_method(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Pix => self.pix,
            PaymentMethod::Debit => self.debit,
            PaymentMethod::Credit => self.credit,
        }
    }
}

impl From<&DailyClosing> for ClosingTotals {
    fn from(closing: &DailyClosing) -> Self {
        ClosingTotals {
            total: Money::from_cents(closing.total_cents),
            cash: Money::from_cents(closing.cash_cents),
            pix: Money::from_cents(closing.pix_cents),
            debit: Money::from_cents(closing.debit_cents),
            credit: Money::from_cents(closing.credit_cents),
            count: closing.sale_count,
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// What gets written when a day is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClosingSummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub totals: ClosingTotals,
}

impl ClosingSummary {
    pub fn from_sales<I, S>(date: NaiveDate, sales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Sale>,
    {
        ClosingSummary {
            date,
            totals: ClosingTotals::aggregate(sales),
        }
    }

    /// The closing record for this summary.
    pub fn into_closing(self, id: String, created_at: DateTime<Utc>) -> DailyClosing {
        DailyClosing {
            id,
            date: self.date,
            created_at,
            total_cents: self.totals.total.cents(),
            cash_cents: self.totals.cash.cents(),
            pix_cents: self.totals.pix.cents(),
            debit_cents: self.totals.debit.cents(),
            credit_cents: self.totals.credit.cents(),
            sale_count: self.totals.count,
        }
    }
}

// =============================================================================
// Window
// =============================================================================

/// Time-of-day gate: closing is allowed from `opens_at_hour`:00 local time
/// until midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClosingWindow {
    pub opens_at_hour: u32,
}

impl Default for ClosingWindow {
    fn default() -> Self {
        ClosingWindow {
            opens_at_hour: DEFAULT_CLOSING_HOUR,
        }
    }
}

impl ClosingWindow {
    pub fn new(opens_at_hour: u32) -> Result<Self, ValidationError> {
        if opens_at_hour > 23 {
            return Err(ValidationError::OutOfRange {
                field: "opens_at_hour".to_string(),
                min: 0,
                max: 23,
            });
        }
        Ok(ClosingWindow { opens_at_hour })
    }

    /// True when `local_time` is at or after the opening hour.
    pub fn is_eligible_at(&self, local_time: NaiveTime) -> bool {
        local_time.hour() >= self.opens_at_hour
    }

    pub fn check(&self, local_time: NaiveTime) -> CoreResult<()> {
        if self.is_eligible_at(local_time) {
            Ok(())
        } else {
            Err(CoreError::ClosingNotAllowed {
                opens_at_hour: self.opens_at_hour,
            })
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Closing state of one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClosingState {
    /// No closing record exists.
    Open,
    /// A closing record exists. Terminal.
    Closed,
}

impl ClosingState {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            ClosingState::Closed
        } else {
            ClosingState::Open
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ClosingState::Closed)
    }

    /// OPEN → CLOSED. A closed date stays closed.
    pub fn close(self, date: NaiveDate) -> CoreResult<ClosingState> {
        match self {
            ClosingState::Open => Ok(ClosingState::Closed),
            ClosingState::Closed => Err(CoreError::AlreadyClosed { date }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(id: &str, leg1: (PaymentMethod, i64), leg2: Option<(PaymentMethod, i64)>) -> Sale {
        Sale {
            id: id.to_string(),
            created_at: Utc::now(),
            total_cents: leg1.1 + leg2.map_or(0, |(_, v)| v),
            payment_method_1: leg1.0,
            payment_value_1_cents: leg1.1,
            payment_method_2: leg2.map(|(m, _)| m),
            payment_value_2_cents: leg2.map(|(_, v)| v),
        }
    }

    fn day_sales() -> Vec<Sale> {
        vec![
            sale("1", (PaymentMethod::Cash, 10_000), None),
            sale("2", (PaymentMethod::Pix, 5_000), None),
            sale("3", (PaymentMethod::Credit, 3_000), None),
        ]
    }

    #[test]
    fn test_aggregate_day_scenario() {
        let totals = ClosingTotals::aggregate(&day_sales());

        assert_eq!(totals.cash.cents(), 10_000);
        assert_eq!(totals.pix.cents(), 5_000);
        assert_eq!(totals.debit.cents(), 0);
        assert_eq!(totals.credit.cents(), 3_000);
        assert_eq!(totals.total.cents(), 18_000);
        assert_eq!(totals.count, 3);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut sales = day_sales();
        sales.push(sale("4", (PaymentMethod::Debit, 700), Some((PaymentMethod::Cash, 300))));
        sales.push(sale("5", (PaymentMethod::Pix, 1_250), Some((PaymentMethod::Credit, 50))));

        let expected = ClosingTotals::aggregate(&sales);
        for shift in 1..sales.len() {
            sales.rotate_left(shift);
            assert_eq!(ClosingTotals::aggregate(&sales), expected);
        }
        sales.reverse();
        assert_eq!(ClosingTotals::aggregate(&sales), expected);
    }

    #[test]
    fn test_split_sale_feeds_two_buckets() {
        let sales = vec![sale("1", (PaymentMethod::Cash, 10_000), Some((PaymentMethod::Pix, 2_500)))];
        let totals = ClosingTotals::aggregate(&sales);

        assert_eq!(totals.by_method(PaymentMethod::Cash).cents(), 10_000);
        assert_eq!(totals.by_method(PaymentMethod::Pix).cents(), 2_500);
        assert_eq!(totals.total.cents(), 12_500);
        assert_eq!(totals.count, 1);
    }

    #[test]
    fn test_summary_into_closing_record() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let summary = ClosingSummary::from_sales(date, &day_sales());
        let record = summary.into_closing("c-1".to_string(), Utc::now());

        assert_eq!(record.date, date);
        assert_eq!(record.total_cents, 18_000);
        assert_eq!(record.cash_cents, 10_000);
        assert_eq!(record.sale_count, 3);
        assert_eq!(ClosingTotals::from(&record), summary.totals);
    }

    #[test]
    fn test_window_boundaries() {
        let window = ClosingWindow::default();
        for hour in 0..5 {
            let t = NaiveTime::from_hms_opt(hour, 59, 59).unwrap();
            assert!(!window.is_eligible_at(t), "hour {} should be closed", hour);
        }
        for hour in 5..24 {
            let t = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
            assert!(window.is_eligible_at(t), "hour {} should be open", hour);
        }
        assert!(window.is_eligible_at(NaiveTime::from_hms_opt(5, 0, 0).unwrap()));
    }

    #[test]
    fn test_window_check_error() {
        let window = ClosingWindow::new(6).unwrap();
        let err = window.check(NaiveTime::from_hms_opt(5, 30, 0).unwrap()).unwrap_err();
        assert!(matches!(err, CoreError::ClosingNotAllowed { opens_at_hour: 6 }));
        assert!(ClosingWindow::new(24).is_err());
    }

    #[test]
    fn test_state_machine() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let state = ClosingState::from_exists(false);
        assert_eq!(state.close(date).unwrap(), ClosingState::Closed);

        let err = ClosingState::from_exists(true).close(date).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClosed { date: d } if d == date));
    }
}
