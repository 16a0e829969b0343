//! # Cart Module
//!
//! The per-audience shopping cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action         Cart Method               Change               │
//! │  ───────────────         ───────────               ──────               │
//! │                                                                         │
//! │  Tap tour + audience ──► add(tour, audience) ────► qty[aud] += 1        │
//! │                                                   (new item if absent)  │
//! │                                                                         │
//! │  +/- on a counter ─────► update_quantity(..) ────► qty = clamp(q + d)   │
//! │                                                   (prune if all zero)   │
//! │                                                                         │
//! │  Remove ───────────────► remove(tour_id) ────────► item dropped         │
//! │                                                                         │
//! │  Any read ─────────────► total() ────────────────► Σ qty × price        │
//! │                                                                         │
//! │  NOTE: every operation is total. Unknown tour ids are no-ops and every  │
//! │  counter stays within 0..=MAX_TICKETS_PER_AUDIENCE.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{AudienceType, SaleItem, Tour};

/// Upper bound for one audience counter of one cart item.
pub const MAX_TICKETS_PER_AUDIENCE: i64 = 999;

// =============================================================================
// Cart Item
// =============================================================================

/// One tour in the cart with its three audience counters.
///
/// Name, icon and prices are copied from the tour when the item is created,
/// so later edits to the tour do not change what the operator is charging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub tour_id: String,
    pub name: String,
    pub icon: String,
    pub price_adult_cents: i64,
    pub price_child_cents: i64,
    pub price_native_cents: i64,
    pub qty_adult: i64,
    pub qty_child: i64,
    pub qty_native: i64,
}

impl CartItem {
    /// Creates an item with every counter at zero.
    pub fn from_tour(tour: &Tour) -> Self {
        CartItem {
            tour_id: tour.id.clone(),
            name: tour.name.clone(),
            icon: tour.icon.clone(),
            price_adult_cents: tour.price_adult_cents,
            price_child_cents: tour.price_child_cents,
            price_native_cents: tour.price_native_cents,
            qty_adult: 0,
            qty_child: 0,
            qty_native: 0,
        }
    }

    pub fn quantity(&self, audience: AudienceType) -> i64 {
        match audience {
            AudienceType::Adult => self.qty_adult,
            AudienceType::Child => self.qty_child,
            AudienceType::Native => self.qty_native,
        }
    }

    fn quantity_mut(&mut self, audience: AudienceType) -> &mut i64 {
        match audience {
            AudienceType::Adult => &mut self.qty_adult,
            AudienceType::Child => &mut self.qty_child,
            AudienceType::Native => &mut self.qty_native,
        }
    }

    pub fn unit_price(&self, audience: AudienceType) -> Money {
        Money::from_cents(match audience {
            AudienceType::Adult => self.price_adult_cents,
            AudienceType::Child => self.price_child_cents,
            AudienceType::Native => self.price_native_cents,
        })
    }

    /// Σ quantity × unit price over the three audiences.
    pub fn line_total(&self) -> Money {
        AudienceType::ALL
            .iter()
            .map(|&a| self.unit_price(a).multiply_quantity(self.quantity(a)))
            .sum()
    }

    /// True when all three counters are zero.
    pub fn is_empty(&self) -> bool {
        self.qty_adult == 0 && self.qty_child == 0 && self.qty_native == 0
    }

    /// Builds the persisted line for this item.
    ///
    /// Unit prices come from the cart item, never from the live tour.
    pub fn to_sale_item(&self, sale_id: &str) -> SaleItem {
        SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            tour_id: self.tour_id.clone(),
            qty_adult: self.qty_adult,
            qty_child: self.qty_child,
            qty_native: self.qty_native,
            unit_price_adult_cents: self.price_adult_cents,
            unit_price_child_cents: self.price_child_cents,
            unit_price_native_cents: self.price_native_cents,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart being built at the counter.
///
/// ## Invariants
/// - Items are unique by `tour_id` (adding the same tour again increments it)
/// - Every counter is in `0..=MAX_TICKETS_PER_AUDIENCE`
/// - No item has all three counters at 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one ticket of `audience` for `tour`.
    ///
    /// Creates the item (capturing the tour's current prices) when the tour is
    /// not in the cart yet, otherwise increments only that audience. A counter
    /// already at [`MAX_TICKETS_PER_AUDIENCE`] stays there.
    pub fn add(&mut self, tour: &Tour, audience: AudienceType) {
        if let Some(item) = self.items.iter_mut().find(|i| i.tour_id == tour.id) {
            let qty = item.quantity_mut(audience);
            *qty = qty.saturating_add(1).min(MAX_TICKETS_PER_AUDIENCE);
            return;
        }

        let mut item = CartItem::from_tour(tour);
        *item.quantity_mut(audience) = 1;
        self.items.push(item);
    }

    /// Applies `delta` to one counter, clamped to
    /// `0..=MAX_TICKETS_PER_AUDIENCE`.
    ///
    /// The item is removed once all of its counters are zero.
    pub fn update_quantity(&mut self, tour_id: &str, audience: AudienceType, delta: i64) {
        let Some(pos) = self.items.iter().position(|i| i.tour_id == tour_id) else {
            return;
        };

        let item = &mut self.items[pos];
        let qty = item.quantity_mut(audience);
        *qty = qty.saturating_add(delta).clamp(0, MAX_TICKETS_PER_AUDIENCE);

        if item.is_empty() {
            self.items.remove(pos);
        }
    }

    /// Removes a tour from the cart unconditionally.
    pub fn remove(&mut self, tour_id: &str) {
        self.items.retain(|i| i.tour_id != tour_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Σ over items of the per-audience line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct tours in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total tickets across every item and audience.
    pub fn ticket_count(&self) -> i64 {
        self.items
            .iter()
            .map(|i| i.qty_adult + i.qty_child + i.qty_native)
            .sum()
    }

    /// Persisted lines for a sale.
    pub fn to_sale_items(&self, sale_id: &str) -> Vec<SaleItem> {
        self.items.iter().map(|i| i.to_sale_item(sale_id)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tour(id: &str, adult: i64, child: i64, native: i64) -> Tour {
        Tour {
            id: id.to_string(),
            name: format!("Tour {}", id),
            kind: "boat".to_string(),
            price_adult_cents: adult,
            price_child_cents: child,
            price_native_cents: native,
            icon: "⛵".to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_creates_then_increments() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();

        cart.add(&a, AudienceType::Adult);
        cart.add(&a, AudienceType::Adult);
        cart.add(&a, AudienceType::Child);

        assert_eq!(cart.item_count(), 1);
        let item = &cart.items[0];
        assert_eq!(item.qty_adult, 2);
        assert_eq!(item.qty_child, 1);
        assert_eq!(item.qty_native, 0);
        assert_eq!(cart.total().cents(), 12_500);
    }

    #[test]
    fn test_total_over_items_and_audiences() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let b = tour("b", 8_000, 4_000, 3_000);
        let mut cart = Cart::new();

        cart.add(&a, AudienceType::Native);
        cart.add(&b, AudienceType::Adult);
        cart.add(&b, AudienceType::Child);
        cart.add(&b, AudienceType::Child);

        assert_eq!(cart.total().cents(), 1_000 + 8_000 + 2 * 4_000);
        assert_eq!(cart.ticket_count(), 4);
    }

    #[test]
    fn test_prices_are_captured_at_add_time() {
        let mut a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);

        a.price_adult_cents = 9_999;
        cart.add(&a, AudienceType::Adult);

        assert_eq!(cart.total().cents(), 10_000);
    }

    #[test]
    fn test_quantity_floor() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);
        cart.add(&a, AudienceType::Child);

        cart.update_quantity("a", AudienceType::Adult, -10);

        assert_eq!(cart.items[0].qty_adult, 0);
        assert_eq!(cart.items[0].qty_child, 1);
        assert_eq!(cart.total().cents(), 2_500);
    }

    #[test]
    fn test_auto_prune_when_all_counters_zero() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);
        cart.update_quantity("a", AudienceType::Adult, 3);
        assert_eq!(cart.items[0].qty_adult, 4);

        cart.update_quantity("a", AudienceType::Adult, -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_counters_are_capped() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);

        cart.update_quantity("a", AudienceType::Adult, i64::MAX);
        assert_eq!(cart.items[0].qty_adult, MAX_TICKETS_PER_AUDIENCE);
        assert_eq!(cart.total().cents(), 5_000 * MAX_TICKETS_PER_AUDIENCE);

        cart.add(&a, AudienceType::Adult);
        assert_eq!(cart.items[0].qty_adult, MAX_TICKETS_PER_AUDIENCE);

        cart.update_quantity("a", AudienceType::Adult, i64::MIN);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_tour_is_noop() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);

        cart.update_quantity("missing", AudienceType::Adult, -1);
        cart.remove("missing");

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&tour("a", 100, 100, 100), AudienceType::Adult);
        cart.add(&tour("b", 100, 100, 100), AudienceType::Adult);

        cart.remove("a");
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].tour_id, "b");

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_to_sale_items_freeze_cart_prices() {
        let a = tour("a", 5_000, 2_500, 1_000);
        let mut cart = Cart::new();
        cart.add(&a, AudienceType::Adult);
        cart.add(&a, AudienceType::Adult);
        cart.add(&a, AudienceType::Child);

        let items = cart.to_sale_items("sale-1");
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.sale_id, "sale-1");
        assert_eq!(item.tour_id, "a");
        assert_eq!((item.qty_adult, item.qty_child, item.qty_native), (2, 1, 0));
        assert_eq!(item.unit_price_adult_cents, 5_000);
        assert_eq!(item.unit_price_child_cents, 2_500);
        assert_eq!(item.line_total(), cart.total());
    }
}
