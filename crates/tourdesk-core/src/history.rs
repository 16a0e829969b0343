//! # Product History
//!
//! Rebuilds "what was sold" per tour from the flat item ledger of a set of
//! sales. Only frozen item prices are used, never live tour prices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{AudienceType, SaleWithItems};

/// Name shown for items whose tour row no longer exists.
pub const UNKNOWN_TOUR_NAME: &str = "Unknown tour";

/// Icon shown for items whose tour row no longer exists.
pub const UNKNOWN_TOUR_ICON: &str = "?";

/// Sold quantities and revenue of one tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub tour_id: String,
    pub tour_name: String,
    pub icon: String,
    pub qty_adult: i64,
    pub qty_child: i64,
    pub qty_native: i64,
    pub total_value: Money,
}

impl ProductSummary {
    fn empty(tour_id: &str, tour_name: Option<&str>, icon: Option<&str>) -> Self {
        ProductSummary {
            tour_id: tour_id.to_string(),
            tour_name: tour_name.unwrap_or(UNKNOWN_TOUR_NAME).to_string(),
            icon: icon.unwrap_or(UNKNOWN_TOUR_ICON).to_string(),
            qty_adult: 0,
            qty_child: 0,
            qty_native: 0,
            total_value: Money::zero(),
        }
    }

    /// Combined tickets over all audiences.
    pub fn total_quantity(&self) -> i64 {
        self.qty_adult + self.qty_child + self.qty_native
    }

    pub fn quantity(&self, audience: AudienceType) -> i64 {
        match audience {
            AudienceType::Adult => self.qty_adult,
            AudienceType::Child => self.qty_child,
            AudienceType::Native => self.qty_native,
        }
    }
}

/// Per-tour summaries, highest revenue first (ties by name).
pub fn summarize_by_product(sales: &[SaleWithItems]) -> Vec<ProductSummary> {
    let mut by_tour: HashMap<&str, ProductSummary> = HashMap::new();

    for detail in sales.iter().flat_map(|s| s.items.iter()) {
        let item = &detail.item;
        let summary = by_tour.entry(item.tour_id.as_str()).or_insert_with(|| {
            ProductSummary::empty(&item.tour_id, detail.tour_name.as_deref(), detail.tour_icon.as_deref())
        });

        summary.qty_adult += item.qty_adult;
        summary.qty_child += item.qty_child;
        summary.qty_native += item.qty_native;
        summary.total_value += item.line_total();
    }

    let mut summaries: Vec<ProductSummary> = by_tour.into_values().collect();
    summaries.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.tour_name.cmp(&b.tour_name))
            .then_with(|| a.tour_id.cmp(&b.tour_id))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, Sale, SaleItem, SaleItemDetail};
    use chrono::Utc;

    fn item(sale_id: &str, tour_id: &str, qty: (i64, i64, i64), prices: (i64, i64, i64)) -> SaleItem {
        SaleItem {
            id: format!("{}-{}", sale_id, tour_id),
            sale_id: sale_id.to_string(),
            tour_id: tour_id.to_string(),
            qty_adult: qty.0,
            qty_child: qty.1,
            qty_native: qty.2,
            unit_price_adult_cents: prices.0,
            unit_price_child_cents: prices.1,
            unit_price_native_cents: prices.2,
        }
    }

    fn sale(id: &str, items: Vec<(SaleItem, Option<&str>)>) -> SaleWithItems {
        let items: Vec<SaleItemDetail> = items
            .into_iter()
            .map(|(item, name)| SaleItemDetail {
                item,
                tour_name: name.map(str::to_string),
                tour_icon: name.map(|_| "🚤".to_string()),
            })
            .collect();
        let total: i64 = items.iter().map(|d| d.item.line_total().cents()).sum();
        SaleWithItems {
            sale: Sale {
                id: id.to_string(),
                created_at: Utc::now(),
                total_cents: total,
                payment_method_1: PaymentMethod::Cash,
                payment_value_1_cents: total,
                payment_method_2: None,
                payment_value_2_cents: None,
            },
            items,
        }
    }

    #[test]
    fn test_accumulates_across_sales() {
        let sales = vec![
            sale("s1", vec![(item("s1", "boat", (2, 1, 0), (5_000, 2_500, 1_000)), Some("Boat"))]),
            sale(
                "s2",
                vec![
                    (item("s2", "boat", (1, 0, 2), (6_000, 3_000, 1_500)), Some("Boat")),
                    (item("s2", "trail", (1, 0, 0), (4_000, 2_000, 1_000)), Some("Trail")),
                ],
            ),
        ];

        let summaries = summarize_by_product(&sales);
        assert_eq!(summaries.len(), 2);

        let boat = &summaries[0];
        assert_eq!(boat.tour_name, "Boat");
        assert_eq!((boat.qty_adult, boat.qty_child, boat.qty_native), (3, 1, 2));
        // frozen prices per sale, not one price for the whole history
        assert_eq!(boat.total_value.cents(), 12_500 + 6_000 + 3_000);
        assert_eq!(boat.total_quantity(), 6);

        assert_eq!(summaries[1].tour_name, "Trail");
        assert_eq!(summaries[1].quantity(AudienceType::Adult), 1);
    }

    #[test]
    fn test_sorted_by_revenue_desc() {
        let sales = vec![sale(
            "s1",
            vec![
                (item("s1", "a", (1, 0, 0), (1_000, 0, 0)), Some("Alpha")),
                (item("s1", "b", (1, 0, 0), (9_000, 0, 0)), Some("Bravo")),
                (item("s1", "c", (1, 0, 0), (5_000, 0, 0)), Some("Charlie")),
            ],
        )];

        let names: Vec<_> = summarize_by_product(&sales)
            .into_iter()
            .map(|s| s.tour_name)
            .collect();
        assert_eq!(names, vec!["Bravo", "Charlie", "Alpha"]);
    }

    #[test]
    fn test_missing_tour_uses_placeholder() {
        let sales = vec![sale("s1", vec![(item("s1", "gone", (1, 0, 0), (1_000, 0, 0)), None)])];

        let summaries = summarize_by_product(&sales);
        assert_eq!(summaries[0].tour_name, UNKNOWN_TOUR_NAME);
        assert_eq!(summaries[0].icon, UNKNOWN_TOUR_ICON);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_by_product(&[]).is_empty());
    }
}
