//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO sales ...              (must succeed first)              │
//! │    INSERT INTO sale_items ... × N     (prices frozen from the cart)     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction: neither the sale      │
//! │  nor any of its items exist afterwards.                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reading Sales Back
//! Range reads use half-open `[start, end)` bounds on `created_at` and return
//! each sale with its items joined to the tour's name and icon. A missing
//! tour yields `None` for both, never an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use tourdesk_core::{Sale, SaleItem, SaleItemDetail, SaleWithItems};

const SALE_COLUMNS: &str = r#"
    id, created_at, total_cents,
    payment_method_1, payment_value_1_cents,
    payment_method_2, payment_value_2_cents
"#;

const ITEM_DETAIL_COLUMNS: &str = r#"
    si.id, si.sale_id, si.tour_id,
    si.qty_adult, si.qty_child, si.qty_native,
    si.unit_price_adult_cents, si.unit_price_child_cents, si.unit_price_native_cents,
    t.name AS tour_name, t.icon AS tour_icon
"#;

/// Ordering of range reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOrder {
    OldestFirst,
    NewestFirst,
}

impl SaleOrder {
    fn sql(&self) -> &'static str {
        match self {
            SaleOrder::OldestFirst => "ORDER BY created_at ASC, id ASC",
            SaleOrder::NewestFirst => "ORDER BY created_at DESC, id DESC",
        }
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Writes a sale and all of its items in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - an item references a missing tour
    ///   (nothing is written)
    pub async fn create_with_items(&self, sale: &Sale, items: &[SaleItem]) -> DbResult<()> {
        debug!(id = %sale.id, items = items.len(), total = sale.total_cents, "Recording sale");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, created_at, total_cents,
                payment_method_1, payment_value_1_cents,
                payment_method_2, payment_value_2_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.created_at)
        .bind(sale.total_cents)
        .bind(sale.payment_method_1)
        .bind(sale.payment_value_1_cents)
        .bind(sale.payment_method_2)
        .bind(sale.payment_value_2_cents)
        .execute(&mut *tx)
        .await?;

        for item in items {
            let inserted = sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, tour_id,
                    qty_adult, qty_child, qty_native,
                    unit_price_adult_cents, unit_price_child_cents, unit_price_native_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.tour_id)
            .bind(item.qty_adult)
            .bind(item.qty_child)
            .bind(item.qty_native)
            .bind(item.unit_price_adult_cents)
            .bind(item.unit_price_child_cents)
            .bind(item.unit_price_native_cents)
            .execute(&mut *tx)
            .await;

            if let Err(e) = inserted {
                warn!(sale_id = %sale.id, tour_id = %item.tour_id, error = %e, "Sale item rejected, rolling back sale");
                return Err(e.into());
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a sale by ID (without items).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale: Option<Sale> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(sale)
    }

    /// Items of one sale, joined to their tour.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItemDetail>> {
        let sql = format!(
            r#"
            SELECT {ITEM_DETAIL_COLUMNS}
            FROM sale_items si
            LEFT JOIN tours t ON t.id = si.tour_id
            WHERE si.sale_id = ?1
            ORDER BY si.rowid
            "#
        );

        let items: Vec<SaleItemDetail> = sqlx::query_as(&sql).bind(sale_id).fetch_all(&self.pool).await?;

        Ok(items)
    }

    /// Gets a sale with its items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<SaleWithItems>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;
        Ok(Some(SaleWithItems { sale, items }))
    }

    /// Sales created in `[start, end)`, without items.
    pub async fn list_headers_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: SaleOrder,
    ) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE created_at >= ?1 AND created_at < ?2 {}",
            order.sql()
        );

        let sales: Vec<Sale> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Sales created in `[start, end)` with their nested items.
    ///
    /// Two queries: the headers, then every item of those sales in one pass.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: SaleOrder,
    ) -> DbResult<Vec<SaleWithItems>> {
        let sales = self.list_headers_between(start, end, order).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {ITEM_DETAIL_COLUMNS}
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            LEFT JOIN tours t ON t.id = si.tour_id
            WHERE s.created_at >= ?1 AND s.created_at < ?2
            ORDER BY si.rowid
            "#
        );

        let items: Vec<SaleItemDetail> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let mut by_sale: HashMap<String, Vec<SaleItemDetail>> = HashMap::new();
        for item in items {
            by_sale.entry(item.item.sale_id.clone()).or_default().push(item);
        }

        debug!(sales = sales.len(), "Loaded sales with items");

        Ok(sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithItems { sale, items }
            })
            .collect())
    }

    /// Number of items stored for a sale.
    pub async fn count_items(&self, sale_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use tourdesk_core::{PaymentMethod, Tour};
    use uuid::Uuid;

    async fn setup() -> (Database, Tour) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tour = Tour {
            id: Uuid::new_v4().to_string(),
            name: "Sunset Boat".to_string(),
            kind: "boat".to_string(),
            price_adult_cents: 5_000,
            price_child_cents: 2_500,
            price_native_cents: 1_000,
            icon: "⛵".to_string(),
            active: true,
            created_at: Utc::now(),
        };
        db.tours().insert(&tour).await.unwrap();
        (db, tour)
    }

    fn sale_at(created_at: DateTime<Utc>, cash: i64, pix: Option<i64>) -> Sale {
        Sale {
            id: Uuid::new_v4().to_string(),
            created_at,
            total_cents: cash + pix.unwrap_or(0),
            payment_method_1: PaymentMethod::Cash,
            payment_value_1_cents: cash,
            payment_method_2: pix.map(|_| PaymentMethod::Pix),
            payment_value_2_cents: pix,
        }
    }

    fn item(sale: &Sale, tour_id: &str) -> SaleItem {
        SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            tour_id: tour_id.to_string(),
            qty_adult: 2,
            qty_child: 1,
            qty_native: 0,
            unit_price_adult_cents: 5_000,
            unit_price_child_cents: 2_500,
            unit_price_native_cents: 1_000,
        }
    }

    #[tokio::test]
    async fn test_create_with_items_round_trip() {
        let (db, tour) = setup().await;
        let repo = db.sales();
        let sale = sale_at(Utc::now(), 10_000, Some(2_500));

        repo.create_with_items(&sale, &[item(&sale, &tour.id)]).await.unwrap();

        let stored = repo.get_with_items(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.sale.total_cents, 12_500);
        assert_eq!(stored.sale.payment_method_2, Some(PaymentMethod::Pix));
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].tour_name.as_deref(), Some("Sunset Boat"));
        assert_eq!(stored.items[0].item.qty_adult, 2);
        assert_eq!(stored.items[0].item.unit_price_child_cents, 2_500);
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_sale() {
        let (db, tour) = setup().await;
        let repo = db.sales();
        let sale = sale_at(Utc::now(), 10_000, None);
        let items = vec![item(&sale, &tour.id), item(&sale, "no-such-tour")];

        let result = repo.create_with_items(&sale, &items).await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
        assert!(repo.get_by_id(&sale.id).await.unwrap().is_none());
        assert_eq!(repo.count_items(&sale.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_between_is_half_open_and_ordered() {
        let (db, tour) = setup().await;
        let repo = db.sales();
        let day = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let next = day + Duration::days(1);

        let first = sale_at(day, 1_000, None);
        let second = sale_at(day + Duration::hours(15), 2_000, None);
        let last = sale_at(next - Duration::milliseconds(1), 3_000, None);
        let tomorrow = sale_at(next, 4_000, None);
        for s in [&second, &tomorrow, &first, &last] {
            repo.create_with_items(s, &[item(s, &tour.id)]).await.unwrap();
        }

        let asc = repo.list_between(day, next, SaleOrder::OldestFirst).await.unwrap();
        let ids: Vec<_> = asc.iter().map(|s| s.sale.id.clone()).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone(), last.id.clone()]);
        assert!(asc.iter().all(|s| s.items.len() == 1));

        let desc = repo.list_between(day, next, SaleOrder::NewestFirst).await.unwrap();
        assert_eq!(desc[0].sale.id, last.id);
    }

    #[tokio::test]
    async fn test_list_between_empty_range() {
        let (db, _) = setup().await;
        let day = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let sales = db
            .sales()
            .list_between(day, day + Duration::days(1), SaleOrder::OldestFirst)
            .await
            .unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_deactivated_tour_still_resolves_in_history() {
        let (db, tour) = setup().await;
        let repo = db.sales();
        let sale = sale_at(Utc::now(), 12_500, None);
        repo.create_with_items(&sale, &[item(&sale, &tour.id)]).await.unwrap();

        db.tours().deactivate(&tour.id).await.unwrap();

        let items = repo.get_items(&sale.id).await.unwrap();
        assert_eq!(items[0].tour_name.as_deref(), Some("Sunset Boat"));
        assert_eq!(items[0].tour_icon.as_deref(), Some("⛵"));
    }
}
