//! # Summary Commands
//!
//! Read-only views over the sales ledger. Business dates follow the
//! UTC-normalized policy of `tourdesk_core::calendar`.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::ApiError;
use crate::state::DbState;
use tourdesk_core::calendar::{business_date, day_bounds, parse_business_date};
use tourdesk_core::{ClosingTotals, SaleWithItems};
use tourdesk_db::{Database, DbResult, SaleOrder};

/// Live dashboard for the current business date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Newest first.
    pub sales: Vec<SaleWithItems>,
    pub totals: ClosingTotals,
}

/// Every sale of `date` with nested items.
pub(crate) async fn load_day(db: &Database, date: NaiveDate, order: SaleOrder) -> DbResult<Vec<SaleWithItems>> {
    let (start, end) = day_bounds(date);
    db.sales().list_between(start, end, order).await
}

/// Today's sales and their totals by payment method.
pub async fn today_summary(db: &DbState, clock: &dyn Clock) -> Result<DailySummary, ApiError> {
    debug!("today_summary command");

    let date = business_date(clock.now());

    let sales = match db.inner() {
        Some(db) => load_day(db, date, SaleOrder::NewestFirst).await?,
        None => {
            warn!("Database not configured, showing an empty day");
            Vec::new()
        }
    };
    let totals = ClosingTotals::aggregate(&sales);

    Ok(DailySummary { date, sales, totals })
}

/// Sales of one business date (`YYYY-MM-DD`), oldest first.
pub async fn sales_for_date(db: &DbState, date: &str) -> Result<Vec<SaleWithItems>, ApiError> {
    debug!(date = %date, "sales_for_date command");

    let date = parse_business_date(date)?;

    let Some(db) = db.inner() else {
        warn!("Database not configured, showing no sales");
        return Ok(Vec::new());
    };

    Ok(load_day(db, date, SaleOrder::OldestFirst).await?)
}
