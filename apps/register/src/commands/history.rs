//! # Closing History Commands
//!
//! Browsing past days: the closing records themselves, and for any date the
//! sales, the per-tour breakdown and the recomputed totals.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::commands::summary::load_day;
use crate::error::ApiError;
use crate::state::DbState;
use tourdesk_core::calendar::parse_business_date;
use tourdesk_core::history::summarize_by_product;
use tourdesk_core::{ClosingTotals, DailyClosing, ProductSummary, SaleWithItems};
use tourdesk_db::SaleOrder;

/// One business date, reconstructed from the sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingDetail {
    pub date: NaiveDate,
    /// `None` when the day was never closed.
    pub closing: Option<DailyClosing>,
    pub sales: Vec<SaleWithItems>,
    /// Highest revenue first.
    pub products: Vec<ProductSummary>,
    /// Recomputed from `sales`. Recorded sales are never edited, so this
    /// matches `closing` once the day is closed.
    pub totals: ClosingTotals,
}

/// Every closing, most recent date first.
pub async fn list_closings(db: &DbState) -> Result<Vec<DailyClosing>, ApiError> {
    debug!("list_closings command");

    let Some(db) = db.inner() else {
        warn!("Database not configured, showing no closings");
        return Ok(Vec::new());
    };

    Ok(db.closings().list_all().await?)
}

pub async fn get_closing(db: &DbState, date: &str) -> Result<Option<DailyClosing>, ApiError> {
    debug!(date = %date, "get_closing command");

    let date = parse_business_date(date)?;

    let Some(db) = db.inner() else {
        return Ok(None);
    };

    Ok(db.closings().find_by_date(date).await?)
}

pub async fn closing_detail(db: &DbState, date: &str) -> Result<ClosingDetail, ApiError> {
    debug!(date = %date, "closing_detail command");

    let date = parse_business_date(date)?;

    let (closing, sales) = match db.inner() {
        Some(db) => (
            db.closings().find_by_date(date).await?,
            load_day(db, date, SaleOrder::OldestFirst).await?,
        ),
        None => {
            warn!("Database not configured, showing an empty day");
            (None, Vec::new())
        }
    };

    Ok(ClosingDetail {
        date,
        closing,
        products: summarize_by_product(&sales),
        totals: ClosingTotals::aggregate(&sales),
        sales,
    })
}
