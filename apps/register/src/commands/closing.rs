//! # Closing Commands
//!
//! ## Gatekeeper
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per business date:                                                    │
//! │                                                                         │
//! │     ┌────────┐   close_day (insert succeeds)   ┌──────────┐            │
//! │     │  OPEN  │ ───────────────────────────────► │  CLOSED  │ terminal   │
//! │     └────────┘                                  └──────────┘            │
//! │                                                                         │
//! │  close_day(summary)                                                    │
//! │    1. exists_for_date?           yes ──► ALREADY_CLOSED, no write       │
//! │    2. INSERT daily_closings                                            │
//! │       UNIQUE(date) violated ─────────► ALREADY_CLOSED (lost the race)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store's uniqueness constraint is the authority; the prior read only
//! avoids a pointless insert in the common case.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use tourdesk_core::calendar::{business_date, day_bounds};
use tourdesk_core::{ClosingState, ClosingSummary, CoreError, DailyClosing};
use tourdesk_db::repository::closing::CLOSING_DATE_FIELD;
use tourdesk_db::{Database, SaleOrder};

/// Point-in-time view of the closing gate for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingStatus {
    pub date: NaiveDate,
    pub state: ClosingState,
    pub is_closed: bool,
    /// Local hour is at or past the opening hour.
    pub is_eligible: bool,
    pub opens_at_hour: u32,
    /// False while no database is configured.
    pub configured: bool,
    pub can_close: bool,
}

impl ClosingStatus {
    fn new(date: NaiveDate, state: ClosingState, is_eligible: bool, opens_at_hour: u32, configured: bool) -> Self {
        let is_closed = state.is_closed();
        ClosingStatus {
            date,
            state,
            is_closed,
            is_eligible,
            opens_at_hour,
            configured,
            can_close: configured && !is_closed && is_eligible,
        }
    }
}

/// Evaluates the gate now. Pure reads, so the watcher calls it too.
pub async fn closing_status(db: &DbState, config: &ConfigState, clock: &dyn Clock) -> Result<ClosingStatus, ApiError> {
    debug!("closing_status command");

    let now = clock.now();
    let date = business_date(now);

    let exists = match db.inner() {
        Some(db) => db.closings().exists_for_date(date).await?,
        None => false,
    };

    Ok(ClosingStatus::new(
        date,
        ClosingState::from_exists(exists),
        config.is_eligible_at(now),
        config.window.opens_at_hour,
        db.is_configured(),
    ))
}

/// Closes the current business date.
///
/// The date closed is the UTC calendar date of `clock.now()`, while the
/// opening-hour gate reads the configured local time zone. From 21:00 to
/// midnight in São Paulo (UTC-3) the UTC date is already the next day, so a
/// closing issued then covers the next day's `[00:00Z, 24:00Z)` window.
///
/// ## Errors
/// * `UNAUTHORIZED`, `NOT_CONFIGURED` - before any I/O
/// * `CLOSING_NOT_ALLOWED` - local time is before the opening hour
/// * `ALREADY_CLOSED` - a closing for today exists (or was written concurrently)
pub async fn close_today(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    clock: &dyn Clock,
) -> Result<DailyClosing, ApiError> {
    debug!("close_today command");

    session.require()?;
    let db = db.require()?;

    let now = clock.now();
    config.window.check(config.local_time(now))?;

    let date = business_date(now);
    let (start, end) = day_bounds(date);
    let sales = db.sales().list_headers_between(start, end, SaleOrder::OldestFirst).await?;

    close_day(db, ClosingSummary::from_sales(date, &sales), now).await
}

/// Writes the closing record for `summary.date` exactly once.
pub async fn close_day(db: &Database, summary: ClosingSummary, now: DateTime<Utc>) -> Result<DailyClosing, ApiError> {
    let date = summary.date;

    let state = ClosingState::from_exists(db.closings().exists_for_date(date).await?);
    state.close(date)?;

    insert_closing(db, summary.into_closing(Uuid::new_v4().to_string(), now)).await
}

/// Inserts a closing, reporting a duplicate date as `ALREADY_CLOSED`.
async fn insert_closing(db: &Database, closing: DailyClosing) -> Result<DailyClosing, ApiError> {
    match db.closings().insert(&closing).await {
        Ok(()) => {
            info!(
                date = %closing.date,
                total = %closing.total(),
                sales = closing.sale_count,
                "Day closed"
            );
            Ok(closing)
        }
        Err(e) if e.is_unique_violation_on(CLOSING_DATE_FIELD) => {
            warn!(date = %closing.date, "Closing written concurrently by another writer");
            Err(CoreError::AlreadyClosed { date: closing.date }.into())
        }
        Err(e) => Err(e.into()),
    }
}
