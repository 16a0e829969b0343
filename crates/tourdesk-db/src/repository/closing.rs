//! # Daily Closing Repository
//!
//! Closing records are insert-only. The `UNIQUE` constraint on `date` is the
//! backstop that keeps two concurrent closings from both landing; the losing
//! insert comes back as `DbError::UniqueViolation` on [`CLOSING_DATE_FIELD`].

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tourdesk_core::DailyClosing;

/// Constraint target reported by SQLite for a duplicate closing date.
pub const CLOSING_DATE_FIELD: &str = "daily_closings.date";

const CLOSING_COLUMNS: &str = r#"
    id, date, created_at, total_cents,
    cash_cents, pix_cents, debit_cents, credit_cents,
    sale_count
"#;

/// Repository for daily closing records.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    pool: SqlitePool,
}

impl ClosingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClosingRepository { pool }
    }

    /// True when a closing exists for `date`. Absence is not an error.
    pub async fn exists_for_date(&self, date: NaiveDate) -> DbResult<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM daily_closings WHERE date = ?1)")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists != 0)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> DbResult<Option<DailyClosing>> {
        let sql = format!("SELECT {CLOSING_COLUMNS} FROM daily_closings WHERE date = ?1");

        let closing: Option<DailyClosing> = sqlx::query_as(&sql).bind(date).fetch_optional(&self.pool).await?;

        Ok(closing)
    }

    /// Inserts a closing record (single statement).
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` on `daily_closings.date` - already closed
    pub async fn insert(&self, closing: &DailyClosing) -> DbResult<()> {
        debug!(date = %closing.date, total = closing.total_cents, "Inserting daily closing");

        sqlx::query(
            r#"
            INSERT INTO daily_closings (
                id, date, created_at, total_cents,
                cash_cents, pix_cents, debit_cents, credit_cents,
                sale_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&closing.id)
        .bind(closing.date)
        .bind(closing.created_at)
        .bind(closing.total_cents)
        .bind(closing.cash_cents)
        .bind(closing.pix_cents)
        .bind(closing.debit_cents)
        .bind(closing.credit_cents)
        .bind(closing.sale_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every closing, most recent date first.
    pub async fn list_all(&self) -> DbResult<Vec<DailyClosing>> {
        let sql = format!("SELECT {CLOSING_COLUMNS} FROM daily_closings ORDER BY date DESC");

        let closings: Vec<DailyClosing> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(closings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use chrono::Utc;
    use uuid::Uuid;

    fn closing(date: NaiveDate, total: i64) -> DailyClosing {
        DailyClosing {
            id: Uuid::new_v4().to_string(),
            date,
            created_at: Utc::now(),
            total_cents: total,
            cash_cents: total,
            pix_cents: 0,
            debit_cents: 0,
            credit_cents: 0,
            sale_count: 1,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_exists() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.closings();

        assert!(!repo.exists_for_date(day(1)).await.unwrap());
        repo.insert(&closing(day(1), 18_000)).await.unwrap();
        assert!(repo.exists_for_date(day(1)).await.unwrap());
        assert!(!repo.exists_for_date(day(2)).await.unwrap());

        let stored = repo.find_by_date(day(1)).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 18_000);
        assert_eq!(stored.date, day(1));
    }

    #[tokio::test]
    async fn test_duplicate_date_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.closings();
        repo.insert(&closing(day(1), 18_000)).await.unwrap();

        let err = repo.insert(&closing(day(1), 99)).await.unwrap_err();

        assert!(err.is_unique_violation_on(CLOSING_DATE_FIELD), "got {:?}", err);
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        let stored = repo.find_by_date(day(1)).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 18_000);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.closings();
        for d in [2, 5, 1] {
            repo.insert(&closing(day(d), 100)).await.unwrap();
        }

        let dates: Vec<_> = repo.list_all().await.unwrap().into_iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![day(5), day(2), day(1)]);
    }
}
