//! # Tour Repository
//!
//! Database operations for the tour catalog.
//!
//! Tours are never hard-deleted. `deactivate` flips `active` so historical
//! sale items keep resolving their name and icon.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tourdesk_core::Tour;

const TOUR_COLUMNS: &str = r#"
    id, name, kind,
    price_adult_cents, price_child_cents, price_native_cents,
    icon, active, created_at
"#;

/// Repository for tour database operations.
#[derive(Debug, Clone)]
pub struct TourRepository {
    pool: SqlitePool,
}

impl TourRepository {
    /// Creates a new TourRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TourRepository { pool }
    }

    /// Active tours ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Tour>> {
        let sql = format!("SELECT {TOUR_COLUMNS} FROM tours WHERE active = 1 ORDER BY name COLLATE NOCASE, id");

        let tours: Vec<Tour> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = tours.len(), "Listed active tours");
        Ok(tours)
    }

    /// Gets a tour by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Tour>> {
        let sql = format!("SELECT {TOUR_COLUMNS} FROM tours WHERE id = ?1");

        let tour: Option<Tour> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(tour)
    }

    /// Inserts a new tour.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert(&self, tour: &Tour) -> DbResult<Tour> {
        debug!(id = %tour.id, name = %tour.name, "Inserting tour");

        sqlx::query(
            r#"
            INSERT INTO tours (
                id, name, kind,
                price_adult_cents, price_child_cents, price_native_cents,
                icon, active, created_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8, ?9
            )
            "#,
        )
        .bind(&tour.id)
        .bind(&tour.name)
        .bind(&tour.kind)
        .bind(tour.price_adult_cents)
        .bind(tour.price_child_cents)
        .bind(tour.price_native_cents)
        .bind(&tour.icon)
        .bind(tour.active)
        .bind(tour.created_at)
        .execute(&self.pool)
        .await?;

        Ok(tour.clone())
    }

    /// Updates the editable fields of an existing tour.
    ///
    /// `active` and `created_at` are left untouched.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Tour doesn't exist
    pub async fn update(&self, tour: &Tour) -> DbResult<()> {
        debug!(id = %tour.id, "Updating tour");

        let result = sqlx::query(
            r#"
            UPDATE tours SET
                name = ?2,
                kind = ?3,
                price_adult_cents = ?4,
                price_child_cents = ?5,
                price_native_cents = ?6,
                icon = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&tour.id)
        .bind(&tour.name)
        .bind(&tour.kind)
        .bind(tour.price_adult_cents)
        .bind(tour.price_child_cents)
        .bind(tour.price_native_cents)
        .bind(&tour.icon)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tour", &tour.id));
        }

        Ok(())
    }

    /// Soft-deletes a tour by setting active = 0.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating tour");

        let result = sqlx::query("UPDATE tours SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tour", id));
        }

        Ok(())
    }

    /// Counts active tours.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tours WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new tour ID.
pub fn generate_tour_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;

    fn tour(name: &str, adult: i64) -> Tour {
        Tour {
            id: generate_tour_id(),
            name: name.to_string(),
            kind: "boat".to_string(),
            price_adult_cents: adult,
            price_child_cents: adult / 2,
            price_native_cents: 0,
            icon: "⛵".to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_active_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tours();

        repo.insert(&tour("Trail", 4_000)).await.unwrap();
        repo.insert(&tour("boat trip", 5_000)).await.unwrap();
        repo.insert(&tour("Aquarium", 3_000)).await.unwrap();

        let names: Vec<_> = repo.list_active().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Aquarium", "boat trip", "Trail"]);
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tours();
        let mut t = repo.insert(&tour("Trail", 4_000)).await.unwrap();

        t.price_adult_cents = 4_500;
        t.name = "Mountain Trail".to_string();
        repo.update(&t).await.unwrap();

        let stored = repo.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Mountain Trail");
        assert_eq!(stored.price_adult_cents, 4_500);
        assert!(stored.active);
    }

    #[tokio::test]
    async fn test_deactivate_is_soft() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tours();
        let t = repo.insert(&tour("Trail", 4_000)).await.unwrap();

        repo.deactivate(&t.id).await.unwrap();

        assert!(repo.list_active().await.unwrap().is_empty());
        assert_eq!(repo.count_active().await.unwrap(), 0);
        let stored = repo.get_by_id(&t.id).await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn test_missing_tour_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tours();

        assert!(matches!(repo.deactivate("nope").await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.update(&tour("x", 1)).await, Err(DbError::NotFound { .. })));
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }
}
