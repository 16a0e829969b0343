//! # Tour Commands
//!
//! Catalogue maintenance. Tours are soft-deleted so past sales keep
//! resolving their name and icon.

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use tourdesk_core::validation::validate_tour_input;
use tourdesk_core::{Tour, TourInput};
use tourdesk_db::repository::tour::generate_tour_id;

/// Active tours ordered by name. Empty when no database is configured.
pub async fn list_active_tours(db: &DbState) -> Result<Vec<Tour>, ApiError> {
    debug!("list_active_tours command");

    let Some(db) = db.inner() else {
        warn!("Database not configured, showing no tours");
        return Ok(Vec::new());
    };

    Ok(db.tours().list_active().await?)
}

/// A tour by id, active or not.
pub async fn get_tour(db: &DbState, id: &str) -> Result<Option<Tour>, ApiError> {
    debug!(id = %id, "get_tour command");

    let Some(db) = db.inner() else {
        return Ok(None);
    };

    Ok(db.tours().get_by_id(id).await?)
}

/// Creates a tour when `input.id` is absent, updates it otherwise.
///
/// ## Errors
/// * `UNAUTHORIZED` / `NOT_CONFIGURED` before any I/O
/// * `VALIDATION_ERROR` for a blank name, blank kind or negative price
/// * `NOT_FOUND` when updating an unknown id
pub async fn save_tour(
    db: &DbState,
    session: &SessionState,
    clock: &dyn Clock,
    input: TourInput,
) -> Result<Tour, ApiError> {
    debug!(id = ?input.id, name = %input.name, "save_tour command");

    session.require()?;
    let db = db.require()?;
    validate_tour_input(&input)?;

    let TourInput {
        id,
        name,
        kind,
        price_adult_cents,
        price_child_cents,
        price_native_cents,
        icon,
    } = input;
    let name = name.trim().to_string();
    let kind = kind.trim().to_string();

    match id {
        None => {
            let tour = Tour {
                id: generate_tour_id(),
                name,
                kind,
                price_adult_cents,
                price_child_cents,
                price_native_cents,
                icon,
                active: true,
                created_at: clock.now(),
            };
            let tour = db.tours().insert(&tour).await?;
            info!(id = %tour.id, name = %tour.name, "Tour created");
            Ok(tour)
        }
        Some(id) => {
            let existing = db
                .tours()
                .get_by_id(&id)
                .await?
                .ok_or_else(|| ApiError::not_found("Tour", &id))?;

            let tour = Tour {
                name,
                kind,
                price_adult_cents,
                price_child_cents,
                price_native_cents,
                icon,
                ..existing
            };
            db.tours().update(&tour).await?;
            info!(id = %tour.id, "Tour updated");
            Ok(tour)
        }
    }
}

/// Hides a tour from the catalogue.
pub async fn deactivate_tour(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "deactivate_tour command");

    session.require()?;
    let db = db.require()?;

    db.tours().deactivate(id).await?;
    info!(id = %id, "Tour deactivated");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{app_at, midday, unconfigured_app};
    use crate::error::ErrorCode;

    fn input(name: &str) -> TourInput {
        TourInput {
            id: None,
            name: name.to_string(),
            kind: "boat".to_string(),
            price_adult_cents: 5_000,
            price_child_cents: 2_500,
            price_native_cents: 1_000,
            icon: "⛵".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_update_deactivate() {
        let (state, _) = app_at(midday()).await;

        let created = save_tour(&state.db, &state.session, state.clock.as_ref(), input("  Sunset Boat "))
            .await
            .unwrap();
        assert_eq!(created.name, "Sunset Boat");
        assert!(created.active);
        assert_eq!(created.created_at, midday());

        let mut edit = input("Sunset Boat");
        edit.id = Some(created.id.clone());
        edit.price_adult_cents = 6_000;
        let updated = save_tour(&state.db, &state.session, state.clock.as_ref(), edit).await.unwrap();
        assert_eq!(updated.price_adult_cents, 6_000);
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(list_active_tours(&state.db).await.unwrap().len(), 1);

        deactivate_tour(&state.db, &state.session, &created.id).await.unwrap();
        assert!(list_active_tours(&state.db).await.unwrap().is_empty());
        let stored = get_tour(&state.db, &created.id).await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn test_invalid_input_is_validation_error() {
        let (state, _) = app_at(midday()).await;

        let err = save_tour(&state.db, &state.session, state.clock.as_ref(), input("   "))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut negative = input("Trail");
        negative.price_child_cents = -1;
        let err = save_tour(&state.db, &state.session, state.clock.as_ref(), negative)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_writes_need_session() {
        let (state, _) = app_at(midday()).await;
        state.session.sign_out();

        let err = save_tour(&state.db, &state.session, state.clock.as_ref(), input("Trail"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(list_active_tours(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_reads_empty_writes_fail() {
        let state = unconfigured_app().await;

        assert!(list_active_tours(&state.db).await.unwrap().is_empty());
        assert!(get_tour(&state.db, "any").await.unwrap().is_none());

        let err = deactivate_tour(&state.db, &state.session, "any").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotConfigured);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_is_not_found() {
        let (state, _) = app_at(midday()).await;
        let err = deactivate_tour(&state.db, &state.session, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
