//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │  split   │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add_to_cart                      record_sale          │
//! │                   update_cart_quantity             (sale.rs)            │
//! │                   remove_from_cart                       │              │
//! │                        │                                 ▼              │
//! │                   clear_cart ─────────────────────► back to empty       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Apart from `add_to_cart`, which looks the tour up, these never touch
//! the database.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, DbState};
use tourdesk_core::{AudienceType, Cart, CartItem, Money};

/// Cart contents with the derived figures the screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total: Money,
    pub ticket_count: i64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            total: cart.total(),
            ticket_count: cart.ticket_count(),
        }
    }
}

pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one `audience` ticket for a tour.
///
/// The tour's current prices, name and icon are frozen into the cart item
/// the first time it is added.
///
/// ## Errors
/// * `NOT_CONFIGURED` - no database to look the tour up in
/// * `NOT_FOUND` - unknown tour
/// * `VALIDATION_ERROR` - the tour was deactivated
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    tour_id: &str,
    audience: AudienceType,
) -> Result<CartResponse, ApiError> {
    debug!(tour_id = %tour_id, ?audience, "add_to_cart command");

    let db = db.require()?;
    let tour = db
        .tours()
        .get_by_id(tour_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tour", tour_id))?;

    if !tour.active {
        return Err(ApiError::validation(format!("Tour '{}' is no longer sold", tour.name)));
    }

    Ok(cart.with_cart_mut(|c| {
        c.add(&tour, audience);
        CartResponse::from(&*c)
    }))
}

/// Moves one audience counter by `delta`, flooring at zero.
pub fn update_cart_quantity(cart: &CartState, tour_id: &str, audience: AudienceType, delta: i64) -> CartResponse {
    debug!(tour_id = %tour_id, ?audience, delta, "update_cart_quantity command");

    cart.with_cart_mut(|c| {
        c.update_quantity(tour_id, audience, delta);
        CartResponse::from(&*c)
    })
}

pub fn remove_from_cart(cart: &CartState, tour_id: &str) -> CartResponse {
    debug!(tour_id = %tour_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove(tour_id);
        CartResponse::from(&*c)
    })
}

pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{app_at, insert_tour, midday, unconfigured_app};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_accumulates_per_audience() {
        let (state, _) = app_at(midday()).await;
        let tour = insert_tour(&state, "Island Hopping", 5_000, 2_500, 1_000).await;

        add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Adult).await.unwrap();
        add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Adult).await.unwrap();
        let cart = add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Child).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty_adult, 2);
        assert_eq!(cart.items[0].qty_child, 1);
        assert_eq!(cart.total, Money::from_cents(12_500));
        assert_eq!(cart.ticket_count, 3);
    }

    #[tokio::test]
    async fn test_quantity_floor_and_prune() {
        let (state, _) = app_at(midday()).await;
        let tour = insert_tour(&state, "Trail", 4_000, 2_000, 0).await;
        add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Adult).await.unwrap();
        add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Child).await.unwrap();

        let cart = update_cart_quantity(&state.cart, &tour.id, AudienceType::Adult, -5);
        assert_eq!(cart.items[0].qty_adult, 0);
        assert_eq!(cart.total, Money::from_cents(2_000));

        let cart = update_cart_quantity(&state.cart, &tour.id, AudienceType::Child, -1);
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Money::zero());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (state, _) = app_at(midday()).await;
        let a = insert_tour(&state, "A", 1_000, 0, 0).await;
        let b = insert_tour(&state, "B", 2_000, 0, 0).await;
        add_to_cart(&state.db, &state.cart, &a.id, AudienceType::Adult).await.unwrap();
        add_to_cart(&state.db, &state.cart, &b.id, AudienceType::Adult).await.unwrap();

        let cart = remove_from_cart(&state.cart, &a.id);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, Money::from_cents(2_000));

        assert!(clear_cart(&state.cart).items.is_empty());
        assert_eq!(get_cart(&state.cart).ticket_count, 0);
    }

    #[tokio::test]
    async fn test_add_rejects_missing_and_inactive_tours() {
        let (state, _) = app_at(midday()).await;
        let err = add_to_cart(&state.db, &state.cart, "missing", AudienceType::Adult)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let tour = insert_tour(&state, "Old", 1_000, 0, 0).await;
        state.db.require().unwrap().tours().deactivate(&tour.id).await.unwrap();
        let err = add_to_cart(&state.db, &state.cart, &tour.id, AudienceType::Adult)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_cart(&state.cart).items.is_empty());
    }

    #[tokio::test]
    async fn test_add_needs_database() {
        let state = unconfigured_app().await;
        let err = add_to_cart(&state.db, &state.cart, "any", AudienceType::Adult)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotConfigured);
    }
}
