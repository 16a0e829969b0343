//! # Sale Commands
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(payment)                                                   │
//! │        │                                                                │
//! │        ├── session present?          no ──► UNAUTHORIZED                │
//! │        ├── database configured?      no ──► NOT_CONFIGURED              │
//! │        ├── legs == cart total ±0.01? no ──► PAYMENT_ERROR               │
//! │        │         (nothing has been written yet)                         │
//! │        ▼                                                                │
//! │  ┌──────────────────────── one transaction ─────────────────────────┐   │
//! │  │  INSERT sales (total = value1 + value2)                          │   │
//! │  │  INSERT sale_items (unit prices frozen in the cart)              │   │
//! │  │  any failure ──► ROLLBACK, neither row exists                    │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │        ▼                                                                │
//! │  clear cart, return the recorded sale                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::state::{CartState, DbState, SessionState};
use tourdesk_core::{PaymentSplit, Sale, SaleItem};

/// A freshly recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleResponse {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Turns the current cart into a durable sale.
///
/// ## Errors
/// * `UNAUTHORIZED`, `NOT_CONFIGURED` - before anything else
/// * `PAYMENT_ERROR` - empty cart or legs that don't match the total;
///   no store access happens
/// * `DATABASE_ERROR` / `VALIDATION_ERROR` - the store rejected the write;
///   the cart is left untouched
pub async fn record_sale(
    db: &DbState,
    cart: &CartState,
    session: &SessionState,
    clock: &dyn Clock,
    payment: PaymentSplit,
) -> Result<RecordSaleResponse, ApiError> {
    debug!(?payment, "record_sale command");

    session.require()?;
    let db = db.require()?;

    let snapshot = cart.snapshot();
    payment.validate_against(snapshot.total())?;

    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        created_at: clock.now(),
        total_cents: payment.total().cents(),
        payment_method_1: payment.method1,
        payment_value_1_cents: payment.value1.cents(),
        payment_method_2: payment.method2,
        payment_value_2_cents: payment.value2.map(|v| v.cents()),
    };
    let items = snapshot.to_sale_items(&sale.id);

    db.sales().create_with_items(&sale, &items).await?;

    // Tickets added while the write was in flight stay in the cart
    cart.with_cart_mut(|c| {
        if *c == snapshot {
            c.clear();
        }
    });

    info!(
        sale_id = %sale.id,
        total = %sale.total(),
        items = items.len(),
        method1 = %sale.payment_method_1,
        method2 = ?sale.payment_method_2,
        "Sale recorded"
    );

    Ok(RecordSaleResponse { sale, items })
}
