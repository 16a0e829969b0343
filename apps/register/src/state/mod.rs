//! # State Module
//!
//! Application state for the register.
//!
//! Each concern has its own state type and commands take only the ones they
//! need. [`AppState`] just bundles them for startup and for tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌────────────────────┐  │
//! │  │  DbState   │ │ CartState  │ │ SessionState │ │ ConfigState        │  │
//! │  │            │ │            │ │              │ │                    │  │
//! │  │ • Option<  │ │ • Cart     │ │ • bearer     │ │ • store name       │  │
//! │  │   Database>│ │   (Mutex)  │ │   token      │ │ • closing window   │  │
//! │  │            │ │            │ │   (RwLock)   │ │ • time zone        │  │
//! │  └────────────┘ └────────────┘ └──────────────┘ └────────────────────┘  │
//! │                                                                         │
//! │  + Arc<dyn Clock>: the only source of "now"                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod session;

use std::sync::Arc;

pub use cart::CartState;
pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;

use crate::clock::{Clock, SystemClock};

/// Every state object the register owns.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub cart: CartState,
    pub session: SessionState,
    pub config: Arc<ConfigState>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: DbState, config: ConfigState, clock: Arc<dyn Clock>) -> Self {
        AppState {
            db,
            cart: CartState::new(),
            session: SessionState::new(),
            config: Arc::new(config),
            clock,
        }
    }

    /// State on the wall clock.
    pub fn with_system_clock(db: DbState, config: ConfigState) -> Self {
        Self::new(db, config, Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("cart", &self.cart)
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
