//! # Tour Desk Register
//!
//! Controller layer between a UI shell and the Tour Desk core. The shell
//! invokes [`commands`]; this crate owns the state those commands share and
//! the background task that keeps the closing button honest.
//!
//! ## Module Organization
//! ```text
//! tourdesk_register/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── main.rs         ◄─── Headless daemon
//! ├── config.rs       ◄─── register.toml + environment
//! ├── clock.rs        ◄─── Injected "now"
//! ├── error.rs        ◄─── API error type for commands
//! ├── watcher.rs      ◄─── Closing status re-poll
//! ├── state/
//! │   ├── db.rs       ◄─── Optional database
//! │   ├── cart.rs     ◄─── Cart behind a mutex
//! │   ├── session.rs  ◄─── Opaque bearer token
//! │   └── config.rs   ◄─── Resolved configuration
//! └── commands/
//!     ├── tour.rs     ◄─── Catalogue
//!     ├── cart.rs     ◄─── Cart manipulation
//!     ├── sale.rs     ◄─── Recording sales
//!     ├── summary.rs  ◄─── Today / per-date views
//!     ├── closing.rs  ◄─── Gatekeeper
//!     └── history.rs  ◄─── Past closings
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG or info,tourdesk=debug,sqlx=warn   │
//! │  2. RegisterConfig::load    defaults ◄ register.toml ◄ TOURDESK_*       │
//! │  3. connect_database        pool + migrations; on failure the register  │
//! │                             keeps running with reads empty and writes   │
//! │                             rejected as NOT_CONFIGURED                  │
//! │  4. AppState                db, cart, session, config, clock            │
//! │  5. ClosingWatcher          spawned, publishes on a watch channel       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod watcher;

use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use config::{ConfigResult, RegisterConfig};
use state::{AppState, ConfigState, DbState};
use tourdesk_db::{Database, DbConfig};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tourdesk=trace` - Show trace for tourdesk crates only
/// - Default: INFO, DEBUG for tourdesk crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tourdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Opens the configured database.
///
/// Never fails: an unreachable store yields [`DbState::unconfigured`].
pub async fn connect_database(config: &RegisterConfig) -> DbState {
    let path = match config.database_path() {
        Ok(path) => path,
        Err(e) => {
            error!(%e, "No database path, running unconfigured");
            return DbState::unconfigured();
        }
    };
    info!(?path, "Database path determined");

    let db_config = DbConfig::new(path).max_connections(config.database.max_connections);
    match Database::new(db_config).await {
        Ok(db) => {
            info!("Database connected and migrations applied");
            DbState::connected(db)
        }
        Err(e) => {
            error!(%e, "Database unavailable, running unconfigured");
            DbState::unconfigured()
        }
    }
}

/// Builds the application state on the wall clock.
pub async fn bootstrap(config: &RegisterConfig) -> ConfigResult<AppState> {
    let config_state = ConfigState::from_config(config)?;
    let db = connect_database(config).await;

    info!(
        store = %config_state.store_name,
        opens_at_hour = config_state.window.opens_at_hour,
        timezone = %config_state.timezone,
        configured = db.is_configured(),
        "State initialized"
    );

    Ok(AppState::with_system_clock(db, config_state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_with_explicit_database() {
        let path = std::env::temp_dir().join(format!("tourdesk-{}.db", uuid::Uuid::new_v4()));
        let mut config = RegisterConfig::default();
        config.database.path = Some(path.clone());

        let state = bootstrap(&config).await.unwrap();
        assert!(state.db.is_configured());
        assert!(!state.session.is_authenticated());

        if let Some(db) = state.db.inner() {
            db.close().await;
        }
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_bad_timezone() {
        let mut config = RegisterConfig::default();
        config.closing.timezone = "Nowhere/Special".to_string();
        assert!(bootstrap(&config).await.is_err());
    }
}
