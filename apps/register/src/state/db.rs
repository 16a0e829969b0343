//! # Database State
//!
//! Wraps the optional `Database` connection for use in commands.
//!
//! The register starts even when the store is unreachable. In that mode
//! reads degrade to empty results and every write fails with
//! `NOT_CONFIGURED` before attempting any I/O.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn deactivate_tour(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
//!     session.require()?;
//!     db.require()?.tours().deactivate(id).await?;
//!     Ok(())
//! }
//! ```

use tourdesk_db::Database;

use crate::error::ApiError;

/// Wrapper around an optional `Database`.
///
/// Cloning is cheap (the pool is reference counted), so the closing
/// watcher holds its own copy.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Option<Database>,
}

impl DbState {
    pub fn connected(db: Database) -> Self {
        DbState { db: Some(db) }
    }

    pub fn unconfigured() -> Self {
        DbState { db: None }
    }

    pub fn is_configured(&self) -> bool {
        self.db.is_some()
    }

    /// The database for read paths. `None` means "show empty".
    pub fn inner(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    /// The database for write paths.
    ///
    /// ## Returns
    /// * `Err(ApiError)` with `NOT_CONFIGURED` when no database is connected
    pub fn require(&self) -> Result<&Database, ApiError> {
        self.db.as_ref().ok_or_else(ApiError::not_configured)
    }
}
