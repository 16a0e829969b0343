//! # Session State
//!
//! Holds the opaque bearer identity handed over by the auth provider.
//! The register never parses it: a token is either present or absent.
//! Reads never need it; writes do.

use std::sync::{Arc, RwLock};
use tracing::info;

use crate::error::ApiError;

#[derive(Clone, Default)]
pub struct SessionState {
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that is already signed in.
    pub fn signed_in(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
        info!("Operator signed in");
    }

    pub fn sign_out(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        info!("Operator signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Current token, for handing to an authorizing store.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Gate for write commands.
    ///
    /// ## Returns
    /// * `Err(ApiError)` with `UNAUTHORIZED` when nobody is signed in
    pub fn require(&self) -> Result<(), ApiError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionState::new();
        assert_eq!(session.require().unwrap_err().code, ErrorCode::Unauthorized);

        session.sign_in("opaque-token");
        assert!(session.require().is_ok());
        assert_eq!(session.token().as_deref(), Some("opaque-token"));

        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }
}
