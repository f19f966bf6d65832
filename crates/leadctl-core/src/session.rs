//! Authentication session lifecycle.
//!
//! [`Session`] is the pure state machine the UI renders from; the async
//! functions here drive it against the backend and the on-disk token store.

use std::path::Path;

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::api::types::{LoginRequest, User};
use crate::store::SessionStore;

/// Shown when the backend rejects login credentials.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Shown when the backend rejects a registration.
pub const REGISTER_FAILED_MESSAGE: &str = "Signup failed. Please check the entered data.";

/// Where the session stands with the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    /// Startup state: a persisted token may exist but hasn't been checked.
    Unknown,
    /// No valid credentials.
    Anonymous,
    /// Token verified; the account is known.
    Authenticated(User),
}

/// UI-facing session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: AuthPhase,
    /// True while an auth check or login/logout is in flight.
    pub loading: bool,
}

impl Session {
    /// Fresh session: phase unknown, check pending.
    pub fn new() -> Self {
        Self {
            phase: AuthPhase::Unknown,
            loading: true,
        }
    }

    /// Marks the session authenticated and ends any pending check.
    pub fn resolve_authenticated(&mut self, user: User) {
        self.phase = AuthPhase::Authenticated(user);
        self.loading = false;
    }

    /// Marks the session anonymous and ends any pending check.
    pub fn resolve_anonymous(&mut self) {
        self.phase = AuthPhase::Anonymous;
        self.loading = false;
    }

    pub fn user(&self) -> Option<&User> {
        match &self.phase {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated(_))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores a persisted session, if any.
///
/// Installs the stored token on the client and verifies it against the
/// backend. Any verification failure (revoked token, unreachable backend)
/// discards the stored token: the caller lands anonymous and logs in again.
/// Filesystem errors propagate.
pub async fn bootstrap(client: &ApiClient, session_path: &Path) -> Result<Option<User>> {
    let store = SessionStore::load_from(session_path)?;
    let Some(token) = store.token else {
        return Ok(None);
    };

    client.set_token(Some(token));
    match client.current_user().await {
        Ok(user) => Ok(Some(user)),
        Err(err) => {
            tracing::warn!("Discarding persisted session, verification failed: {}", err);
            client.set_token(None);
            SessionStore::clear_at(session_path)?;
            Ok(None)
        }
    }
}

/// Logs in, persists the token (0600) and installs it on the client.
pub async fn login(
    client: &ApiClient,
    session_path: &Path,
    credentials: &LoginRequest,
) -> Result<User> {
    let response = client.login(credentials).await?;

    let store = SessionStore {
        token: Some(response.token.clone()),
    };
    store
        .save_to(session_path)
        .context("Failed to persist session")?;

    client.set_token(Some(response.token));
    Ok(response.user)
}

/// Logs out. The local session is always cleared, even when the server-side
/// revocation fails.
pub async fn logout(client: &ApiClient, session_path: &Path) -> Result<()> {
    if let Err(err) = client.logout().await {
        tracing::warn!("Remote logout failed, clearing local session anyway: {}", err);
    }

    client.set_token(None);
    SessionStore::clear_at(session_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    /// A new session is unresolved and loading.
    #[test]
    fn test_new_session_is_unknown() {
        let session = Session::new();
        assert_eq!(session.phase, AuthPhase::Unknown);
        assert!(session.loading);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    /// Resolving as authenticated stores the user and ends loading.
    #[test]
    fn test_resolve_authenticated() {
        let mut session = Session::new();
        session.resolve_authenticated(user());

        assert!(session.is_authenticated());
        assert!(!session.loading);
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("Ada"));
    }

    /// Resolving as anonymous ends loading without a user.
    #[test]
    fn test_resolve_anonymous() {
        let mut session = Session::new();
        session.resolve_anonymous();

        assert_eq!(session.phase, AuthPhase::Anonymous);
        assert!(!session.loading);
        assert!(session.user().is_none());
    }

    /// Logging out after being authenticated goes back to anonymous.
    #[test]
    fn test_authenticated_to_anonymous() {
        let mut session = Session::new();
        session.resolve_authenticated(user());
        session.resolve_anonymous();

        assert!(!session.is_authenticated());
        assert_eq!(session.phase, AuthPhase::Anonymous);
    }
}
