//! Session state owned by one client.
//!
//! The token and the login state live behind a single lock, so readers see
//! either the previous or the next complete token, never a partial one.

use parking_lot::RwLock;

/// Login state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
    LoggingOut,
}

#[derive(Debug)]
struct SessionInner {
    token: String,
    state: SessionState,
}

/// Session token and login state.
///
/// Debug output never contains the token.
pub struct Session {
    inner: RwLock<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Session")
            .field("token", &if inner.token.is_empty() { "" } else { "[REDACTED]" })
            .field("state", &inner.state)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SessionInner {
                token: String::new(),
                state: SessionState::LoggedOut,
            }),
        }
    }

    /// Current token; empty when logged out.
    pub fn token(&self) -> String {
        self.inner.read().token.clone()
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }

    /// Adopt a token and mark the session as logged in.
    pub fn establish(&self, token: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.token = token.into();
        inner.state = SessionState::LoggedIn;
    }

    /// Replace the token with a refreshed one from a response header.
    /// Empty values are ignored, as are refreshes outside `LoggedIn`.
    pub fn refresh(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        let mut inner = self.inner.write();
        if inner.state == SessionState::LoggedIn && inner.token != token {
            inner.token = token.to_string();
        }
    }

    /// Move from `LoggedIn` to `LoggingOut` and hand out the token to revoke.
    ///
    /// Returns `None` from any other state, and for a logged-in session
    /// without a token (which is reset to `LoggedOut`).
    pub fn begin_logout(&self) -> Option<String> {
        let mut inner = self.inner.write();
        match inner.state {
            SessionState::LoggedIn if !inner.token.is_empty() => {
                inner.state = SessionState::LoggingOut;
                Some(inner.token.clone())
            }
            SessionState::LoggedIn => {
                inner.state = SessionState::LoggedOut;
                None
            }
            SessionState::LoggingOut | SessionState::LoggedOut => None,
        }
    }

    /// Complete a logout started with [`Session::begin_logout`].
    ///
    /// Only clears when the session is still `LoggingOut` with the revoked
    /// token; a session established in the meantime is left alone.
    pub fn finish_logout(&self, revoked: &str) {
        let mut inner = self.inner.write();
        if inner.state == SessionState::LoggingOut && inner.token == revoked {
            inner.token.clear();
            inner.state = SessionState::LoggedOut;
        }
    }

    /// Clear the token and return to `LoggedOut`.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.token.clear();
        inner.state = SessionState::LoggedOut;
    }
}
