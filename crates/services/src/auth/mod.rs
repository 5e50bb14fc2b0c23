//! Authentication lifecycle: token issue, persistence and identity caching.

mod session_store;

pub use session_store::SessionStore;

use quiz_core::model::User;

/// Where the client is in the sign-in lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// A persisted token is being checked at startup.
    Validating,
    /// Credentials were submitted and the identity is not known yet.
    Authenticating,
    Authenticated(User),
}

impl AuthState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Authenticating)
    }
}
