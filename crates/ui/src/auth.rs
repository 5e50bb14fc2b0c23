//! Reactive mirror of the session store.
//!
//! `SessionStore` is plain shared state; views read sign-in status through the
//! signals here and call [`AuthHandle::sync`] after every store operation.

use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::User;
use services::{AuthState, SessionStore};

#[derive(Clone, Copy, PartialEq)]
pub struct AuthHandle {
    state: Signal<AuthState>,
    expired: Signal<bool>,
}

impl AuthHandle {
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), AuthState::Authenticated(_))
    }

    #[must_use]
    pub fn is_validating(&self) -> bool {
        matches!(*self.state.read(), AuthState::Validating)
    }

    /// Whether the last session ended because the server rejected the token.
    #[must_use]
    pub fn session_expired(&self) -> bool {
        *self.expired.read()
    }

    pub fn sync(self, store: &SessionStore) {
        let mut state = self.state;
        state.set(store.state());
    }

    pub fn clear_expired(self) {
        let mut expired = self.expired;
        if *expired.peek() {
            expired.set(false);
        }
    }

    fn mark_expired(self) {
        let mut expired = self.expired;
        expired.set(true);
    }

    fn mark_validating(self) {
        let mut state = self.state;
        state.set(AuthState::Validating);
    }
}

/// Install the handle for the subtree, seeded from the store's current state.
pub fn use_auth_provider(store: &Arc<SessionStore>) -> AuthHandle {
    let store = Arc::clone(store);
    use_context_provider(move || AuthHandle {
        state: Signal::new(store.state()),
        expired: Signal::new(false),
    })
}

#[must_use]
pub fn use_auth() -> AuthHandle {
    use_context::<AuthHandle>()
}

pub async fn restore(store: Arc<SessionStore>, auth: AuthHandle) {
    auth.mark_validating();
    store.restore().await;
    auth.sync(&store);
}

pub async fn logout(store: Arc<SessionStore>, auth: AuthHandle) {
    store.logout().await;
    auth.clear_expired();
    auth.sync(&store);
}

/// End the session after an authenticated call came back 401.
pub async fn expire(store: Arc<SessionStore>, auth: AuthHandle) {
    store.expire().await;
    auth.mark_expired();
    auth.sync(&store);
}
