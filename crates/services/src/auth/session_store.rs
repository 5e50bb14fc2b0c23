use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quiz_core::model::{ProfileError, User, validate_email};
use storage::repository::TokenRepository;

use crate::api::{NewAccount, QuizApi};
use crate::auth::AuthState;
use crate::error::{ApiError, AuthError};

/// Owns the single active session of the client.
///
/// The persisted token, the API client's default bearer header and the cached
/// identity always change together. State lives behind a mutex that is never
/// held across an `.await`.
///
/// A sign-in or validation whose future is dropped before it settles is rolled
/// back to `Unauthenticated`; a token it may already have persisted is cleared
/// by the next `login` or `restore`.
pub struct SessionStore {
    api: Arc<dyn QuizApi>,
    tokens: Arc<dyn TokenRepository>,
    state: Mutex<AuthState>,
    stale_token: AtomicBool,
}

/// Rollback for an in-flight `login`/`restore` that never reached its end.
struct PendingAuth<'a> {
    store: &'a SessionStore,
    may_leave_token: bool,
    settled: bool,
}

impl<'a> PendingAuth<'a> {
    fn new(store: &'a SessionStore, may_leave_token: bool) -> Self {
        Self {
            store,
            may_leave_token,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingAuth<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("sign-in abandoned before it completed, rolling back");
        self.store.api.set_bearer(None);
        if self.may_leave_token {
            self.store.stale_token.store(true, Ordering::SeqCst);
        }
        self.store.set_state(AuthState::Unauthenticated);
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self {
            api,
            tokens,
            state: Mutex::new(AuthState::Unauthenticated),
            stale_token: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: AuthState) {
        *self.lock() = next;
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.lock().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.lock().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.lock(), AuthState::Authenticated(_))
    }

    /// Validate a token persisted by a previous launch.
    ///
    /// Failures are silent: the token is discarded and the store stays signed out.
    pub async fn restore(&self) -> Option<User> {
        {
            let mut state = self.lock();
            if *state != AuthState::Unauthenticated {
                return state.user().cloned();
            }
            *state = AuthState::Validating;
        }
        let pending = PendingAuth::new(self, false);
        let restored = self.validate_persisted().await;
        pending.settle();
        restored
    }

    async fn validate_persisted(&self) -> Option<User> {
        self.clear_stale_token().await;
        let token = match self.tokens.load_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set_state(AuthState::Unauthenticated);
                return None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not read persisted token");
                self.set_state(AuthState::Unauthenticated);
                return None;
            }
        };

        self.api.set_bearer(Some(token));
        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "restored session");
                self.set_state(AuthState::Authenticated(user.clone()));
                Some(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding persisted token");
                self.discard_session().await;
                None
            }
        }
    }

    /// Exchange credentials for a token, persist it and load the identity.
    ///
    /// Signing in while another account is active ends that session first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Busy` while another sign-in or validation runs.
    /// Returns `AuthError::InvalidCredentials` if the server rejects the credentials.
    /// Returns `AuthError::Api` or `AuthError::Storage` for transport or persistence failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let was_authenticated = {
            let mut state = self.lock();
            if state.is_busy() {
                return Err(AuthError::Busy);
            }
            let was = matches!(*state, AuthState::Authenticated(_));
            *state = AuthState::Authenticating;
            was
        };
        let pending = PendingAuth::new(self, true);
        self.clear_stale_token().await;
        if was_authenticated {
            self.api.set_bearer(None);
            self.clear_persisted().await;
        }

        let outcome = match self.authenticate(email.trim(), password).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "signed in");
                self.set_state(AuthState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(err) => {
                self.discard_session().await;
                Err(err)
            }
        };
        pending.settle();
        outcome
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let token = self
            .api
            .issue_token(email, password)
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized | ApiError::BadRequest(_) => AuthError::InvalidCredentials,
                other => AuthError::Api(other),
            })?;
        self.tokens.save_token(&token).await?;
        self.api.set_bearer(Some(token));
        let user = self.api.current_user().await?;
        Ok(user)
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for a malformed email or blank name.
    /// Returns `AuthError::AlreadyRegistered` if the email is taken.
    /// Returns `AuthError::Rejected` for other refusals, or any error of [`Self::login`].
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, AuthError> {
        if self.lock().is_busy() {
            return Err(AuthError::Busy);
        }
        let email = validate_email(email)?;
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(ProfileError::EmptyName.into());
        }
        if password.is_empty() {
            return Err(AuthError::Rejected("password is required".into()));
        }

        let account = NewAccount {
            email,
            password: password.to_owned(),
            full_name: full_name.to_owned(),
        };
        let created = self.api.register(&account).await.map_err(|err| match err {
            ApiError::BadRequest(detail) if detail.to_lowercase().contains("already") => {
                AuthError::AlreadyRegistered
            }
            ApiError::BadRequest(detail) => AuthError::Rejected(detail),
            other => AuthError::Api(other),
        })?;
        tracing::info!(user_id = %created.id, "registered account");

        self.login(&account.email, &account.password).await
    }

    /// End the session locally. Never fails and makes no network call.
    pub async fn logout(&self) {
        self.discard_session().await;
        tracing::info!("signed out");
    }

    /// End the session after the server stopped accepting the token.
    pub async fn expire(&self) {
        tracing::warn!("session token rejected by server, signing out");
        self.discard_session().await;
    }

    /// Replace the cached identity, e.g. after a profile update.
    pub fn refresh_user(&self, user: User) {
        let mut state = self.lock();
        if matches!(*state, AuthState::Authenticated(_)) {
            *state = AuthState::Authenticated(user);
        }
    }

    async fn discard_session(&self) {
        self.api.set_bearer(None);
        self.clear_persisted().await;
        self.set_state(AuthState::Unauthenticated);
    }

    async fn clear_persisted(&self) {
        match self.tokens.clear_token().await {
            Ok(()) => self.stale_token.store(false, Ordering::SeqCst),
            Err(err) => tracing::warn!(error = %err, "could not clear persisted token"),
        }
    }

    async fn clear_stale_token(&self) {
        if self.stale_token.load(Ordering::SeqCst) {
            tracing::debug!("clearing token left by an abandoned sign-in");
            self.clear_persisted().await;
        }
    }
}
