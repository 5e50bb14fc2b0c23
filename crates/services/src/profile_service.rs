use std::sync::Arc;

use quiz_core::model::{ProfileDraft, QuizHistoryEntry, User};

use crate::api::QuizApi;
use crate::auth::SessionStore;
use crate::error::{ApiError, LoadError, SubmitError};

/// Account page operations for the signed-in user.
#[derive(Clone)]
pub struct ProfileService {
    api: Arc<dyn QuizApi>,
    session: Arc<SessionStore>,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Fetch the current identity from the server and refresh the cached copy.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unauthorized` if the token was rejected, `LoadError::Api` otherwise.
    pub async fn load_profile(&self) -> Result<User, LoadError> {
        let user = self.api.current_user().await?;
        self.session.refresh_user(user.clone());
        Ok(user)
    }

    /// Past quiz summaries, one per topic.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unauthorized` if the token was rejected, `LoadError::Api` otherwise.
    pub async fn load_history(&self) -> Result<Vec<QuizHistoryEntry>, LoadError> {
        Ok(self.api.quiz_history().await?)
    }

    /// Validate and save profile edits. A blank password keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` for a blank name or malformed email,
    /// `SubmitError::EmailTaken` if the new email belongs to another account,
    /// and `SubmitError::Unauthorized`/`Api` for request failures.
    pub async fn update_profile(&self, draft: ProfileDraft) -> Result<User, SubmitError> {
        let update = draft.validate()?;
        let user = self
            .api
            .update_profile(&update)
            .await
            .map_err(|err| match err {
                ApiError::BadRequest(detail) if detail.to_lowercase().contains("already") => {
                    SubmitError::EmailTaken
                }
                other => SubmitError::from(other),
            })?;
        tracing::info!(user_id = %user.id, "profile updated");
        self.session.refresh_user(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, InMemoryApi};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    async fn signed_in() -> (ProfileService, Arc<SessionStore>, Arc<InMemoryApi>) {
        let api = Arc::new(
            InMemoryApi::new(fixed_clock())
                .with_user("test@example.com", "password", "Test User")
                .with_user("other@example.com", "secret", "Other User"),
        );
        let session = Arc::new(SessionStore::new(
            api.clone(),
            Arc::new(InMemoryRepository::new()),
        ));
        session.login("test@example.com", "password").await.unwrap();
        (ProfileService::new(api.clone(), Arc::clone(&session)), session, api)
    }

    #[tokio::test]
    async fn taken_email_maps_to_email_taken() {
        let (profile, session, _) = signed_in().await;
        let before = session.current_user().unwrap();

        let mut draft = ProfileDraft::from_user(&before);
        draft.email = "other@example.com".into();
        let err = profile.update_profile(draft).await.unwrap_err();

        assert!(matches!(err, SubmitError::EmailTaken));
        assert_eq!(session.current_user(), Some(before));
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_the_server() {
        let (profile, session, api) = signed_in().await;
        let mut draft = ProfileDraft::from_user(&session.current_user().unwrap());
        draft.email = "not-an-email".into();

        let err = profile.update_profile(draft).await.unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(api.call_count(Endpoint::UpdateProfile), 0);
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let (profile, session, api) = signed_in().await;
        api.revoke_tokens();

        let draft = ProfileDraft::from_user(&session.current_user().unwrap());
        let err = profile.update_profile(draft).await.unwrap_err();
        assert!(matches!(err, SubmitError::Unauthorized));
        assert!(matches!(
            profile.load_profile().await,
            Err(LoadError::Unauthorized)
        ));
    }
}
