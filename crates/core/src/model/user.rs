use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// Account identity as reported by `GET /api/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

impl User {
    /// Name to greet the user with; falls back to the email when no name is set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() { &self.email } else { name }
    }
}

//
// ─── SESSION TOKEN ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("session token cannot be empty")]
    Empty,
}

/// Opaque bearer credential issued by the server on login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token string.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Empty` if the token is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

//
// ─── PROFILE EDITS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("full name cannot be empty")]
    EmptyName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Raw profile form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl ProfileDraft {
    /// Pre-fills the form from the current identity with an empty password.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            password: String::new(),
        }
    }

    /// # Errors
    ///
    /// Returns `ProfileError` if the name is blank or the email is malformed.
    pub fn validate(self) -> Result<ProfileUpdate, ProfileError> {
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let email = validate_email(&self.email)?;
        let password = if self.password.is_empty() {
            None
        } else {
            Some(self.password)
        };
        Ok(ProfileUpdate {
            email,
            full_name,
            password,
        })
    }
}

/// Validated profile change. `password: None` keeps the current password.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password_changed", &self.password.is_some())
            .finish()
    }
}

/// Normalises an email address and checks it has a local part and a domain.
///
/// # Errors
///
/// Returns `ProfileError::InvalidEmail` when the shape is wrong.
pub fn validate_email(raw: &str) -> Result<String, ProfileError> {
    let email = raw.trim();
    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ProfileError::InvalidEmail(email.to_owned()));
    }
    Ok(email.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            email: "test@example.com".into(),
            full_name: "Test User".into(),
            is_active: true,
        }
    }

    #[test]
    fn user_deserializes_and_ignores_extra_fields() {
        let json = r#"{"id":1,"email":"test@example.com","full_name":"Test User","is_active":true,"created_at":"2024-01-01T00:00:00"}"#;
        let parsed: User = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, user());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut u = user();
        assert_eq!(u.display_name(), "Test User");
        u.full_name = "  ".into();
        assert_eq!(u.display_name(), "test@example.com");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = SessionToken::new("test_token").unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(<redacted>)");
        assert_eq!(token.bearer_header(), "Bearer test_token");
        assert_eq!(SessionToken::new("  ").unwrap_err(), TokenError::Empty);
    }

    #[test]
    fn empty_password_keeps_current_one() {
        let update = ProfileDraft::from_user(&user()).validate().unwrap();
        assert_eq!(update.password, None);
        assert_eq!(update.email, "test@example.com");
    }

    #[test]
    fn profile_validation_rejects_bad_input() {
        let mut draft = ProfileDraft::from_user(&user());
        draft.full_name = " ".into();
        assert_eq!(draft.validate().unwrap_err(), ProfileError::EmptyName);

        let mut draft = ProfileDraft::from_user(&user());
        draft.email = "no-at-sign".into();
        assert!(matches!(
            draft.validate().unwrap_err(),
            ProfileError::InvalidEmail(_)
        ));
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("@example.com").is_err());
    }
}
