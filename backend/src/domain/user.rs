//! User identity, registration input, and viewer-relative projections.
//!
//! `email` and `username` are globally unique; the username is restricted to
//! word characters plus `@ . + -`, mirroring the public API contract.

use serde::Serialize;
use thiserror::Error;

use super::UserId;
use super::recipe::RecipeCard;

/// Maximum stored length for usernames and name fields.
pub const NAME_MAX_LEN: usize = 150;
/// Maximum stored length for email addresses.
pub const EMAIL_MAX_LEN: usize = 254;

/// Validation errors for registration fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Field is empty after trimming whitespace.
    #[error("{0} must not be empty")]
    Empty(&'static str),
    /// Field exceeds its maximum stored length.
    #[error("{0} is too long")]
    TooLong(&'static str),
    /// Username contains a character outside `[\w.@+-]`.
    #[error("username may only contain letters, digits and @/./+/-/_")]
    InvalidUsername,
    /// Email address is not plausibly formed.
    #[error("email address is malformed")]
    InvalidEmail,
}

/// Validated username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw username.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::Empty("username"));
        }
        if raw.chars().count() > NAME_MAX_LEN {
            return Err(UserValidationError::TooLong("username"));
        }
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
        if !raw.chars().all(allowed) {
            return Err(UserValidationError::InvalidUsername);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated email address.
///
/// Only a structural sanity check; deliverability is not this layer's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate and wrap a raw email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::Empty("email"));
        }
        if raw.chars().count() > EMAIL_MAX_LEN {
            return Err(UserValidationError::TooLong("email"));
        }
        match raw.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(Self(raw)),
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated registration payload, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

impl NewUser {
    /// Assemble a registration payload, validating the name fields.
    pub fn new(
        email: Email,
        username: Username,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() {
            return Err(UserValidationError::Empty("first_name"));
        }
        if last_name.trim().is_empty() {
            return Err(UserValidationError::Empty("last_name"));
        }
        if first_name.chars().count() > NAME_MAX_LEN {
            return Err(UserValidationError::TooLong("first_name"));
        }
        if last_name.chars().count() > NAME_MAX_LEN {
            return Err(UserValidationError::TooLong("last_name"));
        }
        Ok(Self {
            email,
            username,
            first_name,
            last_name,
            password_hash: password_hash.into(),
        })
    }
}

/// Viewer-relative user projection.
///
/// `is_subscribed` is recomputed on every read for the requesting identity
/// and is always `false` for an anonymous viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

/// Subscription projection: a profile plus the author's recipes.
///
/// `recipes` is capped by the caller-supplied `recipes_limit`;
/// `recipes_count` always reflects the uncapped total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionProfile {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub recipes: Vec<RecipeCard>,
    pub recipes_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("chef.pierre")]
    #[case("user@host")]
    #[case("a_b+c-d")]
    #[case("повар")]
    fn accepts_valid_usernames(#[case] raw: &str) {
        assert!(Username::new(raw).is_ok());
    }

    #[rstest]
    #[case("has space", UserValidationError::InvalidUsername)]
    #[case("semi;colon", UserValidationError::InvalidUsername)]
    #[case("", UserValidationError::Empty("username"))]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_username() {
        let raw = "a".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::TooLong("username"))
        );
    }

    #[rstest]
    #[case("pierre@example.com", true)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("pierre@nodot", false)]
    fn email_structural_check(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Email::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn new_user_rejects_blank_names() {
        let email = Email::new("p@example.com").expect("valid email");
        let username = Username::new("pierre").expect("valid username");
        let result = NewUser::new(email, username, "  ", "Dupont", "hash");
        assert_eq!(result.err(), Some(UserValidationError::Empty("first_name")));
    }
}
