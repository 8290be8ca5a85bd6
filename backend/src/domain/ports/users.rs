//! User account persistence port.

use async_trait::async_trait;
use thiserror::Error;

use super::PageWindow;
use crate::domain::user::{NewUser, UserProfile};
use crate::domain::{UserId, Viewer};

/// Errors surfaced by the user persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// Database connectivity failures.
    #[error("user persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("user persistence query failed: {message}")]
    Query { message: String },
    /// No user with the requested id.
    #[error("user not found")]
    NotFound,
    /// Registration email already in use.
    #[error("email is already registered")]
    EmailTaken,
    /// Registration username already in use.
    #[error("username is already taken")]
    UsernameTaken,
}

impl UserRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Login lookup result: the account id and its stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Storage port for user accounts and their viewer-relative projections.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account; email and username must be globally unique.
    async fn register(&self, new_user: &NewUser) -> Result<UserId, UserRepositoryError>;

    /// Fetch one profile, with `is_subscribed` computed for `viewer`.
    async fn fetch(&self, id: UserId, viewer: Viewer) -> Result<UserProfile, UserRepositoryError>;

    /// List profiles ordered by id, returning the total count alongside the
    /// requested window.
    async fn list(
        &self,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<UserProfile>), UserRepositoryError>;

    /// Look up login credentials by email; `None` when unknown.
    async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, UserRepositoryError>;

    /// The stored password hash for an account.
    async fn password_hash(&self, id: UserId) -> Result<String, UserRepositoryError>;

    /// Replace the stored password hash.
    async fn set_password_hash(&self, id: UserId, hash: &str) -> Result<(), UserRepositoryError>;

    /// The stored avatar, if any.
    async fn avatar(&self, id: UserId) -> Result<Option<String>, UserRepositoryError>;

    /// Set or clear the stored avatar.
    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<&str>,
    ) -> Result<(), UserRepositoryError>;
}
