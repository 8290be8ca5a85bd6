//! User-to-user subscription port.

use async_trait::async_trait;
use thiserror::Error;

use super::PageWindow;
use crate::domain::UserId;
use crate::domain::user::SubscriptionProfile;

/// Errors surfaced by the subscription adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// Database connectivity failures.
    #[error("subscription persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("subscription persistence query failed: {message}")]
    Query { message: String },
    /// The subscription target does not exist.
    #[error("user not found")]
    TargetNotFound,
    /// Subject equals object.
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    /// The subscription row already exists.
    #[error("already subscribed to this user")]
    AlreadySubscribed,
    /// No subscription row to remove.
    #[error("not subscribed to this user")]
    NotSubscribed,
}

impl SubscriptionError {
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

/// Storage port for subscriptions between users.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Create a subscription and return the target's profile with their
    /// recipe count and a `recipes_limit`-capped recipe list.
    async fn subscribe(
        &self,
        subscriber: UserId,
        target: UserId,
        recipes_limit: Option<i64>,
    ) -> Result<SubscriptionProfile, SubscriptionError>;

    /// Remove a subscription.
    async fn unsubscribe(&self, subscriber: UserId, target: UserId)
        -> Result<(), SubscriptionError>;

    /// Authors the user is subscribed to, ordered by username, with the
    /// total count for the pagination envelope.
    async fn subscriptions(
        &self,
        subscriber: UserId,
        window: PageWindow,
        recipes_limit: Option<i64>,
    ) -> Result<(i64, Vec<SubscriptionProfile>), SubscriptionError>;
}
