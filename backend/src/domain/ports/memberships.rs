//! Favorite / shopping-cart membership port and the cart aggregation query.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::membership::MembershipKind;
use crate::domain::recipe::RecipeCard;
use crate::domain::shopping_list::ShoppingListItem;
use crate::domain::{RecipeId, UserId};

/// Errors surfaced by the membership adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// Database connectivity failures.
    #[error("membership persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("membership persistence query failed: {message}")]
    Query { message: String },
    /// The referenced recipe does not exist.
    #[error("recipe not found")]
    RecipeNotFound,
    /// The `(user, recipe)` row already exists.
    #[error("recipe is already present in this relation")]
    AlreadyPresent,
    /// No `(user, recipe)` row to remove.
    #[error("recipe is not present in this relation")]
    NotPresent,
    /// Aggregation requested while the cart holds no recipes.
    #[error("shopping cart is empty")]
    EmptyCart,
}

impl MembershipError {
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

/// Storage port for the two user↔recipe membership relations.
///
/// Adds and removes are explicit actions, never upserts: repeating an add is
/// a failure, not a no-op. Concurrent duplicate adds are arbitrated by the
/// table's uniqueness constraint; the loser surfaces as
/// [`MembershipError::AlreadyPresent`].
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert a membership row and return the compact recipe projection.
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeCard, MembershipError>;

    /// Delete a membership row.
    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipError>;

    /// Aggregate the user's cart: one item per `(name, unit)` group with
    /// summed amounts, ordered by name then unit. An empty cart is reported
    /// as [`MembershipError::EmptyCart`], distinct from a zero-line result.
    async fn shopping_list(&self, user: UserId) -> Result<Vec<ShoppingListItem>, MembershipError>;
}
