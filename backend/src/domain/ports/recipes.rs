//! Recipe persistence port, including the write coordinator contract.

use async_trait::async_trait;
use thiserror::Error;

use super::PageWindow;
use crate::domain::recipe::{RecipeDraft, RecipeProjection};
use crate::domain::{IngredientId, RecipeId, UserId, Viewer};

/// Errors surfaced by the recipe persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeRepositoryError {
    /// Database connectivity failures.
    #[error("recipe persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("recipe persistence query failed: {message}")]
    Query { message: String },
    /// No recipe with the requested id.
    #[error("recipe not found")]
    NotFound,
    /// A draft referenced an ingredient id missing from the catalogue.
    #[error("ingredient {0} does not exist")]
    UnknownIngredient(IngredientId),
    /// The author already has a recipe with this name.
    #[error("recipe with this name already exists for this author")]
    DuplicateName,
}

impl RecipeRepositoryError {
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

/// Listing filters; the membership filters are viewer-relative and match
/// nothing for an anonymous viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub only_favorited: bool,
    pub only_in_cart: bool,
}

/// Storage port for recipes and their ingredient sets.
///
/// `create` and `update` are the write coordinator: the recipe row and its
/// full `(ingredient, amount)` set land in one atomic transaction, or not
/// at all. Updates replace the entire ingredient set (clear-then-insert).
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Persist a new recipe with its validated ingredient set.
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError>;

    /// Replace a recipe's scalar fields and entire ingredient set.
    async fn update(&self, id: RecipeId, draft: &RecipeDraft)
        -> Result<(), RecipeRepositoryError>;

    /// Delete a recipe; join rows cascade.
    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError>;

    /// The recipe's author, for permission checks.
    async fn author_of(&self, id: RecipeId) -> Result<UserId, RecipeRepositoryError>;

    /// Full projection of one recipe, viewer-relative flags included.
    async fn fetch(
        &self,
        id: RecipeId,
        viewer: Viewer,
    ) -> Result<RecipeProjection, RecipeRepositoryError>;

    /// Filtered listing, newest first, with the total count for the
    /// pagination envelope.
    async fn list(
        &self,
        filter: &RecipeFilter,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<RecipeProjection>), RecipeRepositoryError>;
}
