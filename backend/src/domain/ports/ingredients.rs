//! Ingredient catalogue port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::IngredientId;
use crate::domain::ingredient::Ingredient;

/// Errors surfaced by the ingredient catalogue adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngredientRepositoryError {
    /// Database connectivity failures.
    #[error("ingredient persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("ingredient persistence query failed: {message}")]
    Query { message: String },
    /// No ingredient with the requested id.
    #[error("ingredient not found")]
    NotFound,
}

impl IngredientRepositoryError {
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

/// Read-only port over the ingredient catalogue.
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// All ingredients, optionally restricted to a case-insensitive name
    /// prefix, ordered by name.
    async fn search(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Fetch a single catalogue entry.
    async fn fetch(&self, id: IngredientId) -> Result<Ingredient, IngredientRepositoryError>;
}
