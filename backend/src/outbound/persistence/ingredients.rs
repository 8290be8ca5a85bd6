//! PostgreSQL-backed `IngredientRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::IngredientId;
use crate::domain::ingredient::Ingredient;
use crate::domain::ports::{IngredientRepository, IngredientRepositoryError};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::IngredientRow;
use super::pool::{DbPool, PoolError};
use super::schema::ingredients;

/// Diesel-backed implementation of the `IngredientRepository` port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> IngredientRepositoryError {
    map_pool_error(error, IngredientRepositoryError::connection)
}

fn diesel_err(error: diesel::result::Error) -> IngredientRepositoryError {
    map_diesel_error(
        error,
        IngredientRepositoryError::query,
        IngredientRepositoryError::connection,
    )
}

/// Escape LIKE metacharacters so a user-supplied prefix matches literally.
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn search(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let mut query = ingredients::table.into_boxed();
        if let Some(prefix) = name_prefix {
            let pattern = format!("{}%", escape_like(prefix));
            query = query.filter(ingredients::name.ilike(pattern));
        }
        let rows: Vec<IngredientRow> = query
            .order(ingredients::name.asc())
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn fetch(&self, id: IngredientId) -> Result<Ingredient, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        ingredients::table
            .find(id)
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .map(Ingredient::from)
            .ok_or(IngredientRepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;
    use rstest::rstest;

    #[rstest]
    #[case("pot", "pot")]
    #[case("100%", "100\\%")]
    #[case("a_b", "a\\_b")]
    fn escapes_like_metacharacters(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_like(raw), expected);
    }
}
