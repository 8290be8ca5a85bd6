//! PostgreSQL-backed `ShortLinkRepository` implementation using Diesel.
//!
//! Codes are generated from the OS CSPRNG on the first link request for a
//! recipe. A generated code that collides with an existing row is discarded
//! and regenerated; the uniqueness constraint arbitrates races.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::rngs::OsRng;
use tracing::debug;

use crate::domain::RecipeId;
use crate::domain::ports::{ShortLinkError, ShortLinkRepository};
use crate::domain::short_link::ShortLinkCode;

use super::error_map::{is_unique_violation, map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, short_links};

/// Collision retries before giving up; with a 36^8 code space this bound is
/// effectively unreachable.
const MAX_GENERATION_ATTEMPTS: usize = 8;

/// Diesel-backed implementation of the `ShortLinkRepository` port.
#[derive(Clone)]
pub struct DieselShortLinkRepository {
    pool: DbPool,
}

impl DieselShortLinkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> ShortLinkError {
    map_pool_error(error, ShortLinkError::connection)
}

fn diesel_err(error: diesel::result::Error) -> ShortLinkError {
    map_diesel_error(error, ShortLinkError::query, ShortLinkError::connection)
}

#[async_trait]
impl ShortLinkRepository for DieselShortLinkRepository {
    async fn get_or_create(&self, recipe: RecipeId) -> Result<ShortLinkCode, ShortLinkError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;

        let recipe_exists: bool = diesel::select(diesel::dsl::exists(recipes::table.find(recipe)))
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?;
        if !recipe_exists {
            return Err(ShortLinkError::RecipeNotFound);
        }

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let existing: Option<String> = short_links::table
                .filter(short_links::recipe_id.eq(recipe))
                .select(short_links::code)
                .first(&mut conn)
                .await
                .optional()
                .map_err(diesel_err)?;
            if let Some(code) = existing {
                return ShortLinkCode::parse(&code)
                    .map_err(|error| ShortLinkError::query(error.to_string()));
            }

            let candidate = ShortLinkCode::generate(&mut OsRng);
            let inserted = diesel::insert_into(short_links::table)
                .values((
                    short_links::recipe_id.eq(recipe),
                    short_links::code.eq(candidate.as_str()),
                ))
                .execute(&mut conn)
                .await;
            match inserted {
                Ok(_) => return Ok(candidate),
                // Either the code collided or a concurrent request linked
                // this recipe first; loop to re-read or regenerate.
                Err(error) if is_unique_violation(&error) => {
                    debug!(recipe, code = %candidate, "short-link insert collided, retrying");
                }
                Err(error) => return Err(diesel_err(error)),
            }
        }
        Err(ShortLinkError::Exhausted)
    }

    async fn resolve(&self, code: &ShortLinkCode) -> Result<RecipeId, ShortLinkError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        short_links::table
            .filter(short_links::code.eq(code.as_str()))
            .select(short_links::recipe_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(ShortLinkError::UnknownCode)
    }
}
