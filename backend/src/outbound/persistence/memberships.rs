//! PostgreSQL-backed `MembershipRepository` implementation using Diesel.
//!
//! Favorites and shopping-cart rows live in distinct tables with identical
//! shapes; [`MembershipKind`] selects the table per operation. The shopping
//! list aggregation reproduces the grouped-sum query of the read model:
//! group join rows of carted recipes by `(name, unit)` and sum amounts.

use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::membership::MembershipKind;
use crate::domain::ports::{MembershipError, MembershipRepository};
use crate::domain::recipe::RecipeCard;
use crate::domain::shopping_list::ShoppingListItem;
use crate::domain::{RecipeId, UserId};

use super::error_map::{is_unique_violation, map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_carts};

/// Diesel-backed implementation of the `MembershipRepository` port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> MembershipError {
    map_pool_error(error, MembershipError::connection)
}

fn diesel_err(error: diesel::result::Error) -> MembershipError {
    map_diesel_error(error, MembershipError::query, MembershipError::connection)
}

/// The compact projection returned by membership adds; absent recipe maps to
/// [`MembershipError::RecipeNotFound`].
async fn recipe_card(
    conn: &mut AsyncPgConnection,
    recipe: RecipeId,
) -> Result<RecipeCard, MembershipError> {
    let row: Option<(RecipeId, String, String, i32)> = recipes::table
        .find(recipe)
        .select((
            recipes::id,
            recipes::name,
            recipes::image,
            recipes::cooking_time,
        ))
        .first(conn)
        .await
        .optional()
        .map_err(diesel_err)?;
    row.map(|(id, name, image, cooking_time)| RecipeCard {
        id,
        name,
        image,
        cooking_time,
    })
    .ok_or(MembershipError::RecipeNotFound)
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeCard, MembershipError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let card = recipe_card(&mut conn, recipe).await?;

        // The unique constraint arbitrates concurrent adds: the loser
        // surfaces here as AlreadyPresent.
        let inserted = match kind {
            MembershipKind::Favorite => {
                diesel::insert_into(favorites::table)
                    .values((
                        favorites::user_id.eq(user),
                        favorites::recipe_id.eq(recipe),
                    ))
                    .execute(&mut conn)
                    .await
            }
            MembershipKind::ShoppingCart => {
                diesel::insert_into(shopping_carts::table)
                    .values((
                        shopping_carts::user_id.eq(user),
                        shopping_carts::recipe_id.eq(recipe),
                    ))
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map_err(|error| {
            if is_unique_violation(&error) {
                MembershipError::AlreadyPresent
            } else {
                diesel_err(error)
            }
        })?;
        Ok(card)
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        recipe_card(&mut conn, recipe).await?;

        let deleted = match kind {
            MembershipKind::Favorite => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .filter(favorites::recipe_id.eq(recipe)),
                )
                .execute(&mut conn)
                .await
            }
            MembershipKind::ShoppingCart => {
                diesel::delete(
                    shopping_carts::table
                        .filter(shopping_carts::user_id.eq(user))
                        .filter(shopping_carts::recipe_id.eq(recipe)),
                )
                .execute(&mut conn)
                .await
            }
        };
        let deleted = deleted.map_err(diesel_err)?;
        if deleted == 0 {
            return Err(MembershipError::NotPresent);
        }
        Ok(())
    }

    async fn shopping_list(&self, user: UserId) -> Result<Vec<ShoppingListItem>, MembershipError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let cart_size: i64 = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?;
        if cart_size == 0 {
            return Err(MembershipError::EmptyCart);
        }

        let groups: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_carts::table
                        .filter(shopping_carts::user_id.eq(user))
                        .select(shopping_carts::recipe_id),
                ),
            )
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                sum(recipe_ingredients::amount),
            ))
            .order((
                ingredients::name.asc(),
                ingredients::measurement_unit.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;

        Ok(groups
            .into_iter()
            .map(|(name, measurement_unit, total)| ShoppingListItem {
                name,
                measurement_unit,
                total_amount: total.unwrap_or(0),
            })
            .collect())
    }
}
