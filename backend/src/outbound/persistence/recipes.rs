//! PostgreSQL-backed `RecipeRepository` implementation using Diesel.
//!
//! Create and update are the write coordinator: the recipe row and its full
//! ingredient set are persisted inside one explicit transaction, so a
//! failing insert leaves no partially updated ingredient set behind. Updates
//! use clear-then-insert semantics: the existing `recipe_ingredients` rows
//! are deleted wholesale and the validated set re-inserted.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PageWindow, RecipeFilter, RecipeRepository, RecipeRepositoryError};
use crate::domain::recipe::{RecipeDraft, RecipeIngredientDetail, RecipeProjection};
use crate::domain::user::UserProfile;
use crate::domain::{RecipeId, UserId, Viewer};

use super::error_map::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewRecipeIngredientRow, NewRecipeRow, RecipeRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_carts,
                    subscriptions, users};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> RecipeRepositoryError {
    map_pool_error(error, RecipeRepositoryError::connection)
}

fn diesel_err(error: diesel::result::Error) -> RecipeRepositoryError {
    map_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

// Required by `AsyncConnection::transaction`; a unique violation inside the
// write path can only come from the `(name, author)` constraint because the
// draft already deduplicates ingredient references.
impl From<diesel::result::Error> for RecipeRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        if is_unique_violation(&error) {
            Self::DuplicateName
        } else {
            diesel_err(error)
        }
    }
}

/// Verify every referenced ingredient exists before writing join rows.
async fn check_ingredients_exist(
    conn: &mut AsyncPgConnection,
    draft: &RecipeDraft,
) -> Result<(), RecipeRepositoryError> {
    let wanted: Vec<i32> = draft
        .ingredients()
        .iter()
        .map(|pair| pair.ingredient_id)
        .collect();
    let known: Vec<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&wanted))
        .select(ingredients::id)
        .load(conn)
        .await?;
    let known: HashSet<i32> = known.into_iter().collect();
    for id in wanted {
        if !known.contains(&id) {
            return Err(RecipeRepositoryError::UnknownIngredient(id));
        }
    }
    Ok(())
}

fn join_rows(recipe_id: RecipeId, draft: &RecipeDraft) -> Vec<NewRecipeIngredientRow> {
    draft
        .ingredients()
        .iter()
        .map(|pair| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: pair.ingredient_id,
            amount: pair.amount,
        })
        .collect()
}

/// Assemble viewer-relative projections for the given recipe rows,
/// preserving their order.
async fn project(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
    viewer: Viewer,
) -> Result<Vec<RecipeProjection>, RecipeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<RecipeId> = rows.iter().map(|row| row.id).collect();
    let author_ids: Vec<UserId> = rows.iter().map(|row| row.author_id).collect();

    let author_rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(diesel_err)?;

    let subscribed: HashSet<UserId> = match viewer {
        Some(subscriber) => subscriptions::table
            .filter(subscriptions::subscriber_id.eq(subscriber))
            .filter(subscriptions::target_id.eq_any(&author_ids))
            .select(subscriptions::target_id)
            .load::<UserId>(conn)
            .await
            .map_err(diesel_err)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let authors: HashMap<UserId, UserProfile> = author_rows
        .into_iter()
        .map(|row| {
            let profile = UserProfile {
                id: row.id,
                email: row.email,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                is_subscribed: subscribed.contains(&row.id),
                avatar: row.avatar,
            };
            (profile.id, profile)
        })
        .collect();

    let ingredient_rows: Vec<(RecipeId, i32, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)
        .await
        .map_err(diesel_err)?;

    let mut ingredients_by_recipe: HashMap<RecipeId, Vec<RecipeIngredientDetail>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientDetail {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart): (HashSet<RecipeId>, HashSet<RecipeId>) = match viewer {
        Some(user) => {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(user))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load::<RecipeId>(conn)
                .await
                .map_err(diesel_err)?
                .into_iter()
                .collect();
            let in_cart = shopping_carts::table
                .filter(shopping_carts::user_id.eq(user))
                .filter(shopping_carts::recipe_id.eq_any(&recipe_ids))
                .select(shopping_carts::recipe_id)
                .load::<RecipeId>(conn)
                .await
                .map_err(diesel_err)?
                .into_iter()
                .collect();
            (favorited, in_cart)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    let mut projections = Vec::with_capacity(rows.len());
    for row in rows {
        let author = authors
            .get(&row.author_id)
            .cloned()
            .ok_or_else(|| RecipeRepositoryError::query("recipe author row missing"))?;
        projections.push(RecipeProjection {
            id: row.id,
            author,
            ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
            is_in_shopping_cart: in_cart.contains(&row.id),
            is_favorited: favorited.contains(&row.id),
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
            pub_date: row.pub_date,
        });
    }
    Ok(projections)
}

fn filtered(
    filter: &RecipeFilter,
    viewer: Viewer,
) -> recipes::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }
    if filter.only_favorited {
        // Caller guarantees a viewer is present when this flag is set.
        if let Some(user) = viewer {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .select(favorites::recipe_id),
                ),
            );
        }
    }
    if filter.only_in_cart {
        if let Some(user) = viewer {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_carts::table
                        .filter(shopping_carts::user_id.eq(user))
                        .select(shopping_carts::recipe_id),
                ),
            );
        }
    }
    query
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        conn.transaction(|conn| {
            async move {
                check_ingredients_exist(conn, draft).await?;
                let recipe_id: RecipeId = diesel::insert_into(recipes::table)
                    .values(&NewRecipeRow {
                        author_id: author,
                        name: draft.name(),
                        text: draft.text(),
                        cooking_time: draft.cooking_time(),
                        image: draft.image(),
                    })
                    .returning(recipes::id)
                    .get_result(conn)
                    .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(join_rows(recipe_id, draft))
                    .execute(conn)
                    .await?;
                Ok(recipe_id)
            }
            .scope_boxed()
        })
        .await
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        conn.transaction(|conn| {
            async move {
                check_ingredients_exist(conn, draft).await?;
                let updated = diesel::update(recipes::table.find(id))
                    .set((
                        recipes::name.eq(draft.name()),
                        recipes::text.eq(draft.text()),
                        recipes::cooking_time.eq(draft.cooking_time()),
                        recipes::image.eq(draft.image()),
                    ))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(RecipeRepositoryError::NotFound);
                }
                // Clear-then-insert: replace the whole set, never diff.
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
                )
                .execute(conn)
                .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(join_rows(id, draft))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(recipes::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        if deleted == 0 {
            return Err(RecipeRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn author_of(&self, id: RecipeId) -> Result<UserId, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        recipes::table
            .find(id)
            .select(recipes::author_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(RecipeRepositoryError::NotFound)
    }

    async fn fetch(
        &self,
        id: RecipeId,
        viewer: Viewer,
    ) -> Result<RecipeProjection, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row = recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(RecipeRepositoryError::NotFound)?;
        let mut projections = project(&mut conn, vec![row], viewer).await?;
        projections
            .pop()
            .ok_or_else(|| RecipeRepositoryError::query("projection assembly lost the row"))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<RecipeProjection>), RecipeRepositoryError> {
        // Viewer-relative filters match nothing for anonymous viewers.
        if viewer.is_none() && (filter.only_favorited || filter.only_in_cart) {
            return Ok((0, Vec::new()));
        }
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let total: i64 = filtered(filter, viewer)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?;
        let rows: Vec<RecipeRow> = filtered(filter, viewer)
            .order((recipes::pub_date.desc(), recipes::id.desc()))
            .limit(window.limit)
            .offset(window.offset)
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        let projections = project(&mut conn, rows, viewer).await?;
        Ok((total, projections))
    }
}
