//! PostgreSQL-backed `SubscriptionRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::UserId;
use crate::domain::ports::{PageWindow, SubscriptionError, SubscriptionRepository};
use crate::domain::recipe::RecipeCard;
use crate::domain::user::{SubscriptionProfile, UserProfile};

use super::error_map::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, subscriptions, users};

/// Diesel-backed implementation of the `SubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> SubscriptionError {
    map_pool_error(error, SubscriptionError::connection)
}

fn diesel_err(error: diesel::result::Error) -> SubscriptionError {
    map_diesel_error(
        error,
        SubscriptionError::query,
        SubscriptionError::connection,
    )
}

/// Author profile plus their capped recipe list; `is_subscribed` is true by
/// construction in every context this is built for.
async fn author_profile(
    conn: &mut AsyncPgConnection,
    row: UserRow,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionProfile, SubscriptionError> {
    let author_id = row.id;
    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .count()
        .get_result(conn)
        .await
        .map_err(diesel_err)?;

    let mut query = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .select((
            recipes::id,
            recipes::name,
            recipes::image,
            recipes::cooking_time,
        ))
        .into_boxed();
    if let Some(cap) = recipes_limit {
        query = query.limit(cap);
    }
    let cards: Vec<(i32, String, String, i32)> =
        query.load(conn).await.map_err(diesel_err)?;

    Ok(SubscriptionProfile {
        profile: UserProfile {
            id: row.id,
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_subscribed: true,
            avatar: row.avatar,
        },
        recipes: cards
            .into_iter()
            .map(|(id, name, image, cooking_time)| RecipeCard {
                id,
                name,
                image,
                cooking_time,
            })
            .collect(),
        recipes_count,
    })
}

async fn target_row(
    conn: &mut AsyncPgConnection,
    target: UserId,
) -> Result<UserRow, SubscriptionError> {
    users::table
        .find(target)
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(diesel_err)?
        .ok_or(SubscriptionError::TargetNotFound)
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn subscribe(
        &self,
        subscriber: UserId,
        target: UserId,
        recipes_limit: Option<i64>,
    ) -> Result<SubscriptionProfile, SubscriptionError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row = target_row(&mut conn, target).await?;
        if subscriber == target {
            return Err(SubscriptionError::SelfSubscription);
        }

        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::subscriber_id.eq(subscriber),
                subscriptions::target_id.eq(target),
            ))
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    SubscriptionError::AlreadySubscribed
                } else {
                    diesel_err(error)
                }
            })?;

        author_profile(&mut conn, row, recipes_limit).await
    }

    async fn unsubscribe(
        &self,
        subscriber: UserId,
        target: UserId,
    ) -> Result<(), SubscriptionError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        target_row(&mut conn, target).await?;

        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::subscriber_id.eq(subscriber))
                .filter(subscriptions::target_id.eq(target)),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        if deleted == 0 {
            return Err(SubscriptionError::NotSubscribed);
        }
        Ok(())
    }

    async fn subscriptions(
        &self,
        subscriber: UserId,
        window: PageWindow,
        recipes_limit: Option<i64>,
    ) -> Result<(i64, Vec<SubscriptionProfile>), SubscriptionError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let total: i64 = subscriptions::table
            .filter(subscriptions::subscriber_id.eq(subscriber))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?;

        let rows: Vec<UserRow> = users::table
            .filter(
                users::id.eq_any(
                    subscriptions::table
                        .filter(subscriptions::subscriber_id.eq(subscriber))
                        .select(subscriptions::target_id),
                ),
            )
            .order(users::username.asc())
            .limit(window.limit)
            .offset(window.offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            profiles.push(author_profile(&mut conn, row, recipes_limit).await?);
        }
        Ok((total, profiles))
    }
}
