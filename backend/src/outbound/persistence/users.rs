//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{Credentials, PageWindow, UserRepository, UserRepositoryError};
use crate::domain::user::{NewUser, UserProfile};
use crate::domain::{UserId, Viewer};

use super::error_map::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_err(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn diesel_err(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// The unique column a constraint violation arbitrated, read from the
/// Postgres constraint name carried on the error.
enum TakenField {
    Email,
    Username,
}

fn unique_violation_field(error: &diesel::result::Error) -> Option<TakenField> {
    if !is_unique_violation(error) {
        return None;
    }
    match error {
        diesel::result::Error::DatabaseError(_, info) => match info.constraint_name() {
            Some("users_username_key") => Some(TakenField::Username),
            _ => Some(TakenField::Email),
        },
        _ => None,
    }
}

fn row_to_profile(row: UserRow, is_subscribed: bool) -> UserProfile {
    UserProfile {
        id: row.id,
        email: row.email,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        is_subscribed,
        avatar: row.avatar,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn register(&self, new_user: &NewUser) -> Result<UserId, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;

        // Pre-check both unique fields so the caller gets a field-specific
        // error; the constraint still arbitrates concurrent registrations.
        let email_taken: bool = diesel::select(exists(
            users::table.filter(users::email.eq(new_user.email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_err)?;
        if email_taken {
            return Err(UserRepositoryError::EmailTaken);
        }
        let username_taken: bool = diesel::select(exists(
            users::table.filter(users::username.eq(new_user.username.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_err)?;
        if username_taken {
            return Err(UserRepositoryError::UsernameTaken);
        }

        let row = NewUserRow {
            email: new_user.email.as_str(),
            username: new_user.username.as_str(),
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            password_hash: &new_user.password_hash,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|error| match unique_violation_field(&error) {
                Some(TakenField::Email) => UserRepositoryError::EmailTaken,
                Some(TakenField::Username) => UserRepositoryError::UsernameTaken,
                None => diesel_err(error),
            })
    }

    async fn fetch(&self, id: UserId, viewer: Viewer) -> Result<UserProfile, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(UserRepositoryError::NotFound)?;

        let is_subscribed = match viewer {
            Some(subscriber) => diesel::select(exists(
                subscriptions::table
                    .filter(subscriptions::subscriber_id.eq(subscriber))
                    .filter(subscriptions::target_id.eq(id)),
            ))
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?,
            None => false,
        };

        Ok(row_to_profile(row, is_subscribed))
    }

    async fn list(
        &self,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<UserProfile>), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .limit(window.limit)
            .offset(window.offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;

        let subscribed: Vec<UserId> = match viewer {
            Some(subscriber) => {
                let ids: Vec<UserId> = rows.iter().map(|row| row.id).collect();
                subscriptions::table
                    .filter(subscriptions::subscriber_id.eq(subscriber))
                    .filter(subscriptions::target_id.eq_any(ids))
                    .select(subscriptions::target_id)
                    .load(&mut conn)
                    .await
                    .map_err(diesel_err)?
            }
            None => Vec::new(),
        };

        let profiles = rows
            .into_iter()
            .map(|row| {
                let flag = subscribed.contains(&row.id);
                row_to_profile(row, flag)
            })
            .collect();
        Ok((total, profiles))
    }

    async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let found: Option<(UserId, String)> = users::table
            .filter(users::email.eq(email))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        Ok(found.map(|(user_id, password_hash)| Credentials {
            user_id,
            password_hash,
        }))
    }

    async fn password_hash(&self, id: UserId) -> Result<String, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        users::table
            .find(id)
            .select(users::password_hash)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn set_password_hash(&self, id: UserId, hash: &str) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(users::table.find(id))
            .set(users::password_hash.eq(hash))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        if updated == 0 {
            return Err(UserRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn avatar(&self, id: UserId) -> Result<Option<String>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        users::table
            .find(id)
            .select(users::avatar)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<&str>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(users::table.find(id))
            .set(users::avatar.eq(avatar))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        if updated == 0 {
            return Err(UserRepositoryError::NotFound);
        }
        Ok(())
    }
}
