//! User account handlers: registration, profiles, passwords, avatars and
//! subscriptions.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::pagination::{PageQuery, envelope};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::user::{Email, NewUser, UserProfile, Username};
use crate::domain::{Error, UserId, password};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Registration response: the stored identity without viewer-relative
/// fields.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Query parameters for subscription listings: pagination plus the
/// per-author recipe cap.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<i64>,
}

impl SubscriptionsQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<i64>,
}

fn validation(err: impl std::fmt::Display) -> Error {
    Error::validation(err.to_string())
}

/// `POST /api/users/`: register a new account.
pub async fn register(
    state: web::Data<HttpState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    if body.password.trim().is_empty() {
        return Err(Error::validation("password must not be empty"));
    }
    let email = Email::new(body.email).map_err(validation)?;
    let username = Username::new(body.username).map_err(validation)?;
    let hash =
        password::hash(&body.password).map_err(|e| Error::internal(e.to_string()))?;
    let new_user = NewUser::new(email, username, body.first_name, body.last_name, hash)
        .map_err(validation)?;
    let id = state.users.register(&new_user).await?;
    Ok(HttpResponse::Created().json(RegisteredUser {
        id,
        email: new_user.email.as_str().to_owned(),
        username: new_user.username.as_str().to_owned(),
        first_name: new_user.first_name,
        last_name: new_user.last_name,
    }))
}

/// `GET /api/users/`: paginated profile listing, open to anonymous viewers.
pub async fn list(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let (count, results) = state.users.list(query.window(), viewer).await?;
    Ok(HttpResponse::Ok().json(envelope(&req, *query, count, results)))
}

/// `GET /api/users/{id}/`: one profile, viewer-relative.
pub async fn retrieve(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<UserProfile>> {
    let viewer = session.viewer()?;
    let profile = state.users.fetch(path.into_inner(), viewer).await?;
    Ok(web::Json(profile))
}

/// `GET /api/users/me/`: the authenticated viewer's own profile.
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = session.require_user_id()?;
    let profile = state.users.fetch(user_id, Some(user_id)).await?;
    Ok(web::Json(profile))
}

/// `POST /api/users/set_password/`: rotate the password after verifying
/// the current one.
pub async fn set_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    if body.new_password.trim().is_empty() {
        return Err(Error::validation("new_password must not be empty"));
    }
    let stored = state.users.password_hash(user_id).await?;
    if !password::verify(&body.current_password, &stored) {
        return Err(Error::validation("current password is incorrect"));
    }
    let hash =
        password::hash(&body.new_password).map_err(|e| Error::internal(e.to_string()))?;
    state.users.set_password_hash(user_id, &hash).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `PUT /api/users/me/avatar/`: store a base64-encoded avatar image.
pub async fn put_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarResponse>> {
    let user_id = session.require_user_id()?;
    if body.avatar.trim().is_empty() {
        return Err(Error::validation("avatar must not be empty"));
    }
    state.users.set_avatar(user_id, Some(&body.avatar)).await?;
    Ok(web::Json(AvatarResponse {
        avatar: body.into_inner().avatar,
    }))
}

/// `DELETE /api/users/me/avatar/`: clear the stored avatar.
pub async fn delete_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    if state.users.avatar(user_id).await?.is_none() {
        return Err(Error::invalid_operation("no avatar to remove"));
    }
    state.users.set_avatar(user_id, None).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /api/users/{id}/subscribe/`: follow an author.
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<HttpResponse> {
    let subscriber = session.require_user_id()?;
    let profile = state
        .subscriptions
        .subscribe(subscriber, path.into_inner(), query.recipes_limit)
        .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// `DELETE /api/users/{id}/subscribe/`: unfollow an author.
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let subscriber = session.require_user_id()?;
    state
        .subscriptions
        .unsubscribe(subscriber, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `GET /api/users/subscriptions/`: paginated list of followed authors.
pub async fn subscriptions(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SubscriptionsQuery>,
) -> ApiResult<HttpResponse> {
    let subscriber = session.require_user_id()?;
    let page_query = query.page_query();
    let (count, results) = state
        .subscriptions
        .subscriptions(subscriber, page_query.window(), query.recipes_limit)
        .await?;
    Ok(HttpResponse::Ok().json(envelope(&req, page_query, count, results)))
}
