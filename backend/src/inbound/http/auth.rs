//! Session login and logout handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{Error, password};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn bad_credentials() -> Error {
    Error::unauthorized("unable to log in with provided credentials")
}

/// `POST /api/auth/login/`: verify credentials and open a session.
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = state
        .users
        .credentials_by_email(&body.email)
        .await?
        .ok_or_else(bad_credentials)?;
    if !password::verify(&body.password, &credentials.password_hash) {
        return Err(bad_credentials());
    }
    session.persist_user(credentials.user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /api/auth/logout/`: drop the session cookie.
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}
