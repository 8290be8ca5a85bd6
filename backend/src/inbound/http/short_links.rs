//! Public short-link redirect.

use actix_web::{HttpResponse, http::header, web};

use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::Error;
use crate::domain::short_link::ShortLinkCode;

/// `GET /s/{code}/`: redirect to the recipe's canonical page.
///
/// A malformed code never reaches the store; it is reported as not found,
/// same as an unknown one.
pub async fn redirect(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let code = ShortLinkCode::parse(&path)
        .map_err(|_| Error::not_found("short link not found"))?;
    let recipe_id = state.short_links.resolve(&code).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, state.base_url.recipe_page(recipe_id)))
        .finish())
}
