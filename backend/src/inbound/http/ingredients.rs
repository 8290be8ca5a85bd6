//! Ingredient catalogue handlers.

use actix_web::web;
use serde::Deserialize;

use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::IngredientId;
use crate::domain::ingredient::Ingredient;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearchQuery {
    pub name: Option<String>,
}

/// `GET /api/ingredients/`: unpaginated prefix search over the catalogue.
pub async fn list(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearchQuery>,
) -> ApiResult<web::Json<Vec<Ingredient>>> {
    let ingredients = state.ingredients.search(query.name.as_deref()).await?;
    Ok(web::Json(ingredients))
}

/// `GET /api/ingredients/{id}/`: one catalogue entry.
pub async fn retrieve(
    state: web::Data<HttpState>,
    path: web::Path<IngredientId>,
) -> ApiResult<web::Json<Ingredient>> {
    let ingredient = state.ingredients.fetch(path.into_inner()).await?;
    Ok(web::Json(ingredient))
}
