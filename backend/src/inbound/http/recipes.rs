//! Recipe handlers: CRUD, favorites, shopping cart, and short links.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::error::{ApiResult, map_membership_error};
use super::pagination::{PageQuery, envelope};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::membership::MembershipKind;
use crate::domain::ports::RecipeFilter;
use crate::domain::recipe::{IngredientAmount, RecipeDraft, RecipeProjection};
use crate::domain::{Error, RecipeId, UserId, shopping_list};

/// One `(ingredient, amount)` pair of a write request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmountDto {
    pub id: i32,
    pub amount: i32,
}

impl From<IngredientAmountDto> for IngredientAmount {
    fn from(dto: IngredientAmountDto) -> Self {
        Self {
            ingredient_id: dto.id,
            amount: dto.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmountDto>,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Partial update: absent scalar fields keep their stored values, but the
/// ingredient set must always be resubmitted in full.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountDto>>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

/// Listing filters; the membership flags accept `1`/`0`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<UserId>,
    pub is_favorited: Option<u8>,
    pub is_in_shopping_cart: Option<u8>,
}

impl RecipeListQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    fn filter(&self) -> RecipeFilter {
        RecipeFilter {
            author: self.author,
            only_favorited: self.is_favorited == Some(1),
            only_in_cart: self.is_in_shopping_cart == Some(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

fn validation(err: impl std::fmt::Display) -> Error {
    Error::validation(err.to_string())
}

/// Reject writes to recipes the viewer does not own.
async fn require_author(
    state: &HttpState,
    recipe: RecipeId,
    viewer: UserId,
) -> Result<(), Error> {
    let author = state.recipes.author_of(recipe).await?;
    if author != viewer {
        return Err(Error::forbidden("only the author may modify this recipe"));
    }
    Ok(())
}

/// `GET /api/recipes/`: filtered, paginated, newest first.
pub async fn list(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    let page_query = query.page_query();
    let (count, results) = state
        .recipes
        .list(&query.filter(), page_query.window(), viewer)
        .await?;
    Ok(HttpResponse::Ok().json(envelope(&req, page_query, count, results)))
}

/// `POST /api/recipes/`: create a recipe with its ingredient set.
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<CreateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let body = body.into_inner();
    let ingredients = body.ingredients.into_iter().map(Into::into).collect();
    let draft = RecipeDraft::new(
        body.name,
        body.text,
        body.cooking_time,
        body.image,
        ingredients,
    )
    .map_err(validation)?;
    let id = state.recipes.create(author, &draft).await?;
    let projection = state.recipes.fetch(id, Some(author)).await?;
    Ok(HttpResponse::Created().json(projection))
}

/// `GET /api/recipes/{id}/`: one recipe, viewer-relative flags included.
pub async fn retrieve(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<RecipeProjection>> {
    let viewer = session.viewer()?;
    let projection = state.recipes.fetch(path.into_inner(), viewer).await?;
    Ok(web::Json(projection))
}

/// `PATCH /api/recipes/{id}/`: author-only update; replaces the whole
/// ingredient set, merges absent scalar fields from the stored recipe.
pub async fn update(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
    body: web::Json<UpdateRecipeRequest>,
) -> ApiResult<web::Json<RecipeProjection>> {
    let viewer = session.require_user_id()?;
    let id = path.into_inner();
    require_author(&state, id, viewer).await?;
    let body = body.into_inner();
    let ingredients: Vec<IngredientAmount> = body
        .ingredients
        .ok_or_else(|| Error::validation("ingredients field is required"))?
        .into_iter()
        .map(Into::into)
        .collect();
    let current = state.recipes.fetch(id, Some(viewer)).await?;
    let draft = RecipeDraft::new(
        body.name.unwrap_or(current.name),
        body.text.unwrap_or(current.text),
        body.cooking_time.unwrap_or(current.cooking_time),
        body.image.unwrap_or(current.image),
        ingredients,
    )
    .map_err(validation)?;
    state.recipes.update(id, &draft).await?;
    let projection = state.recipes.fetch(id, Some(viewer)).await?;
    Ok(web::Json(projection))
}

/// `DELETE /api/recipes/{id}/`: author-only.
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let viewer = session.require_user_id()?;
    let id = path.into_inner();
    require_author(&state, id, viewer).await?;
    state.recipes.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn add_membership(
    state: &HttpState,
    session: &SessionContext,
    recipe: RecipeId,
    kind: MembershipKind,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let card = state
        .memberships
        .add(kind, user, recipe)
        .await
        .map_err(|e| map_membership_error(e, kind.noun()))?;
    Ok(HttpResponse::Created().json(card))
}

async fn remove_membership(
    state: &HttpState,
    session: &SessionContext,
    recipe: RecipeId,
    kind: MembershipKind,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state
        .memberships
        .remove(kind, user, recipe)
        .await
        .map_err(|e| map_membership_error(e, kind.noun()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /api/recipes/{id}/favorite/`
pub async fn favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    add_membership(&state, &session, path.into_inner(), MembershipKind::Favorite).await
}

/// `DELETE /api/recipes/{id}/favorite/`
pub async fn unfavorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    remove_membership(&state, &session, path.into_inner(), MembershipKind::Favorite).await
}

/// `POST /api/recipes/{id}/shopping_cart/`
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    add_membership(
        &state,
        &session,
        path.into_inner(),
        MembershipKind::ShoppingCart,
    )
    .await
}

/// `DELETE /api/recipes/{id}/shopping_cart/`
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    remove_membership(
        &state,
        &session,
        path.into_inner(),
        MembershipKind::ShoppingCart,
    )
    .await
}

/// `GET /api/recipes/download_shopping_cart/`: the aggregated cart as a
/// plain-text attachment.
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let items = state
        .memberships
        .shopping_list(user)
        .await
        .map_err(|e| map_membership_error(e, MembershipKind::ShoppingCart.noun()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"shopping_list.txt\"",
        ))
        .body(shopping_list::render(&items)))
}

/// `GET /api/recipes/{id}/get-link/`: stable short link for a recipe.
pub async fn get_link(
    state: web::Data<HttpState>,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let code = state.short_links.get_or_create(path.into_inner()).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: state.base_url.short_link(&code),
    }))
}
