//! Endpoint tests for short-link issuing and redirection.

// Shared helpers include functions used only by other integration suites.
#[expect(
    dead_code,
    reason = "Shared helpers include functions used only by other integration suites."
)]
#[path = "support/api.rs"]
mod api;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use api::{BASE_URL, get, init_app, post_json, read_json, signed_in_user};
use backend::test_support::MemoryStore;
use serde_json::json;

async fn create_recipe<S>(app: &S, cookie: &Cookie<'static>, ingredient: i32) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = post_json(
        app,
        "/api/recipes/",
        json!({
            "name": "Bread",
            "text": "Mix and bake.",
            "cooking_time": 30,
            "image": "data:image/png;base64,aW1n",
            "ingredients": [{ "id": ingredient, "amount": 100 }],
        }),
        Some(cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    read_json(res).await["id"].as_i64().expect("recipe id")
}

async fn short_link_for<S>(app: &S, recipe: i64) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = get(app, &format!("/api/recipes/{recipe}/get-link/"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    read_json(res).await["short-link"]
        .as_str()
        .expect("short-link url")
        .to_owned()
}

#[actix_web::test]
async fn issues_an_absolute_short_link() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let recipe = create_recipe(&app, &cookie, flour).await;

    let url = short_link_for(&app, recipe).await;
    let prefix = format!("{BASE_URL}/s/");
    assert!(url.starts_with(&prefix), "{url}");
    assert!(url.ends_with('/'), "{url}");
    let code = &url[prefix.len()..url.len() - 1];
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[actix_web::test]
async fn the_link_is_stable_across_requests() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let recipe = create_recipe(&app, &cookie, flour).await;

    let first = short_link_for(&app, recipe).await;
    let second = short_link_for(&app, recipe).await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn redirects_to_the_recipe_page() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let recipe = create_recipe(&app, &cookie, flour).await;
    let url = short_link_for(&app, recipe).await;
    let path = &url[BASE_URL.len()..];

    let res = get(&app, path, None).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert_eq!(location, format!("{BASE_URL}/recipes/{recipe}/"));
}

#[actix_web::test]
async fn unknown_codes_are_not_found() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let res = get(&app, "/s/ZZZZ9999/", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_codes_are_not_found() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let res = get(&app, "/s/abc/", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn linking_an_unknown_recipe_is_not_found() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let res = get(&app, "/api/recipes/9999/get-link/", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
