//! Endpoint tests for author subscriptions.

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
use api::{delete, get, init_app, post_json, read_json, signed_in_user};
use backend::test_support::MemoryStore;
use serde_json::json;

async fn create_recipe<S>(app: &S, cookie: &Cookie<'static>, name: &str, ingredient: i32)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = post_json(
        app,
        "/api/recipes/",
        json!({
            "name": name,
            "text": "Mix and bake.",
            "cooking_time": 30,
            "image": "data:image/png;base64,aW1n",
            "ingredients": [{ "id": ingredient, "amount": 100 }],
        }),
        Some(cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn subscribing_returns_the_author_with_their_recipes() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (author, author_cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    create_recipe(&app, &author_cookie, "Bread", flour).await;
    let (_, cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;

    let res = post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["id"], json!(author));
    assert_eq!(body["is_subscribed"], json!(true));
    assert_eq!(body["recipes_count"], json!(1));
    assert_eq!(body["recipes"][0]["name"], json!("Bread"));
}

#[actix_web::test]
async fn self_subscription_is_rejected() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (id, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(&app, &format!("/api/users/{id}/subscribe/"), json!({}), Some(&cookie))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("invalid_operation"));
}

#[actix_web::test]
async fn duplicate_subscription_is_rejected() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (author, _) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let (_, cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;
    post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie)).await;
    let res = post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("conflict"));
}

#[actix_web::test]
async fn subscribing_to_an_unknown_user_is_not_found() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(&app, "/api/users/9999/subscribe/", json!({}), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unsubscribing_from_an_unknown_user_is_not_found() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = delete(&app, "/api/users/9999/subscribe/", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("not_found"));
}

#[actix_web::test]
async fn unsubscribe_round_trip() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (author, _) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let (_, cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;
    post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie)).await;

    let res = delete(&app, &format!("/api/users/{author}/subscribe/"), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // removing again is an invalid operation, not a missing resource
    let res = delete(&app, &format!("/api/users/{author}/subscribe/"), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("invalid_operation"));
}

#[actix_web::test]
async fn listing_caps_recipes_but_not_the_count() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (author, author_cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    create_recipe(&app, &author_cookie, "Bread", flour).await;
    create_recipe(&app, &author_cookie, "Cake", flour).await;
    let (_, cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;
    post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie)).await;

    let res = get(&app, "/api/users/subscriptions/?recipes_limit=1", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["count"], json!(1));
    let entry = &body["results"][0];
    assert_eq!(entry["recipes_count"], json!(2));
    assert_eq!(entry["recipes"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let res = get(&app, "/api/users/subscriptions/", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_reflects_subscription_state_for_the_viewer() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (author, _) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let (_, cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;
    post_json(&app, &format!("/api/users/{author}/subscribe/"), json!({}), Some(&cookie)).await;

    let res = get(&app, &format!("/api/users/{author}/"), Some(&cookie)).await;
    let body = read_json(res).await;
    assert_eq!(body["is_subscribed"], json!(true));

    // anonymous viewers always see false
    let res = get(&app, &format!("/api/users/{author}/"), None).await;
    let body = read_json(res).await;
    assert_eq!(body["is_subscribed"], json!(false));
}
