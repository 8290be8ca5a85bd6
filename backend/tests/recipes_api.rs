//! Endpoint tests for recipe CRUD, validation and listing filters.

// Shared helpers include functions used only by other integration suites.
#[expect(
    dead_code,
    reason = "Shared helpers include functions used only by other integration suites."
)]
#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use api::{delete, get, init_app, patch_json, post_json, read_json, signed_in_user};
use backend::test_support::MemoryStore;
use serde_json::{Value, json};

fn recipe_payload(name: &str, ingredients: Value) -> Value {
    json!({
        "name": name,
        "text": "Chop everything and simmer.",
        "cooking_time": 45,
        "image": "data:image/png;base64,aW1n",
        "ingredients": ingredients,
    })
}

#[actix_web::test]
async fn creation_requires_a_session() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let res = post_json(
        &app,
        "/api/recipes/",
        recipe_payload("Bread", json!([{ "id": flour, "amount": 500 }])),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn creation_returns_the_full_projection() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let sugar = store.seed_ingredient("sugar", "g");
    let (author, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(
        &app,
        "/api/recipes/",
        recipe_payload(
            "Cake",
            json!([
                { "id": flour, "amount": 300 },
                { "id": sugar, "amount": 50 },
            ]),
        ),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["name"], json!("Cake"));
    assert_eq!(body["author"]["id"], json!(author));
    assert_eq!(body["author"]["username"], json!("pierre"));
    assert_eq!(body["is_favorited"], json!(false));
    assert_eq!(body["is_in_shopping_cart"], json!(false));
    let ingredients = body["ingredients"].as_array().expect("ingredient lines");
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0]["name"], json!("flour"));
    assert_eq!(ingredients[0]["amount"], json!(300));
    assert_eq!(ingredients[0]["measurement_unit"], json!("g"));
}

#[actix_web::test]
async fn rejects_empty_ingredient_list() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(
        &app,
        "/api/recipes/",
        recipe_payload("Bread", json!([])),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("validation_error"));
}

#[actix_web::test]
async fn rejects_repeated_ingredient_reference() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(
        &app,
        "/api/recipes/",
        recipe_payload(
            "Bread",
            json!([
                { "id": flour, "amount": 100 },
                { "id": flour, "amount": 200 },
            ]),
        ),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rejects_unknown_ingredient_reference() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let res = post_json(
        &app,
        "/api/recipes/",
        recipe_payload("Bread", json!([{ "id": 4242, "amount": 100 }])),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rejects_zero_cooking_time() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let mut payload = recipe_payload("Bread", json!([{ "id": flour, "amount": 100 }]));
    payload["cooking_time"] = json!(0);
    let res = post_json(&app, "/api/recipes/", payload, Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn duplicate_name_for_same_author_is_rejected() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let payload = recipe_payload("Bread", json!([{ "id": flour, "amount": 100 }]));
    let res = post_json(&app, "/api/recipes/", payload.clone(), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = post_json(&app, "/api/recipes/", payload, Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("conflict"));
}

async fn create_recipe<S>(
    app: &S,
    cookie: &actix_web::cookie::Cookie<'static>,
    name: &str,
    ingredients: Value,
) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
{
    let res = post_json(app, "/api/recipes/", recipe_payload(name, ingredients), Some(cookie)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    read_json(res).await["id"].as_i64().expect("recipe id")
}

#[actix_web::test]
async fn partial_update_merges_absent_scalars() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let id = create_recipe(&app, &cookie, "Bread", json!([{ "id": flour, "amount": 100 }])).await;

    let res = patch_json(
        &app,
        &format!("/api/recipes/{id}/"),
        json!({
            "name": "Sourdough",
            "ingredients": [{ "id": flour, "amount": 250 }],
        }),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["name"], json!("Sourdough"));
    // untouched scalars keep their stored values
    assert_eq!(body["text"], json!("Chop everything and simmer."));
    assert_eq!(body["cooking_time"], json!(45));
    assert_eq!(body["ingredients"][0]["amount"], json!(250));
}

#[actix_web::test]
async fn partial_update_requires_the_ingredient_set() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let id = create_recipe(&app, &cookie, "Bread", json!([{ "id": flour, "amount": 100 }])).await;

    let res = patch_json(
        &app,
        &format!("/api/recipes/{id}/"),
        json!({ "name": "Sourdough" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("validation_error"));
}

#[actix_web::test]
async fn only_the_author_may_modify_a_recipe() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, author_cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let id = create_recipe(&app, &author_cookie, "Bread", json!([{ "id": flour, "amount": 100 }]))
        .await;
    let (_, other_cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;

    let res = patch_json(
        &app,
        &format!("/api/recipes/{id}/"),
        json!({ "name": "Stolen", "ingredients": [{ "id": flour, "amount": 1 }] }),
        Some(&other_cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = delete(&app, &format!("/api/recipes/{id}/"), Some(&other_cookie)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn author_can_delete_a_recipe() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let id = create_recipe(&app, &cookie, "Bread", json!([{ "id": flour, "amount": 100 }])).await;

    let res = delete(&app, &format!("/api/recipes/{id}/"), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = get(&app, &format!("/api/recipes/{id}/"), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn listing_is_newest_first_and_filters_by_author() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (pierre, pierre_cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let (_, marcel_cookie) = signed_in_user(&app, "marcel", "marcel@example.com").await;
    create_recipe(&app, &pierre_cookie, "Bread", json!([{ "id": flour, "amount": 100 }])).await;
    let newest =
        create_recipe(&app, &marcel_cookie, "Cake", json!([{ "id": flour, "amount": 200 }])).await;

    let res = get(&app, "/api/recipes/", None).await;
    let body = read_json(res).await;
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["results"][0]["id"], json!(newest));

    let res = get(&app, &format!("/api/recipes/?author={pierre}"), None).await;
    let body = read_json(res).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["results"][0]["name"], json!("Bread"));
}

#[actix_web::test]
async fn membership_filters_match_nothing_for_anonymous_viewers() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;
    let flour = store.seed_ingredient("flour", "g");
    let (_, cookie) = signed_in_user(&app, "pierre", "pierre@example.com").await;
    let id = create_recipe(&app, &cookie, "Bread", json!([{ "id": flour, "amount": 100 }])).await;
    let res = post_json(
        &app,
        &format!("/api/recipes/{id}/favorite/"),
        json!({}),
        Some(&cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = get(&app, "/api/recipes/?is_favorited=1", None).await;
    let body = read_json(res).await;
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["results"].as_array().map(Vec::len), Some(0));

    let res = get(&app, "/api/recipes/?is_favorited=1", Some(&cookie)).await;
    let body = read_json(res).await;
    assert_eq!(body["count"], json!(1));
}
