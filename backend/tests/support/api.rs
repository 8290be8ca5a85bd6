//! Shared harness for HTTP endpoint tests.
//!
//! Builds the full route table over the in-memory store so suites exercise
//! handlers, session middleware and error mapping without a database.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use backend::inbound::http::{routes, test_utils};
use backend::test_support::MemoryStore;

pub const BASE_URL: &str = "http://localhost";

pub async fn init_app(
    store: &Arc<MemoryStore>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(store.http_state(BASE_URL)))
            .wrap(test_utils::test_session_middleware())
            .configure(routes::configure),
    )
    .await
}

pub async fn send<S>(
    app: &S,
    req: test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    test::call_service(app, req.to_request()).await
}

pub async fn get<S>(
    app: &S,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, test::TestRequest::get().uri(uri), cookie).await
}

pub async fn post_json<S>(
    app: &S,
    uri: &str,
    body: Value,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, test::TestRequest::post().uri(uri).set_json(body), cookie).await
}

pub async fn patch_json<S>(
    app: &S,
    uri: &str,
    body: Value,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, test::TestRequest::patch().uri(uri).set_json(body), cookie).await
}

pub async fn put_json<S>(
    app: &S,
    uri: &str,
    body: Value,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, test::TestRequest::put().uri(uri).set_json(body), cookie).await
}

pub async fn delete<S>(
    app: &S,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, test::TestRequest::delete().uri(uri), cookie).await
}

pub async fn read_json(res: ServiceResponse<BoxBody>) -> Value {
    test::read_body_json(res).await
}

/// Register an account through the public API and return its id.
pub async fn register_user<S>(app: &S, username: &str, email: &str, password: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = post_json(
        app,
        "/api/users/",
        json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "Chef",
            "password": password,
        }),
        None,
    )
    .await;
    assert_eq!(res.status().as_u16(), 201, "registration should succeed");
    let body = read_json(res).await;
    body["id"].as_i64().expect("registered id") as i32
}

/// Log in and return the session cookie for follow-up requests.
pub async fn login<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = post_json(
        app,
        "/api/auth/login/",
        json!({ "email": email, "password": password }),
        None,
    )
    .await;
    assert_eq!(res.status().as_u16(), 204, "login should succeed");
    res.response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned()
}

/// Register and log in a fresh account in one step.
pub async fn signed_in_user<S>(app: &S, username: &str, email: &str) -> (i32, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let id = register_user(app, username, email, "hunter2-strong").await;
    let cookie = login(app, email, "hunter2-strong").await;
    (id, cookie)
}
