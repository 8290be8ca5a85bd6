//! Explicit route table.
//!
//! Routes are registered with `web::resource` instead of attribute macros so
//! the full HTTP surface is visible in one place. Fixed segments (`me`,
//! `subscriptions`, `download_shopping_cart`, `set_password`) are registered
//! before the `{id}` patterns that would otherwise shadow them.

use actix_web::web;

use super::{auth, ingredients, recipes, short_links, users};

/// Register every handler on the given service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/auth/login/").route(web::post().to(auth::login)))
            .service(web::resource("/auth/logout/").route(web::post().to(auth::logout)))
            .service(
                web::resource("/users/")
                    .route(web::get().to(users::list))
                    .route(web::post().to(users::register)),
            )
            .service(
                web::resource("/users/subscriptions/").route(web::get().to(users::subscriptions)),
            )
            .service(web::resource("/users/me/").route(web::get().to(users::me)))
            .service(
                web::resource("/users/me/avatar/")
                    .route(web::put().to(users::put_avatar))
                    .route(web::delete().to(users::delete_avatar)),
            )
            .service(
                web::resource("/users/set_password/").route(web::post().to(users::set_password)),
            )
            .service(web::resource("/users/{id}/").route(web::get().to(users::retrieve)))
            .service(
                web::resource("/users/{id}/subscribe/")
                    .route(web::post().to(users::subscribe))
                    .route(web::delete().to(users::unsubscribe)),
            )
            .service(web::resource("/ingredients/").route(web::get().to(ingredients::list)))
            .service(
                web::resource("/ingredients/{id}/").route(web::get().to(ingredients::retrieve)),
            )
            .service(
                web::resource("/recipes/")
                    .route(web::get().to(recipes::list))
                    .route(web::post().to(recipes::create)),
            )
            .service(
                web::resource("/recipes/download_shopping_cart/")
                    .route(web::get().to(recipes::download_shopping_cart)),
            )
            .service(
                web::resource("/recipes/{id}/")
                    .route(web::get().to(recipes::retrieve))
                    .route(web::patch().to(recipes::update))
                    .route(web::delete().to(recipes::delete)),
            )
            .service(
                web::resource("/recipes/{id}/favorite/")
                    .route(web::post().to(recipes::favorite))
                    .route(web::delete().to(recipes::unfavorite)),
            )
            .service(
                web::resource("/recipes/{id}/shopping_cart/")
                    .route(web::post().to(recipes::add_to_cart))
                    .route(web::delete().to(recipes::remove_from_cart)),
            )
            .service(web::resource("/recipes/{id}/get-link/").route(web::get().to(recipes::get_link))),
    )
    .service(web::resource("/s/{code}/").route(web::get().to(short_links::redirect)));
}
