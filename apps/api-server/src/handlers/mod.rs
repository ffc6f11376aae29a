//! HTTP handlers and route configuration.

mod admin;
mod comments;
mod health;
mod likes;
mod params;
mod posts;
mod users;


use actix_web::web;

use crate::middleware::error::{json_error, path_error, query_error};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/v1")
                        .service(
                            // Literal segments before `/{id}`.
                            web::scope("/posts")
                                .route("", web::get().to(posts::list))
                                .route("", web::post().to(posts::create))
                                .route("/my", web::get().to(posts::my_posts))
                                .route("/my/roots", web::get().to(posts::my_root_posts))
                                .route("/liked", web::get().to(likes::liked_posts))
                                .route("/{id}", web::get().to(posts::get))
                                .route("/{id}", web::post().to(posts::update))
                                .route("/{id}", web::delete().to(posts::delete))
                                .route("/{id}/comments", web::get().to(comments::list))
                                .route("/{id}/comments", web::post().to(comments::create))
                                .route("/{id}/likes", web::get().to(likes::count))
                                .route("/{id}/likes", web::post().to(likes::like))
                                .route("/{id}/likes", web::delete().to(likes::unlike)),
                        )
                        .route("/users", web::post().to(users::register))
                        .service(
                            web::scope("/admin")
                                .route("/posts", web::get().to(admin::all_posts))
                                .route("/users", web::delete().to(admin::purge_users)),
                        ),
                ),
        );
}
