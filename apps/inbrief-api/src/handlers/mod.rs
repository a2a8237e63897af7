//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod news;

use std::sync::Arc;

use actix_web::web;

use inbrief_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// Routes taking an `Identity` require a session; the rest are public.
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    login_limiter: Arc<dyn RateLimiter>,
    trust_forwarded_for: bool,
) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/news/all", web::get().to(news::list_posts))
            .route("/news/categories", web::get().to(news::list_categories))
            // Staff routes
            .route("/news", web::post().to(news::create_post))
            .route("/news/edit/{id}", web::post().to(news::edit_post))
            .route("/news/delete/{id}", web::delete().to(news::delete_post))
            .route("/assign_admin", web::post().to(admin::assign_admin))
            .route("/admin/db-info", web::get().to(admin::db_info))
            // Auth routes
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(
                                RateLimitMiddleware::new(login_limiter)
                                    .trust_forwarded_for(trust_forwarded_for),
                            )
                            .route(web::post().to(auth::login)),
                    )
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            ),
    );
}
