//! HTTP handlers and route configuration.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppError;

/// Builds an initialized test service over the given [`AppState`].
///
/// [`AppState`]: crate::state::AppState
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new($state))
                .app_data(crate::handlers::json_config())
                .app_data(crate::handlers::query_config())
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

mod comments;
mod health;
mod posts;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/v1/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/{slug}", web::get().to(posts::get_post))
                    .service(
                        web::resource("/{slug}/comments")
                            .route(web::get().to(comments::list_comments))
                            .route(web::post().to(comments::create_comment)),
                    ),
            ),
    )
    .default_service(web::to(not_found));
}

/// JSON body settings: malformed payloads answer 400 `{"detail": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(format!("JSON parse error - {}", err)).into())
}

/// Query string settings: undecodable queries answer 400 `{"detail": ...}`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Query parse error - {}", err)).into())
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}
