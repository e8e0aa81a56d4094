//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
///
/// Answers 503 when the configured database stops answering.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = database_reachable(&state).await.unwrap_or(true);

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage(),
        timestamp: blog_shared::datetime::format(&chrono::Utc::now()),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// `None` when no database is in use.
#[cfg(feature = "postgres")]
async fn database_reachable(state: &AppState) -> Option<bool> {
    match &state.db {
        Some(db) => Some(match db.main.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database ping failed");
                false
            }
        }),
        None => None,
    }
}

#[cfg(not(feature = "postgres"))]
async fn database_reachable(_state: &AppState) -> Option<bool> {
    None
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use blog_infra::memory::fixtures::BlogFixture;
    use serde_json::Value;

    use crate::state::tests::state_for;

    #[actix_web::test]
    async fn test_health_in_memory() {
        let fixture = BlogFixture::new().await;
        let app = test_app!(state_for(&fixture));

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("content-type").is_some());

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }
}
