//! # لایه API
//!
//! ## مفاهیم Rust + Axum:
//! - **Router**: تعریف مسیرها
//! - **Extractors**: استخراج داده از request
//! - **State**: اشتراک state بین handlers
//! - **Tower**: زیرساخت middleware
//!
//! ## ساختار URL‌ها (همه فقط خواندنی):
//! - `GET /api/doctors` و `GET /api/doctors/:id`
//! - `GET /api/services`، `GET /api/services/:slug` و `GET /api/services/id/:id`
//! - `GET /api/diseases`
//! - `GET /api/suggestions`
//! - `GET /api/content` و `GET /api/content/blocks`
//! - `GET /api/events` و `GET /api/events/:slug`
//! - `GET /health`

mod extractors;
mod handlers;
mod middleware;

pub use extractors::*;
pub use handlers::*;
pub use middleware::*;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::services::AppState;

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// جزئیات خطاهای اعتبارسنجی فقط خارج از production برگردونده میشن
/// (`error_details` با `Config` همین state).
pub fn create_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_id))
                .layer(axum_middleware::from_fn(request_timing))
                .layer(axum_middleware::from_fn(error_logger))
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::from_fn_with_state(config, error_details)),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/doctors", doctor_routes())
        .nest("/services", service_routes())
        .route("/diseases", get(handlers::diseases::list_diseases))
        .route("/suggestions", get(handlers::suggestions::get_suggestions))
        .route("/content", get(handlers::content::get_content))
        .route("/content/blocks", get(handlers::content::get_content_blocks))
        .nest("/events", event_routes())
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::doctors::list_doctors))
        .route("/:id", get(handlers::doctors::get_doctor))
}

fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::services::list_services))
        .route("/id/:id", get(handlers::services::get_service_by_id))
        .route("/:slug", get(handlers::services::get_service_by_slug))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::events::list_events))
        .route("/:slug", get(handlers::events::get_event))
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, Environment};
    use crate::database::{Database, SnapshotCatalog};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn live_router() -> (Router, SnapshotCatalog) {
        let snapshot = SnapshotCatalog::bundled().unwrap();
        let db = Database::in_memory().await.unwrap();
        db.seed(snapshot.data()).await.unwrap();
        let config = ConfigBuilder::new().environment(Environment::Testing).build();
        (create_router(AppState::new(config, db, snapshot.clone())), snapshot)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_sql_path_serves_doctors() {
        let (router, _) = live_router().await;
        let (status, body) = get_json(router, "/api/doctors?service_id=1").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body["doctors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["00001", "00002", "00012"]);
    }

    #[tokio::test]
    async fn test_service_routes_do_not_collide() {
        let (router, _) = live_router().await;
        let (status, body) = get_json(router.clone(), "/api/services/id/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"]["slug_en"], "neurology");

        let (status, body) = get_json(router, "/api/services/neurology").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"]["id"], 2);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let (router, _) = live_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc123");
    }

    #[tokio::test]
    async fn test_health_with_live_database() {
        let (router, _) = live_router().await;
        let (status, body) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], true);
        assert_eq!(body["source"], "live");
    }
}
