//! # Health Check Handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::{models::HealthResponse, services::AppState};

/// بررسی سلامت سرویس
///
/// دیتابیس در دسترس نبودن سرویس رو از کار نمیندازه (snapshot جواب میده)،
/// فقط وضعیت `degraded` میشه.
///
/// # Endpoint
/// `GET /health`
///
/// # Response
/// ```json
/// { "status": "healthy", "version": "0.1.0", "database": true, "source": "live" }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let configured = state.database.is_configured();
    let database_ok = if configured {
        match state.database.health_check().await {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "Database health check failed");
                false
            }
        }
    } else {
        false
    };

    Json(HealthResponse::new(database_ok, configured))
}
