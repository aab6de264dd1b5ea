//! # Middleware
//!
//! middleware‌های سفارشی: زمان‌سنجی، شناسه درخواست، لاگ خطاهای سرور و
//! جزئیات خطای اعتبارسنجی بر اساس محیط.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{HeaderValue, CONTENT_LENGTH},
        Request,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::{config::Config, error::DetailedError};

/// نام header شناسه درخواست
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =====================================
// Request Timing Middleware
// =====================================
/// اندازه‌گیری زمان پردازش request
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn(request_timing));
/// ```
pub async fn request_timing(request: Request<Body>, next: Next) -> impl IntoResponse {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

// =====================================
// Request ID Middleware
// =====================================
/// شناسه یکتا برای هر request
///
/// اگه کلاینت خودش `X-Request-Id` فرستاده باشه همون استفاده میشه.
pub async fn request_id(mut request: Request<Body>, next: Next) -> impl IntoResponse {
    let header_value = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .or_else(|| HeaderValue::from_str(&generate_request_id()).ok());

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// تولید request ID
#[must_use]
pub fn generate_request_id() -> String {
    nanoid::nanoid!(12)
}

// =====================================
// Error Logging Middleware
// =====================================
/// لاگ پاسخ‌های 5xx
pub async fn error_logger(request: Request<Body>, next: Next) -> impl IntoResponse {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    if response.status().is_server_error() {
        warn!(status = %response.status(), path = %path, "Server error response");
    }

    response
}

// =====================================
// Validation Details Middleware
// =====================================
/// برگردوندن جزئیات فیلدها در خطاهای اعتبارسنجی، فقط خارج از production
///
/// تصمیم از `Config` همین router گرفته میشه.
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn_with_state(config, error_details));
/// ```
pub async fn error_details(
    State(config): State<Arc<Config>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let detailed = response.extensions_mut().remove::<DetailedError>();

    match detailed {
        Some(DetailedError(body)) if !config.environment.is_production() => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Json(body).into_response().into_body())
        }
        _ => response,
    }
}
