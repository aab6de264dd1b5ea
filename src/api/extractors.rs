//! # Custom Extractors
//!
//! extractor‌های axum که خطای خودشون رو به `AppError` تبدیل میکنن تا
//! همه پاسخ‌های خطا یک شکل داشته باشن.
//!
//! ## مفاهیم Rust + Axum:
//! - **FromRequestParts**: extractor بدون body
//! - **Rejection**: نوع خطای extractor

use axum::{
    async_trait,
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

// =====================================
// Query with Validation
// =====================================
/// query string با اعتبارسنجی `validator`
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(ValidatedQuery(query): ValidatedQuery<DoctorQuery>) -> ... {
///     let filter = query.into_filter()?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data): Query<T> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::BadRequest(format!("Invalid query string: {}", e.body_text()))
            })?;

        data.validate()?;

        Ok(ValidatedQuery(data))
    }
}

// =====================================
// Path Segment
// =====================================
/// یک پارامتر مسیر به صورت رشته خام
///
/// تبدیل به نوع درست (شناسه، slug) با خود handler هست.
#[derive(Debug, Clone)]
pub struct PathParam(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for PathParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                AppError::BadRequest(format!("Invalid path parameter: {}", e.body_text()))
            })?;

        Ok(PathParam(value))
    }
}
