//! # ماژول مدیریت خطاها (Error Handling)
//!
//! سه دسته خطا داریم:
//!
//! - **خطای اعتبارسنجی**: ورودی کاربر خراب یا خارج از محدوده - همیشه 400
//! - **خطای دیتابیس** (`DbError`): اتصال، timeout، الگوی تزریق SQL.
//!   سرویس‌ها این خطا رو هیچوقت به بالا نمیدن و به snapshot سوییچ میکنن.
//! - **خطای ناشناخته**: در مرز بیرونی گرفته میشه، پیامش عمومی میشه و
//!   جزئیات کامل فقط در لاگ سرور میمونه.
//!
//! ## مفاهیم Rust:
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار نوع‌ها برای `?`
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای `Result<Doctor, AppError>` مینویسیم `Result<Doctor>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Validation Error
// =====================================
/// خطای اعتبارسنجی یک فیلد query string
///
/// نام فیلد نگه داشته میشه تا در محیط توسعه جزئیات فیلد به فیلد برگرده.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =====================================
// Database Error
// =====================================
/// خطاهای لایه SQL
///
/// همه این‌ها "قابل بازیابی" هستن: سرویس‌ها با دیدنشون سراغ snapshot میرن.
#[derive(Debug, Error)]
pub enum DbError {
    /// credential دیتابیس تنظیم نشده - حالت عادی، نه خطا
    #[error("database is not configured")]
    NotConfigured,

    /// query بیشتر از زمان مجاز طول کشید
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// پارامتر رشته‌ای با یکی از الگوهای تزریق SQL جور شد
    #[error("parameter {index} rejected by injection guard")]
    UnsafeParameter { index: usize },

    /// خطای خود درایور (اتصال رد شد، syntax و غیره)
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// ردیف دیتابیس به entity معتبر تبدیل نشد
    #[error("malformed row: {0}")]
    Malformed(String),
}

impl DbError {
    /// آیا این خطا غیرمنتظره‌ست و ارزش لاگ کردن داره؟
    ///
    /// نبودن تنظیمات دیتابیس یک حالت پیش‌بینی‌شده‌ست (حالت فقط-snapshot).
    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }
}

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست نامعتبر - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// خطای اعتبارسنجی پارامترها - 400
    #[error("Validation error: {}", format_fields(.0))]
    Validation(Vec<ValidationError>),

    /// پیدا نشد - 404
    #[error("Not found: {0}")]
    NotFound(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای سرور
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس (فقط وقتی کسی مستقیم از Database استفاده کنه)
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای JSON (مثلا snapshot خراب)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_fields(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 5xx Server Errors
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// خطای اعتبارسنجی تک فیلدی
    #[must_use]
    pub fn invalid(field: &str, message: &str) -> Self {
        Self::Validation(vec![ValidationError::new(field, message)])
    }

    /// پیامی که به کلاینت برمیگرده
    ///
    /// خطاهای سرور همیشه پیام عمومی دارن. خطای اعتبارسنجی در production
    /// بدون جزئیات فیلدها برمیگرده.
    #[must_use]
    pub fn public_message(&self, detailed: bool) -> String {
        match self {
            _ if self.is_server_error() => "Internal server error".to_string(),
            Self::Validation(_) if !detailed => "Invalid request parameters".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(vec![err])
    }
}

// تبدیل validator error
impl From<validator::ValidationErrors> for AppError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationError> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| e.code.to_string());
                    ValidationError::new(field.to_string(), message)
                })
            })
            .collect();
        // ترتیب HashMap ثابت نیست
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// نام وضعیت (مثلا "Bad Request")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// جزئیات اضافی (اختیاری)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
            details: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }

    /// اضافه کردن جزئیات
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// نسخه کامل پاسخ خطای اعتبارسنجی (با جزئیات فیلدها)
///
/// به extension‌های response چسبونده میشه؛ middleware `error_details`
/// فقط خارج از production بدنه رو با این عوض میکنه.
#[derive(Debug, Clone)]
pub struct DetailedError(pub ErrorResponse);

/// تبدیل AppError به Response HTTP
///
/// بدنه پیش‌فرض همیشه نسخه production هست (پیام عمومی، بدون جزئیات).
/// خطاهای سرور با جزئیات کامل لاگ میشن ولی به کلاینت فقط پیام عمومی میره.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");
        let body = ErrorResponse::new(reason, self.public_message(false)).with_status(status);

        let detailed = match &self {
            Self::Validation(fields) => {
                let details: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|f| (f.field.clone(), serde_json::Value::String(f.message.clone())))
                    .collect();
                Some(
                    ErrorResponse::new(reason, self.public_message(true))
                        .with_status(status)
                        .with_details(serde_json::Value::Object(details)),
                )
            }
            _ => None,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(DetailedError(detailed));
        }
        response
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid("service_id", "must be a positive integer").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(DbError::NotConfigured).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_are_sanitized() {
        let err = AppError::Internal("pool exhausted at 10.0.0.3:3306".to_string());
        assert_eq!(err.public_message(true), "Internal server error");
        assert_eq!(err.public_message(false), "Internal server error");
    }

    #[test]
    fn test_validation_message_hidden_in_production() {
        let err = AppError::invalid("keyword", "too long");
        assert_eq!(err.public_message(false), "Invalid request parameters");
        assert!(err.public_message(true).contains("keyword: too long"));
    }

    #[test]
    fn test_not_configured_is_expected() {
        assert!(!DbError::NotConfigured.is_unexpected());
        assert!(DbError::Timeout(Duration::from_millis(5)).is_unexpected());
        assert!(DbError::UnsafeParameter { index: 0 }.is_unexpected());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("Not Found", "Resource not found")
            .with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status_code, Some(404));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_response_body_is_generic_by_default() {
        let response = AppError::invalid("service_id", "must be a positive integer").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let DetailedError(detailed) = response.extensions().get::<DetailedError>().unwrap().clone();
        assert_eq!(detailed.details.unwrap()["service_id"], "must be a positive integer");
        assert!(detailed.message.contains("service_id"));
    }

    #[test]
    fn test_server_error_has_no_detailed_body() {
        let response = AppError::Internal("disk full".to_string()).into_response();
        assert!(response.extensions().get::<DetailedError>().is_none());
    }

    #[test]
    fn test_option_extension() {
        let some_value: Option<i32> = Some(42);
        let none_value: Option<i32> = None;

        assert!(some_value.ok_or_not_found("not found").is_ok());
        assert!(matches!(
            none_value.ok_or_not_found("not found"),
            Err(AppError::NotFound(_))
        ));
    }
}
