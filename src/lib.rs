//! # Hospital Catalog Library
//!
//! backend فقط-خواندنی catalog بیمارستان: پزشکان، سرویس‌ها، بیماری‌ها،
//! رویدادها و محتوای صفحات، با دو منبع داده (MySQL و snapshot JSON).
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── validation/     # اعتبارسنجی ورودی‌ها
//! ├── database/       # SQL، snapshot و read-through
//! ├── models/         # مدل‌های داده
//! ├── services/       # منطق کسب‌وکار
//! ├── api/            # لایه HTTP
//! └── utils/          # توابع کمکی
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use hospital_catalog::{api::create_router, config::Config, services::AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap();
//!     let app = create_router(AppState::bootstrap(config).unwrap());
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// اعتبارسنجی پارامترهای ورودی
pub mod validation;

/// SQL، snapshot و ترکیبشون
pub mod database;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================
pub use error::{AppError, Result};

// =====================================
// Prelude Module
// =====================================
/// import راحت آیتم‌های پرکاربرد
///
/// ```rust
/// use hospital_catalog::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::{Catalog, Database, SnapshotCatalog};
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
    pub use crate::validation::{Keyword, Lang};
}
