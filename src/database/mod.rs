//! # ماژول دیتابیس (Database Layer)
//!
//! این ماژول دو چیز داره:
//!
//! - `Database`: helper اجرای SQL روی یک connection pool تنبل (lazy)،
//!   با timeout ثابت و بررسی پارامترها قبل از اجرا
//! - `Catalog`: interface خوندن داده، با سه پیاده‌سازی:
//!   `SqlCatalog` (دیتابیس زنده)، `SnapshotCatalog` (فایل‌های JSON) و
//!   `ReadThroughCatalog` (اول SQL، بعد snapshot)
//!
//! ## مفاهیم Rust:
//! - **Arc<T>**: اشتراک pool بین handlers
//! - **async_trait**: async در traits
//! - **tokio::time::timeout**: مسابقه query با تایمر
//! - **Driver Any در sqlx**: یک pool برای MySQL و SQLite

mod builder;
mod guard;
mod read_through;
mod repository;
mod rows;
mod snapshot;

pub use builder::*;
pub use guard::*;
pub use read_through::*;
pub use repository::*;
pub use snapshot::*;

use std::sync::Arc;
use std::time::Duration;

use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Any, AnyPool, FromRow};
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::error::{AppError, DbError, Result};

// =====================================
// Parameters
// =====================================
/// پارامتر query - فقط نوع‌های ساده
///
/// بسته بودن این enum همون بررسی نوع پارامترهاست: چیزی جز عدد صحیح،
/// رشته و bool به دیتابیس نمیرسه.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

// =====================================
// SQL Dialect
// =====================================
/// نوع دیتابیس پشت pool
///
/// placeholder (`?`) در هر دو یکیه؛ فقط literal کاراکتر escape فرق داره.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    /// تشخیص از روی scheme آدرس
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(AppError::Config(format!(
                "unsupported database scheme '{other}' (expected mysql or sqlite)"
            ))),
        }
    }

    /// `col LIKE ? ESCAPE '\'` با literal درست برای هر dialect
    ///
    /// در MySQL خود backslash داخل literal باید escape بشه.
    #[must_use]
    pub fn like(&self, column: &str) -> String {
        match self {
            Backend::MySql => format!("{column} LIKE ? ESCAPE '\\\\'"),
            Backend::Sqlite => format!("{column} LIKE ? ESCAPE '\\'"),
        }
    }
}

// =====================================
// Database Connection
// =====================================
/// helper اجرای SQL
///
/// اگه credential تنظیم نشده باشه، `pool` خالیه و هر query
/// `DbError::NotConfigured` برمیگردونه تا سرویس‌ها بی‌صدا سراغ snapshot برن.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Option<Arc<AnyPool>>,
    backend: Backend,
    timeout: Duration,
}

impl Database {
    /// ساخت از روی تنظیمات
    ///
    /// pool به صورت lazy ساخته میشه: اولین اتصال موقع اولین query برقرار
    /// میشه، پس دیتابیس در دسترس نبودن جلوی بالا اومدن سرور رو نمیگیره.
    ///
    /// # Errors
    /// فقط برای آدرس خراب یا scheme پشتیبانی‌نشده
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self> {
        let timeout = settings.query_timeout();

        let Some(url) = settings.connection_url() else {
            info!("Database credentials not set, serving bundled snapshot only");
            return Ok(Self::disabled(timeout));
        };

        let backend = Backend::from_url(&url)?;
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(600))
            .connect_lazy(&url)
            .map_err(DbError::from)?;

        info!(backend = ?backend, "Database pool configured (lazy)");

        Ok(Self {
            pool: Some(Arc::new(pool)),
            backend,
            timeout,
        })
    }

    /// حالت بدون دیتابیس
    #[must_use]
    pub fn disabled(timeout: Duration) -> Self {
        Self {
            pool: None,
            backend: Backend::MySql,
            timeout,
        }
    }

    /// آیا مسیر SQL فعاله؟
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn pool(&self) -> std::result::Result<&AnyPool, DbError> {
        self.pool.as_deref().ok_or(DbError::NotConfigured)
    }

    /// اجرای query و برگردوندن همه ردیف‌ها
    ///
    /// # مراحل:
    /// 1. نبود pool → `NotConfigured`
    /// 2. بررسی پارامترهای رشته‌ای با `guard` → `UnsafeParameter`
    /// 3. اجرا در مسابقه با تایمر → `Timeout`
    pub async fn query<T>(&self, sql: &str, params: &[SqlParam]) -> std::result::Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let pool = self.pool()?;
        screen_parameters(params)?;

        let query = params
            .iter()
            .fold(sqlx::query_as::<Any, T>(sql), |q, param| match param {
                SqlParam::Int(v) => q.bind(*v),
                SqlParam::Text(v) => q.bind(v.clone()),
                SqlParam::Bool(v) => q.bind(*v),
            });

        debug!(sql = %compact_sql(sql), params = params.len(), "Executing query");

        match tokio::time::timeout(self.timeout, query.fetch_all(pool)).await {
            Ok(rows) => Ok(rows?),
            Err(_) => Err(DbError::Timeout(self.timeout)),
        }
    }

    /// اجرای query و برگردوندن اولین ردیف (اگه باشه)
    pub async fn query_one<T>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> std::result::Result<Option<T>, DbError>
    where
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        Ok(self.query::<T>(sql, params).await?.into_iter().next())
    }

    /// بررسی سلامت دیتابیس
    pub async fn health_check(&self) -> std::result::Result<(), DbError> {
        let pool = self.pool()?;
        match tokio::time::timeout(self.timeout, sqlx::query("SELECT 1").execute(pool)).await {
            Ok(result) => result.map(|_| ()).map_err(DbError::from),
            Err(_) => Err(DbError::Timeout(self.timeout)),
        }
    }
}

/// یک خطی کردن SQL برای لاگ
fn compact_sql(sql: &str) -> String {
    crate::utils::clean_whitespace(sql)
}

// =====================================
// Test Utilities
// =====================================
#[cfg(test)]
impl Database {
    /// دیتابیس SQLite در حافظه با schema مرجع
    ///
    /// فقط یک اتصال، بدون timeout بیکاری؛ وگرنه با بسته شدن اتصال
    /// دیتابیس in-memory هم از بین میره.
    pub async fn in_memory() -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(DbError::from)?;

        let db = Self {
            pool: Some(Arc::new(pool)),
            backend: Backend::Sqlite,
            timeout: Duration::from_secs(5),
        };

        db.execute_script(include_str!("../../migrations/0001_schema.sql"))
            .await?;
        Ok(db)
    }

    /// اجرای چند دستور جدا شده با `;`
    pub async fn execute_script(&self, script: &str) -> Result<()> {
        let pool = self.pool()?;
        for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(DbError::from)?;
        }
        Ok(())
    }

    /// پر کردن جداول از روی داده snapshot
    ///
    /// با این کار میشه خروجی SQL و snapshot رو روی داده یکسان مقایسه کرد.
    pub async fn seed(&self, data: &SnapshotData) -> Result<()> {
        let pool = self.pool()?;

        for d in &data.doctors {
            sqlx::query(
                "INSERT INTO doctors (id, name_en, name_ar, bio_en, bio_ar, specialty_en, \
                 specialty_ar, head_of_dep, image, department_id) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(d.id.value())
            .bind(d.name_en.clone())
            .bind(d.name_ar.clone())
            .bind(d.bio_en.clone())
            .bind(d.bio_ar.clone())
            .bind(d.specialty_en.clone())
            .bind(d.specialty_ar.clone())
            .bind(if d.head_of_dep { "1" } else { "0" })
            .bind(d.image.clone())
            .bind(d.department_id)
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        for link in &data.doctor_services {
            sqlx::query("INSERT INTO doctor_services (doctor_id, service_id) VALUES (?, ?)")
                .bind(link.doctor_id.value())
                .bind(link.service_id)
                .execute(pool)
                .await
                .map_err(DbError::from)?;
        }

        for s in &data.medical_services {
            sqlx::query(
                "INSERT INTO medical_services (id, title_en, title_ar, description_en, \
                 description_ar, slug_en, slug_ar, department_id, display_order, icon) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(s.id)
            .bind(s.title_en.clone())
            .bind(s.title_ar.clone())
            .bind(s.description_en.clone())
            .bind(s.description_ar.clone())
            .bind(s.slug_en.clone())
            .bind(s.slug_ar.clone())
            .bind(s.department_id)
            .bind(s.display_order)
            .bind(s.icon.clone())
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        for link in &data.service_diseases {
            sqlx::query("INSERT INTO service_diseases (service_id, disease_id) VALUES (?, ?)")
                .bind(link.service_id)
                .bind(link.disease_id)
                .execute(pool)
                .await
                .map_err(DbError::from)?;
        }

        for x in &data.diseases {
            sqlx::query(
                "INSERT INTO diseases (id, name_en, name_ar, description_en, description_ar, \
                 body_part) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(x.id)
            .bind(x.name_en.clone())
            .bind(x.name_ar.clone())
            .bind(x.description_en.clone())
            .bind(x.description_ar.clone())
            .bind(x.body_part.clone())
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        for e in &data.events {
            sqlx::query(
                "INSERT INTO events (id, title_en, title_ar, description_en, description_ar, \
                 event_date, slug, image) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(e.id)
            .bind(e.title_en.clone())
            .bind(e.title_ar.clone())
            .bind(e.description_en.clone())
            .bind(e.description_ar.clone())
            .bind(e.date.format("%Y-%m-%d").to_string())
            .bind(e.slug.clone())
            .bind(e.image.clone())
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        for t in &data.text_content {
            sqlx::query(
                "INSERT INTO text_content (id, page, title_en, title_ar, content_en, content_ar, \
                 display_order) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(t.id)
            .bind(t.page.clone())
            .bind(t.title_en.clone())
            .bind(t.title_ar.clone())
            .bind(t.content_en.clone())
            .bind(t.content_ar.clone())
            .bind(t.display_order)
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        for p in &data.pictures {
            sqlx::query(
                "INSERT INTO pictures (id, page, url, alt_en, alt_ar, display_order) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(p.id)
            .bind(p.page.clone())
            .bind(p.url.clone())
            .bind(p.alt_en.clone())
            .bind(p.alt_ar.clone())
            .bind(p.display_order)
            .execute(pool)
            .await
            .map_err(DbError::from)?;
        }

        Ok(())
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoctorFilter;
    use pretty_assertions::assert_eq;

    /// شمارش چند صد میلیون ردیف؛ خیلی بیشتر از timeout تست طول میکشه
    const SLOW_COUNT: &str = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c \
                              WHERE x < 300000000) SELECT count(*) AS n FROM c";

    async fn in_memory_with_timeout(timeout: Duration) -> Database {
        Database {
            timeout,
            ..Database::in_memory().await.unwrap()
        }
    }

    #[derive(Debug, sqlx::FromRow)]
    struct CountRow {
        n: i64,
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(Backend::from_url("mysql://u:p@h/db").unwrap(), Backend::MySql);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert!(Backend::from_url("postgres://h/db").is_err());
    }

    #[test]
    fn test_like_escape_literal() {
        assert_eq!(Backend::Sqlite.like("d.name_en"), r"d.name_en LIKE ? ESCAPE '\'");
        assert_eq!(Backend::MySql.like("d.name_en"), r"d.name_en LIKE ? ESCAPE '\\'");
    }

    #[tokio::test]
    async fn test_disabled_database_reports_not_configured() {
        let db = Database::disabled(Duration::from_millis(50));
        let err = db.query::<CountRow>("SELECT 1 AS n", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::NotConfigured));
        assert!(!err.is_unexpected());
        assert!(matches!(db.health_check().await, Err(DbError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_from_settings_without_credentials() {
        let db = Database::from_settings(&DatabaseSettings::default()).unwrap();
        assert!(!db.is_configured());
    }

    #[tokio::test]
    async fn test_query_binds_parameters() {
        let db = Database::in_memory().await.unwrap();
        let rows: Vec<CountRow> = db
            .query("SELECT ? + 1 AS n", &[SqlParam::Int(41)])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].n, 42);
        assert!(db.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_injection_guard_runs_before_execution() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .query_one::<CountRow>(
                "SELECT 1 AS n WHERE ? IS NOT NULL",
                &[SqlParam::Text("x' OR 1=1 --".to_string())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnsafeParameter { index: 0 }));
    }

    #[tokio::test]
    async fn test_slow_query_times_out() {
        let timeout = Duration::from_millis(20);
        let db = in_memory_with_timeout(timeout).await;

        let started = std::time::Instant::now();
        let err = db.query::<CountRow>(SLOW_COUNT, &[]).await.unwrap_err();

        assert!(matches!(err, DbError::Timeout(t) if t == timeout));
        assert!(err.is_unexpected());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_busy_pool_times_out() {
        let db = in_memory_with_timeout(Duration::from_millis(50)).await;
        // تنها اتصال pool دست تسته
        let _held = db.pool().unwrap().acquire().await.unwrap();

        assert!(matches!(db.health_check().await, Err(DbError::Timeout(_))));
        let err = db.query::<CountRow>("SELECT 1 AS n", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_timed_out_sql_falls_back_to_snapshot() {
        // schema خالی: اگه SQL جواب میداد، لیست خالی برمیگشت
        let db = in_memory_with_timeout(Duration::from_millis(50)).await;
        let _held = db.pool().unwrap().acquire().await.unwrap();

        let snapshot = Arc::new(SnapshotCatalog::bundled().unwrap());
        let catalog = ReadThroughCatalog::new(
            Arc::new(SqlCatalog::new(db.clone())),
            Arc::clone(&snapshot),
            FallbackPolicy::OnError,
        );

        let doctors = catalog.doctors(&DoctorFilter::default()).await.unwrap();
        assert!(!doctors.is_empty());
        assert_eq!(doctors, snapshot.find_doctors(&DoctorFilter::default()));
    }

    #[tokio::test]
    async fn test_syntax_error_is_query_error() {
        let db = Database::in_memory().await.unwrap();
        let err = db.query::<CountRow>("SELEC nope", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Query(_)));
    }
}
