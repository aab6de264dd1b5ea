//! # ماژول تنظیمات (Configuration)
//!
//! تنظیمات در سه لایه خونده میشن:
//!
//! 1. مقادیر پیش‌فرض (`Config::default`)
//! 2. فایل اختیاری `hospital.toml` (با crate `config`)
//! 3. متغیرهای محیطی (`DB_HOST`، `PORT` و ...)
//!
//! نبودن credential دیتابیس خطا نیست: برنامه در حالت فقط-snapshot بالا میاد.
//!
//! ## مفاهیم Rust:
//! - **Serde**: `#[serde(default)]` برای لایه فایل
//! - **Builder Pattern**: ساخت تدریجی آبجکت در تست‌ها

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// نام پیش‌فرض فایل تنظیمات (بدون پسوند)
pub const DEFAULT_CONFIG_FILE: &str = "hospital";

/// تنظیمات اصلی برنامه
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// محیط اجرا (development, production)
    pub environment: Environment,

    /// تنظیمات اتصال به دیتابیس
    pub database: DatabaseSettings,

    /// پوشه فایل‌های JSON پشتیبان
    pub snapshot_dir: String,

    /// اگه نتیجه دیتابیس خالی بود هم سراغ snapshot بریم؟
    pub fallback_on_empty: bool,

    /// حداکثر زمان پردازش هر request (ثانیه)
    pub request_timeout_secs: u64,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// محیط توسعه - خطاها با جزئیات
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید - پیام‌های خطا عمومی
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// تبدیل String به Environment
impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

// =====================================
// Database Settings
// =====================================
/// credential‌ها و رفتار اتصال دیتابیس
///
/// `url` اگه ست باشه، بقیه فیلدها نادیده گرفته میشن (برای SQLite یا تست).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub port: u16,
    pub ssl: bool,

    /// timeout هر query به میلی‌ثانیه
    pub query_timeout_ms: u64,

    /// حداکثر اتصال همزمان pool
    pub max_connections: u32,
}

// رمز عبور نباید در لاگ‌ها بیاد
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("port", &self.port)
            .field("ssl", &self.ssl)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            user: None,
            password: None,
            name: None,
            port: 3306,
            ssl: false,
            query_timeout_ms: 5000,
            max_connections: 10,
        }
    }
}

impl DatabaseSettings {
    /// آدرس اتصال، یا None اگه credential کامل نباشه
    ///
    /// host، user، password و name همه لازمن. آدرس با crate `url` ساخته
    /// میشه تا کاراکترهای خاص رمز عبور درست encode بشن.
    #[must_use]
    pub fn connection_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(url.to_string());
        }

        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        let host = non_empty(&self.host)?;
        let user = non_empty(&self.user)?;
        let password = non_empty(&self.password)?;
        let name = non_empty(&self.name)?;

        let mut url = url::Url::parse("mysql://localhost").ok()?;
        url.set_host(Some(&host)).ok()?;
        url.set_port(Some(self.port)).ok()?;
        url.set_username(&user).ok()?;
        url.set_password(Some(&password)).ok()?;
        url.set_path(&format!("/{name}"));
        if self.ssl {
            url.query_pairs_mut().append_pair("ssl-mode", "required");
        }

        Some(url.to_string())
    }

    /// آیا مسیر SQL فعاله؟
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.connection_url().is_some()
    }

    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// مقادیر پیش‌فرض برای Config
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: Environment::Development,
            database: DatabaseSettings::default(),
            snapshot_dir: "data".to_string(),
            fallback_on_empty: true,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// لود کامل: فایل اختیاری + متغیرهای محیطی
    ///
    /// # Errors
    /// اگه فایل تنظیمات وجود داشته باشه ولی خراب باشه
    pub fn load() -> Result<Self> {
        let file = env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file(&file)?;
        config.apply_env();
        Ok(config)
    }

    /// خوندن لایه فایل با crate `config`
    ///
    /// نبودن فایل مشکلی نیست و مقادیر پیش‌فرض برمیگردن.
    pub fn from_file(name: &str) -> Result<Self> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(name).required(false))
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// اعمال متغیرهای محیطی روی تنظیمات فعلی
    pub fn apply_env(&mut self) {
        let get_env = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());
        let parse_env = |key: &str| get_env(key).and_then(|v| v.parse::<u64>().ok());
        let flag_env = |key: &str| {
            get_env(key).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        };

        if let Some(host) = get_env("HOST") {
            self.host = host;
        }
        if let Some(port) = parse_env("PORT").and_then(|p| u16::try_from(p).ok()) {
            self.port = port;
        }
        if let Some(environment) = get_env("ENVIRONMENT") {
            self.environment = environment.into();
        }
        if let Some(dir) = get_env("SNAPSHOT_DIR") {
            self.snapshot_dir = dir;
        }
        if let Some(flag) = flag_env("FALLBACK_ON_EMPTY") {
            self.fallback_on_empty = flag;
        }
        if let Some(secs) = parse_env("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }

        let db = &mut self.database;
        if let Some(url) = get_env("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(host) = get_env("DB_HOST") {
            db.host = Some(host);
        }
        if let Some(user) = get_env("DB_USER") {
            db.user = Some(user);
        }
        if let Some(password) = get_env("DB_PASSWORD") {
            db.password = Some(password);
        }
        if let Some(name) = get_env("DB_NAME") {
            db.name = Some(name);
        }
        if let Some(port) = parse_env("DB_PORT").and_then(|p| u16::try_from(p).ok()) {
            db.port = port;
        }
        if let Some(ssl) = flag_env("DB_SSL") {
            db.ssl = ssl;
        }
        if let Some(ms) = parse_env("DB_QUERY_TIMEOUT_MS") {
            db.query_timeout_ms = ms;
        }
    }

    /// اعتبارسنجی تنظیمات در زمان شروع برنامه
    ///
    /// credential ناقص اینجا خطا نیست؛ فقط مقادیر بی‌معنی رد میشن.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.database.query_timeout_ms == 0 {
            return Err(AppError::Config(
                "DB_QUERY_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        if self.snapshot_dir.trim().is_empty() {
            return Err(AppError::Config("SNAPSHOT_DIR cannot be empty".to_string()));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// ```rust
/// use hospital_catalog::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .snapshot_dir("data")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// تنظیم مستقیم آدرس دیتابیس
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn snapshot_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.snapshot_dir = dir.into();
        self
    }

    #[must_use]
    pub fn fallback_on_empty(mut self, enabled: bool) -> Self {
        self.config.fallback_on_empty = enabled;
        self
    }

    #[must_use]
    pub fn query_timeout_ms(mut self, ms: u64) -> Self {
        self.config.database.query_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.snapshot_dir, "data");
        assert!(config.fallback_on_empty);
        assert!(!config.database.is_configured());
    }

    #[test]
    fn test_missing_credential_disables_sql() {
        let mut db = DatabaseSettings {
            host: Some("db.internal".to_string()),
            user: Some("site".to_string()),
            name: Some("hospital".to_string()),
            ..DatabaseSettings::default()
        };
        assert_eq!(db.connection_url(), None);

        db.password = Some("p@ss/word".to_string());
        let url = db.connection_url().unwrap();
        assert!(url.starts_with("mysql://site:"));
        assert!(url.contains("@db.internal:3306/hospital"));
        assert!(!url.contains("p@ss/word"));
    }

    #[test]
    fn test_ssl_flag_adds_mode() {
        let db = DatabaseSettings {
            host: Some("db".to_string()),
            user: Some("u".to_string()),
            password: Some("p".to_string()),
            name: Some("n".to_string()),
            ssl: true,
            ..DatabaseSettings::default()
        };
        assert!(db.connection_url().unwrap().ends_with("?ssl-mode=required"));
    }

    #[test]
    fn test_explicit_url_wins() {
        let db = DatabaseSettings {
            url: Some("sqlite::memory:".to_string()),
            ..DatabaseSettings::default()
        };
        assert_eq!(db.connection_url().as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let db = DatabaseSettings {
            password: Some("hunter2".to_string()),
            ..DatabaseSettings::default()
        };
        assert!(!format!("{:?}", db).contains("hunter2"));
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from("PROD".to_string()), Environment::Production);
        assert_eq!(Environment::from("unknown".to_string()), Environment::Development);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ConfigBuilder::new().query_timeout_ms(0).build();
        assert!(config.validate().is_err());
        assert!(ConfigBuilder::new().build_validated().is_ok());
    }
}
