//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌──────────────────┐
//! │    API Layer     │  <-- HTTP handlers (axum)
//! ├──────────────────┤
//! │  Service Layer   │  <-- اینجا
//! ├──────────────────┤
//! │ ReadThroughCatalog│ <-- SQL، بعد snapshot
//! ├────────┬─────────┤
//! │ MySQL  │  JSON   │
//! └────────┴─────────┘
//! ```
//!
//! سرویس‌ها فقط `Arc<dyn Catalog>` میبینن و نمیدونن داده از کجا اومده.

mod content_service;
mod disease_service;
mod doctor_service;
mod event_service;
mod medical_service;
mod suggestion_service;

pub use content_service::*;
pub use disease_service::*;
pub use doctor_service::*;
pub use event_service::*;
pub use medical_service::*;
pub use suggestion_service::*;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    database::{Catalog, Database, FallbackPolicy, ReadThroughCatalog, SnapshotCatalog, SqlCatalog},
    error::Result,
};

// =====================================
// Application State
// =====================================
/// وضعیت مشترک بین همه handlers
///
/// همه فیلدها `Arc` هستن، پس clone کردنش ارزونه.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// برای health check
    pub database: Database,

    pub doctors: Arc<DoctorService>,
    pub medical_services: Arc<MedicalServiceService>,
    pub diseases: Arc<DiseaseService>,
    pub events: Arc<EventService>,
    pub content: Arc<ContentService>,
    pub suggestions: Arc<SuggestionService>,
}

impl AppState {
    /// ساخت state با SQL به عنوان منبع اصلی و snapshot به عنوان پشتیبان
    #[must_use]
    pub fn new(config: Config, database: Database, snapshot: SnapshotCatalog) -> Self {
        let policy = FallbackPolicy::from_flag(config.fallback_on_empty);
        let primary: Arc<dyn Catalog> = Arc::new(SqlCatalog::new(database.clone()));
        let catalog = ReadThroughCatalog::new(primary, Arc::new(snapshot), policy);

        Self::with_catalog(config, database, Arc::new(catalog))
    }

    /// ساخت state روی یک catalog دلخواه
    #[must_use]
    pub fn with_catalog(config: Config, database: Database, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            config: Arc::new(config),
            database,
            doctors: Arc::new(DoctorService::new(Arc::clone(&catalog))),
            medical_services: Arc::new(MedicalServiceService::new(Arc::clone(&catalog))),
            diseases: Arc::new(DiseaseService::new(Arc::clone(&catalog))),
            events: Arc::new(EventService::new(Arc::clone(&catalog))),
            content: Arc::new(ContentService::new(Arc::clone(&catalog))),
            suggestions: Arc::new(SuggestionService::new(catalog)),
        }
    }

    /// ساخت کامل از روی تنظیمات: دیتابیس و snapshot
    ///
    /// اگه پوشه snapshot وجود نداشته باشه، نسخه داخل باینری استفاده میشه.
    ///
    /// # Errors
    /// آدرس دیتابیس نامعتبر یا فایل snapshot خراب
    pub fn bootstrap(config: Config) -> Result<Self> {
        let database = Database::from_settings(&config.database)?;

        let snapshot = if Path::new(&config.snapshot_dir).is_dir() {
            SnapshotCatalog::load(&config.snapshot_dir)?
        } else {
            info!(dir = %config.snapshot_dir, "Snapshot directory not found, using bundled data");
            SnapshotCatalog::bundled()?
        };

        Ok(Self::new(config, database, snapshot))
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// =====================================
// Service Trait
// =====================================
/// marker trait برای services
pub trait Service: Send + Sync {}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::models::DoctorFilter;

    #[tokio::test]
    async fn test_live_database_serves_requests() {
        let snapshot = SnapshotCatalog::bundled().unwrap();
        let db = Database::in_memory().await.unwrap();
        db.seed(snapshot.data()).await.unwrap();

        // snapshot خالی: هر جوابی باید از SQL اومده باشه
        let state = AppState::new(
            ConfigBuilder::new().fallback_on_empty(false).build(),
            db,
            SnapshotCatalog::default(),
        );

        let doctors = state.doctors.list(DoctorFilter::default()).await.unwrap();
        assert_eq!(doctors, snapshot.find_doctors(&DoctorFilter::default()));
    }

    #[tokio::test]
    async fn test_bootstrap_without_database() {
        let config = ConfigBuilder::new().snapshot_dir("/no/such/dir").build();
        let state = AppState::bootstrap(config).unwrap();
        assert!(!state.database.is_configured());

        let doctors = state.doctors.list(DoctorFilter::default()).await.unwrap();
        assert!(!doctors.is_empty());
    }
}
