//! # Read-through Catalog
//!
//! اول منبع اصلی (SQL) امتحان میشه؛ اگه خطا داد (یا بسته به policy
//! نتیجه خالی برگردوند) همون درخواست از snapshot جواب داده میشه.
//! خطای دیتابیس هیچوقت به کاربر نمیرسه.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Catalog, SnapshotCatalog};
use crate::error::DbError;
use crate::models::{
    DataSource, Disease, DiseaseFilter, Doctor, DoctorFilter, DoctorId, Event, EventFilter,
    MedicalService, Picture, ServiceFilter, TextContent,
};

type DbResult<T> = std::result::Result<T, DbError>;

/// کی سراغ snapshot بریم؟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// فقط وقتی منبع اصلی خطا داد
    OnError,
    /// خطا یا نتیجه خالی
    #[default]
    OnErrorOrEmpty,
}

impl FallbackPolicy {
    #[must_use]
    pub fn from_flag(fallback_on_empty: bool) -> Self {
        if fallback_on_empty {
            Self::OnErrorOrEmpty
        } else {
            Self::OnError
        }
    }
}

/// ترکیب منبع اصلی و snapshot
#[derive(Clone)]
pub struct ReadThroughCatalog {
    primary: Option<Arc<dyn Catalog>>,
    snapshot: Arc<SnapshotCatalog>,
    policy: FallbackPolicy,
}

impl std::fmt::Debug for ReadThroughCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCatalog")
            .field("primary", &self.primary.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ReadThroughCatalog {
    #[must_use]
    pub fn new(
        primary: Arc<dyn Catalog>,
        snapshot: Arc<SnapshotCatalog>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            primary: Some(primary),
            snapshot,
            policy,
        }
    }

    /// فقط snapshot (بدون منبع اصلی)
    #[must_use]
    pub fn snapshot_only(snapshot: Arc<SnapshotCatalog>) -> Self {
        Self {
            primary: None,
            snapshot,
            policy: FallbackPolicy::OnError,
        }
    }

    fn log_failure(entity: &'static str, err: &DbError) {
        if err.is_unexpected() {
            warn!(entity, error = %err, "Primary source failed, serving snapshot");
        } else {
            debug!(entity, "Database not configured, serving snapshot");
        }
    }

    fn settle_list<T>(
        &self,
        entity: &'static str,
        live: Option<DbResult<Vec<T>>>,
        fallback: impl FnOnce() -> Vec<T>,
    ) -> Vec<T> {
        match live {
            Some(Ok(rows)) if !rows.is_empty() || self.policy == FallbackPolicy::OnError => {
                debug!(entity, count = rows.len(), source = ?DataSource::Live, "Served");
                rows
            }
            Some(Ok(_)) => {
                debug!(entity, "Primary returned no rows, serving snapshot");
                fallback()
            }
            Some(Err(err)) => {
                Self::log_failure(entity, &err);
                fallback()
            }
            None => fallback(),
        }
    }

    fn settle_one<T>(
        &self,
        entity: &'static str,
        live: Option<DbResult<Option<T>>>,
        fallback: impl FnOnce() -> Option<T>,
    ) -> Option<T> {
        match live {
            Some(Ok(Some(item))) => {
                debug!(entity, source = ?DataSource::Live, "Served");
                Some(item)
            }
            Some(Ok(None)) if self.policy == FallbackPolicy::OnError => None,
            Some(Ok(None)) => {
                debug!(entity, "Primary found nothing, checking snapshot");
                fallback()
            }
            Some(Err(err)) => {
                Self::log_failure(entity, &err);
                fallback()
            }
            None => fallback(),
        }
    }
}

#[async_trait]
impl Catalog for ReadThroughCatalog {
    async fn doctors(&self, filter: &DoctorFilter) -> DbResult<Vec<Doctor>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.doctors(filter).await),
            None => None,
        };
        Ok(self.settle_list("doctors", live, || self.snapshot.find_doctors(filter)))
    }

    async fn doctor_by_id(&self, id: DoctorId) -> DbResult<Option<Doctor>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.doctor_by_id(id).await),
            None => None,
        };
        Ok(self.settle_one("doctor", live, || self.snapshot.find_doctor(id)))
    }

    async fn medical_services(&self, filter: &ServiceFilter) -> DbResult<Vec<MedicalService>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.medical_services(filter).await),
            None => None,
        };
        Ok(self.settle_list("medical_services", live, || {
            self.snapshot.find_medical_services(filter)
        }))
    }

    async fn medical_service_by_slug(&self, slug: &str) -> DbResult<Option<MedicalService>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.medical_service_by_slug(slug).await),
            None => None,
        };
        Ok(self.settle_one("medical_service", live, || {
            self.snapshot.find_medical_service_by_slug(slug)
        }))
    }

    async fn medical_service_by_id(&self, id: i64) -> DbResult<Option<MedicalService>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.medical_service_by_id(id).await),
            None => None,
        };
        Ok(self.settle_one("medical_service", live, || {
            self.snapshot.find_medical_service_by_id(id)
        }))
    }

    async fn diseases(&self, filter: &DiseaseFilter) -> DbResult<Vec<Disease>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.diseases(filter).await),
            None => None,
        };
        Ok(self.settle_list("diseases", live, || self.snapshot.find_diseases(filter)))
    }

    async fn events(&self, filter: &EventFilter) -> DbResult<Vec<Event>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.events(filter).await),
            None => None,
        };
        Ok(self.settle_list("events", live, || self.snapshot.find_events(filter)))
    }

    async fn event_by_slug(&self, slug: &str) -> DbResult<Option<Event>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.event_by_slug(slug).await),
            None => None,
        };
        Ok(self.settle_one("event", live, || self.snapshot.find_event_by_slug(slug)))
    }

    async fn text_blocks(&self, page: &str) -> DbResult<Vec<TextContent>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.text_blocks(page).await),
            None => None,
        };
        Ok(self.settle_list("text_content", live, || self.snapshot.find_text_blocks(page)))
    }

    async fn pictures(&self, page: &str) -> DbResult<Vec<Picture>> {
        let live = match &self.primary {
            Some(primary) => Some(primary.pictures(page).await),
            None => None,
        };
        Ok(self.settle_list("pictures", live, || self.snapshot.find_pictures(page)))
    }
}
