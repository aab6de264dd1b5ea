//! # سرویس بخش‌های درمانی

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::Catalog,
    error::{OptionExt, Result},
    models::{MedicalService, ServiceFilter},
};

use super::Service;

/// لیست و جستجوی سرویس‌های پزشکی
#[derive(Clone)]
pub struct MedicalServiceService {
    catalog: Arc<dyn Catalog>,
}

impl Service for MedicalServiceService {}

impl MedicalServiceService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: ServiceFilter) -> Result<Vec<MedicalService>> {
        let services = self.catalog.medical_services(&filter).await?;
        debug!(count = services.len(), "Listed services");
        Ok(services)
    }

    /// با slug انگلیسی یا عربی
    #[instrument(skip(self))]
    pub async fn by_slug(&self, slug: &str) -> Result<MedicalService> {
        self.catalog
            .medical_service_by_slug(slug)
            .await?
            .ok_or_not_found(format!("Service '{slug}' not found"))
    }

    #[instrument(skip(self))]
    pub async fn by_id(&self, id: i64) -> Result<MedicalService> {
        self.catalog
            .medical_service_by_id(id)
            .await?
            .ok_or_not_found(format!("Service {id} not found"))
    }
}
