//! # سرویس پزشکان
//!
//! لیست پزشکان با فیلتر و گرفتن یک پزشک با شناسه.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::Catalog,
    error::{OptionExt, Result},
    models::{Doctor, DoctorFilter, DoctorId},
};

use super::Service;

#[derive(Clone)]
pub struct DoctorService {
    catalog: Arc<dyn Catalog>,
}

impl Service for DoctorService {}

impl DoctorService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// لیست پزشکان
    ///
    /// ترتیب: رئیس بخش اول، بعد نام انگلیسی، بعد شناسه. فیلتر خالی یعنی
    /// همه پزشکان.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: DoctorFilter) -> Result<Vec<Doctor>> {
        let doctors = self.catalog.doctors(&filter).await?;
        debug!(count = doctors.len(), "Listed doctors");
        Ok(doctors)
    }

    /// یک پزشک
    ///
    /// # Errors
    /// - `NotFound`: پزشکی با این شناسه نیست
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: DoctorId) -> Result<Doctor> {
        self.catalog
            .doctor_by_id(id)
            .await?
            .ok_or_not_found(format!("Doctor {id} not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ReadThroughCatalog, SnapshotCatalog};
    use crate::error::AppError;

    fn service() -> DoctorService {
        let snapshot = Arc::new(SnapshotCatalog::bundled().unwrap());
        DoctorService::new(Arc::new(ReadThroughCatalog::snapshot_only(snapshot)))
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let svc = service();
        let first = svc.list(DoctorFilter::default()).await.unwrap();
        let second = svc.list(DoctorFilter::default()).await.unwrap();
        assert_eq!(first, second);
        assert!(first[0].head_of_dep);
    }

    #[tokio::test]
    async fn test_get_by_padded_or_plain_id() {
        let svc = service();
        let plain = svc.get(DoctorId::parse("9").unwrap()).await.unwrap();
        let padded = svc.get(DoctorId::parse("00009").unwrap()).await.unwrap();
        assert_eq!(plain, padded);
        assert_eq!(plain.name_en, "Hana Salem");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service().get(DoctorId::parse("424").unwrap()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
