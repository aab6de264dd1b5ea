//! # Snapshot Catalog
//!
//! نسخه JSON داده‌ها که همراه برنامه میاد و وقتی دیتابیس در دسترس نیست
//! (یا تنظیم نشده) سرو میشه.
//!
//! هر entity یک فایل داره (`doctors.json`، `services.json` و ...) که یک
//! آرایه JSON هست. داده‌ها یک بار موقع بالا اومدن خونده و مرتب میشن و
//! بعد فقط خونده میشن، پس قفل لازم نیست.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Catalog;
use crate::error::{AppError, DbError, Result};
use crate::models::{
    Disease, DiseaseFilter, Doctor, DoctorFilter, DoctorId, DoctorServiceLink, Event, EventFilter,
    MedicalService, Picture, ServiceDiseaseLink, ServiceFilter, TextContent,
};

// =====================================
// Snapshot Data
// =====================================
/// محتوای کامل snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotData {
    pub doctors: Vec<Doctor>,
    pub doctor_services: Vec<DoctorServiceLink>,
    pub medical_services: Vec<MedicalService>,
    pub service_diseases: Vec<ServiceDiseaseLink>,
    pub diseases: Vec<Disease>,
    pub events: Vec<Event>,
    pub text_content: Vec<TextContent>,
    pub pictures: Vec<Picture>,
}

/// نام فایل‌ها در پوشه snapshot
const DOCTORS_FILE: &str = "doctors.json";
const DOCTOR_SERVICES_FILE: &str = "doctor_services.json";
const SERVICES_FILE: &str = "services.json";
const SERVICE_DISEASES_FILE: &str = "service_diseases.json";
const DISEASES_FILE: &str = "diseases.json";
const EVENTS_FILE: &str = "events.json";
const TEXT_CONTENT_FILE: &str = "text_content.json";
const PICTURES_FILE: &str = "pictures.json";

// =====================================
// Snapshot Catalog
// =====================================
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    data: SnapshotData,
}

impl SnapshotCatalog {
    /// ساخت از داده آماده؛ همه لیست‌ها به ترتیب نمایش مرتب میشن
    #[must_use]
    pub fn from_data(mut data: SnapshotData) -> Self {
        data.doctors.sort_by(Doctor::display_cmp);
        data.medical_services.sort_by(MedicalService::display_cmp);
        data.diseases.sort_by(Disease::display_cmp);
        data.events.sort_by(Event::display_cmp);
        data.text_content.sort_by(TextContent::display_cmp);
        data.pictures.sort_by(Picture::display_cmp);
        Self { data }
    }

    /// خوندن از پوشه
    ///
    /// فایلی که نباشه با هشدار خالی فرض میشه؛ فایل خراب خطاست.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AppError::Config(format!(
                "snapshot directory {} does not exist",
                dir.display()
            )));
        }

        let data = SnapshotData {
            doctors: read_file(dir, DOCTORS_FILE)?,
            doctor_services: read_file(dir, DOCTOR_SERVICES_FILE)?,
            medical_services: read_file(dir, SERVICES_FILE)?,
            service_diseases: read_file(dir, SERVICE_DISEASES_FILE)?,
            diseases: read_file(dir, DISEASES_FILE)?,
            events: read_file(dir, EVENTS_FILE)?,
            text_content: read_file(dir, TEXT_CONTENT_FILE)?,
            pictures: read_file(dir, PICTURES_FILE)?,
        };

        let catalog = Self::from_data(data);
        catalog.log_summary(&dir.display().to_string());
        Ok(catalog)
    }

    /// snapshot داخل باینری (پوشه `data/` موقع build)
    pub fn bundled() -> Result<Self> {
        let data = SnapshotData {
            doctors: serde_json::from_str(include_str!("../../data/doctors.json"))?,
            doctor_services: serde_json::from_str(include_str!("../../data/doctor_services.json"))?,
            medical_services: serde_json::from_str(include_str!("../../data/services.json"))?,
            service_diseases: serde_json::from_str(include_str!(
                "../../data/service_diseases.json"
            ))?,
            diseases: serde_json::from_str(include_str!("../../data/diseases.json"))?,
            events: serde_json::from_str(include_str!("../../data/events.json"))?,
            text_content: serde_json::from_str(include_str!("../../data/text_content.json"))?,
            pictures: serde_json::from_str(include_str!("../../data/pictures.json"))?,
        };

        let catalog = Self::from_data(data);
        catalog.log_summary("bundled");
        Ok(catalog)
    }

    /// داده مرتب‌شده
    #[must_use]
    pub fn data(&self) -> &SnapshotData {
        &self.data
    }

    fn log_summary(&self, origin: &str) {
        info!(
            origin,
            doctors = self.data.doctors.len(),
            services = self.data.medical_services.len(),
            diseases = self.data.diseases.len(),
            events = self.data.events.len(),
            "Snapshot loaded"
        );
    }

    // ----------------------------------------
    // Relationship lookups
    // ----------------------------------------

    /// پزشکان یک سرویس
    ///
    /// `doctor_id` در فایل ارتباط عددیه؛ `DoctorId` همون شناسه ۵ رقمی پزشک
    /// رو میسازه.
    fn doctors_for_service(&self, service_id: i64) -> HashSet<DoctorId> {
        self.doctors_for_services(&HashSet::from([service_id]))
    }

    fn doctors_for_services(&self, service_ids: &HashSet<i64>) -> HashSet<DoctorId> {
        self.data
            .doctor_services
            .iter()
            .filter(|link| service_ids.contains(&link.service_id))
            .map(|link| link.doctor_id)
            .collect()
    }

    /// پزشکان مرتبط با یک بیماری: از طریق سرویس‌های اون بیماری
    fn doctors_for_disease(&self, disease_id: i64) -> HashSet<DoctorId> {
        self.doctors_for_services(&self.services_for_disease(disease_id))
    }

    fn services_for_disease(&self, disease_id: i64) -> HashSet<i64> {
        self.data
            .service_diseases
            .iter()
            .filter(|link| link.disease_id == disease_id)
            .map(|link| link.service_id)
            .collect()
    }

    fn diseases_for_service(&self, service_id: i64) -> HashSet<i64> {
        self.data
            .service_diseases
            .iter()
            .filter(|link| link.service_id == service_id)
            .map(|link| link.disease_id)
            .collect()
    }

    // ----------------------------------------
    // Queries
    // ----------------------------------------

    #[must_use]
    pub fn find_doctors(&self, filter: &DoctorFilter) -> Vec<Doctor> {
        let by_service = filter.service_id.map(|id| self.doctors_for_service(id));
        let by_disease = filter.disease_id.map(|id| self.doctors_for_disease(id));

        self.data
            .doctors
            .iter()
            .filter(|d| by_service.as_ref().map_or(true, |ids| ids.contains(&d.id)))
            .filter(|d| by_disease.as_ref().map_or(true, |ids| ids.contains(&d.id)))
            .filter(|d| filter.matches_fields(d))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn find_doctor(&self, id: DoctorId) -> Option<Doctor> {
        self.data.doctors.iter().find(|d| d.id == id).cloned()
    }

    #[must_use]
    pub fn find_medical_services(&self, filter: &ServiceFilter) -> Vec<MedicalService> {
        let by_disease = filter.disease_id.map(|id| self.services_for_disease(id));

        self.data
            .medical_services
            .iter()
            .filter(|s| by_disease.as_ref().map_or(true, |ids| ids.contains(&s.id)))
            .filter(|s| filter.matches_fields(s))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn find_medical_service_by_slug(&self, slug: &str) -> Option<MedicalService> {
        self.data
            .medical_services
            .iter()
            .find(|s| s.has_slug(slug))
            .cloned()
    }

    #[must_use]
    pub fn find_medical_service_by_id(&self, id: i64) -> Option<MedicalService> {
        self.data.medical_services.iter().find(|s| s.id == id).cloned()
    }

    #[must_use]
    pub fn find_diseases(&self, filter: &DiseaseFilter) -> Vec<Disease> {
        let by_service = filter.service_id.map(|id| self.diseases_for_service(id));

        self.data
            .diseases
            .iter()
            .filter(|d| by_service.as_ref().map_or(true, |ids| ids.contains(&d.id)))
            .filter(|d| filter.matches_fields(d))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn find_events(&self, filter: &EventFilter) -> Vec<Event> {
        let limit = filter.limit.map_or(usize::MAX, |n| n as usize);
        self.data.events.iter().take(limit).cloned().collect()
    }

    #[must_use]
    pub fn find_event_by_slug(&self, slug: &str) -> Option<Event> {
        self.data.events.iter().find(|e| e.slug == slug).cloned()
    }

    #[must_use]
    pub fn find_text_blocks(&self, page: &str) -> Vec<TextContent> {
        self.data
            .text_content
            .iter()
            .filter(|t| t.page == page)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn find_pictures(&self, page: &str) -> Vec<Picture> {
        self.data
            .pictures
            .iter()
            .filter(|p| p.page == page)
            .cloned()
            .collect()
    }
}

/// خوندن یک فایل JSON از پوشه snapshot
fn read_file<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    if !path.exists() {
        warn!(path = %path.display(), "Snapshot file missing, treating as empty");
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Config(format!("invalid snapshot file {}: {e}", path.display())))
}

// =====================================
// Catalog Implementation
// =====================================
#[async_trait]
impl Catalog for SnapshotCatalog {
    async fn doctors(&self, filter: &DoctorFilter) -> std::result::Result<Vec<Doctor>, DbError> {
        Ok(self.find_doctors(filter))
    }

    async fn doctor_by_id(&self, id: DoctorId) -> std::result::Result<Option<Doctor>, DbError> {
        Ok(self.find_doctor(id))
    }

    async fn medical_services(
        &self,
        filter: &ServiceFilter,
    ) -> std::result::Result<Vec<MedicalService>, DbError> {
        Ok(self.find_medical_services(filter))
    }

    async fn medical_service_by_slug(
        &self,
        slug: &str,
    ) -> std::result::Result<Option<MedicalService>, DbError> {
        Ok(self.find_medical_service_by_slug(slug))
    }

    async fn medical_service_by_id(
        &self,
        id: i64,
    ) -> std::result::Result<Option<MedicalService>, DbError> {
        Ok(self.find_medical_service_by_id(id))
    }

    async fn diseases(&self, filter: &DiseaseFilter) -> std::result::Result<Vec<Disease>, DbError> {
        Ok(self.find_diseases(filter))
    }

    async fn events(&self, filter: &EventFilter) -> std::result::Result<Vec<Event>, DbError> {
        Ok(self.find_events(filter))
    }

    async fn event_by_slug(&self, slug: &str) -> std::result::Result<Option<Event>, DbError> {
        Ok(self.find_event_by_slug(slug))
    }

    async fn text_blocks(&self, page: &str) -> std::result::Result<Vec<TextContent>, DbError> {
        Ok(self.find_text_blocks(page))
    }

    async fn pictures(&self, page: &str) -> std::result::Result<Vec<Picture>, DbError> {
        Ok(self.find_pictures(page))
    }
}
