//! # Data Transfer Objects (DTOs)
//!
//! بدنه پاسخ‌های API. شکل‌ها عمدا ساده‌ان (`{ doctors: [...] }` و ...)
//! چون لایه نمایش مستقیم همین کلیدها رو میخونه.

use serde::{Deserialize, Serialize};

use super::{Disease, Doctor, Event, MedicalService, TextContent};

// =====================================
// List Bodies
// =====================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub doctor: Doctor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesResponse {
    pub services: Vec<MedicalService>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub service: MedicalService,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseasesResponse {
    pub diseases: Vec<Disease>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub event: Event,
}

// =====================================
// Suggestions
// =====================================
/// نوع پیشنهاد جستجو
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Doctor,
    Service,
}

/// یک پیشنهاد برای جعبه جستجو
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,

    /// متن نمایشی به زبان درخواست
    pub label: String,

    /// شناسه پزشک ("00009") یا slug سرویس
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

// =====================================
// Page Content
// =====================================
/// محتوای محلی‌شده یک صفحه: `{ title, content, image }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

/// همه بلوک‌های متنی یک صفحه، دو زبانه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlocksResponse {
    pub blocks: Vec<TextContent>,
}

// =====================================
// Health Check
// =====================================
/// منبع داده فعال
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// دیتابیس زنده
    Live,
    /// فایل‌های JSON همراه برنامه
    Snapshot,
}

/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
    pub source: DataSource,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database_ok: bool, database_configured: bool) -> Self {
        // بدون دیتابیس تنظیم‌شده، snapshot حالت عادیه نه degraded
        let healthy = database_ok || !database_configured;
        Self {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
            source: if database_ok {
                DataSource::Live
            } else {
                DataSource::Snapshot
            },
        }
    }
}
