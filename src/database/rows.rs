//! ردیف‌های خام SQL و تبدیلشون به entity‌های canonical
//!
//! ستون‌ها فقط با نوع‌های `i64` و `String` خونده میشن تا روی هر دو
//! درایور (MySQL و SQLite) یکسان decode بشن. ستون‌های nullable به
//! `Option` میان و در تبدیل به رشته خالی تبدیل میشن.

use sqlx::FromRow;

use crate::error::DbError;
use crate::models::{
    parse_event_date, parse_flag_text, Disease, Doctor, DoctorId, Event, MedicalService, Picture,
    TextContent,
};

#[derive(Debug, FromRow)]
pub(crate) struct DoctorRow {
    pub id: i64,
    pub name_en: String,
    pub name_ar: Option<String>,
    pub bio_en: Option<String>,
    pub bio_ar: Option<String>,
    pub specialty_en: Option<String>,
    pub specialty_ar: Option<String>,
    pub head_of_dep: Option<String>,
    pub image: Option<String>,
    pub department_id: Option<i64>,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DbError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        let id = DoctorId::from_numeric(row.id)
            .ok_or_else(|| DbError::Malformed(format!("doctor id {}", row.id)))?;

        let flag = row.head_of_dep.unwrap_or_default();
        let head_of_dep = parse_flag_text(&flag)
            .ok_or_else(|| DbError::Malformed(format!("doctor {id} head_of_dep {flag:?}")))?;

        Ok(Doctor {
            id,
            name_en: row.name_en,
            name_ar: row.name_ar.unwrap_or_default(),
            bio_en: row.bio_en.unwrap_or_default(),
            bio_ar: row.bio_ar.unwrap_or_default(),
            specialty_en: row.specialty_en.unwrap_or_default(),
            specialty_ar: row.specialty_ar.unwrap_or_default(),
            head_of_dep,
            image: row.image.filter(|s| !s.is_empty()),
            department_id: row.department_id,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct MedicalServiceRow {
    pub id: i64,
    pub title_en: String,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub slug_en: String,
    pub slug_ar: Option<String>,
    pub department_id: Option<i64>,
    pub display_order: i64,
    pub icon: Option<String>,
}

impl From<MedicalServiceRow> for MedicalService {
    fn from(row: MedicalServiceRow) -> Self {
        Self {
            id: row.id,
            title_en: row.title_en,
            title_ar: row.title_ar.unwrap_or_default(),
            description_en: row.description_en.unwrap_or_default(),
            description_ar: row.description_ar.unwrap_or_default(),
            slug_en: row.slug_en,
            slug_ar: row.slug_ar.unwrap_or_default(),
            department_id: row.department_id,
            display_order: row.display_order,
            icon: row.icon.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DiseaseRow {
    pub id: i64,
    pub name_en: String,
    pub name_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub body_part: Option<String>,
}

impl From<DiseaseRow> for Disease {
    fn from(row: DiseaseRow) -> Self {
        Self {
            id: row.id,
            name_en: row.name_en,
            name_ar: row.name_ar.unwrap_or_default(),
            description_en: row.description_en.unwrap_or_default(),
            description_ar: row.description_ar.unwrap_or_default(),
            body_part: row.body_part.filter(|s| !s.is_empty()),
        }
    }
}

/// `event_date` با `CAST(... AS CHAR)` به صورت رشته خونده میشه
#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: i64,
    pub title_en: String,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub event_date: String,
    pub slug: String,
    pub image: Option<String>,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let date = parse_event_date(&row.event_date).ok_or_else(|| {
            DbError::Malformed(format!("event {} date {:?}", row.id, row.event_date))
        })?;

        Ok(Event {
            id: row.id,
            title_en: row.title_en,
            title_ar: row.title_ar.unwrap_or_default(),
            description_en: row.description_en.unwrap_or_default(),
            description_ar: row.description_ar.unwrap_or_default(),
            date,
            slug: row.slug,
            image: row.image.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TextContentRow {
    pub id: i64,
    pub page: String,
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub content_en: Option<String>,
    pub content_ar: Option<String>,
    pub display_order: i64,
}

impl From<TextContentRow> for TextContent {
    fn from(row: TextContentRow) -> Self {
        Self {
            id: row.id,
            page: row.page,
            title_en: row.title_en.unwrap_or_default(),
            title_ar: row.title_ar.unwrap_or_default(),
            content_en: row.content_en.unwrap_or_default(),
            content_ar: row.content_ar.unwrap_or_default(),
            display_order: row.display_order,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PictureRow {
    pub id: i64,
    pub page: String,
    pub url: String,
    pub alt_en: Option<String>,
    pub alt_ar: Option<String>,
    pub display_order: i64,
}

impl From<PictureRow> for Picture {
    fn from(row: PictureRow) -> Self {
        Self {
            id: row.id,
            page: row.page,
            url: row.url,
            alt_en: row.alt_en.unwrap_or_default(),
            alt_ar: row.alt_ar.unwrap_or_default(),
            display_order: row.display_order,
        }
    }
}
