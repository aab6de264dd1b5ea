//! # Catalog (Repository Pattern)
//!
//! `Catalog` تنها راه خوندن داده‌ست. سرویس‌ها فقط این trait رو میشناسن،
//! پس منبع داده (SQL، snapshot یا ترکیبشون) از دیدشون پنهانه.
//!
//! ## قرارداد ترتیب
//! همه پیاده‌سازی‌ها باید ترتیب یکسان برگردونن:
//! - پزشکان: `head_of_dep DESC, LOWER(TRIM(name_en)) ASC, id ASC`
//! - سرویس‌ها، بلوک‌های متن و تصاویر: `display_order ASC, id ASC`
//! - بیماری‌ها: `LOWER(TRIM(name_en)) ASC, id ASC`
//! - رویدادها: `event_date DESC, id DESC`

use async_trait::async_trait;

use super::rows::{DiseaseRow, DoctorRow, EventRow, MedicalServiceRow, PictureRow, TextContentRow};
use super::{Database, SqlBuilder, SqlParam};
use crate::error::DbError;
use crate::models::{
    Disease, DiseaseFilter, Doctor, DoctorFilter, DoctorId, Event, EventFilter, MedicalService,
    Picture, ServiceFilter, TextContent,
};
use crate::validation::Keyword;

type DbResult<T> = std::result::Result<T, DbError>;

// =====================================
// Catalog Trait
// =====================================
/// خوندن entity‌های catalog بیمارستان
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn doctors(&self, filter: &DoctorFilter) -> DbResult<Vec<Doctor>>;

    async fn doctor_by_id(&self, id: DoctorId) -> DbResult<Option<Doctor>>;

    async fn medical_services(&self, filter: &ServiceFilter) -> DbResult<Vec<MedicalService>>;

    /// جستجو با slug انگلیسی یا عربی
    async fn medical_service_by_slug(&self, slug: &str) -> DbResult<Option<MedicalService>>;

    async fn medical_service_by_id(&self, id: i64) -> DbResult<Option<MedicalService>>;

    async fn diseases(&self, filter: &DiseaseFilter) -> DbResult<Vec<Disease>>;

    async fn events(&self, filter: &EventFilter) -> DbResult<Vec<Event>>;

    async fn event_by_slug(&self, slug: &str) -> DbResult<Option<Event>>;

    /// بلوک‌های متنی یک صفحه
    async fn text_blocks(&self, page: &str) -> DbResult<Vec<TextContent>>;

    /// تصاویر یک صفحه
    async fn pictures(&self, page: &str) -> DbResult<Vec<Picture>>;
}

// =====================================
// SQL Statements
// =====================================
const DOCTOR_SELECT: &str = "SELECT d.id, d.name_en, d.name_ar, d.bio_en, d.bio_ar, \
     d.specialty_en, d.specialty_ar, COALESCE(d.head_of_dep, '0') AS head_of_dep, \
     d.image, d.department_id FROM doctors d";

const DOCTOR_ORDER: &str = "COALESCE(d.head_of_dep, '0') DESC, LOWER(TRIM(d.name_en)) ASC, d.id ASC";

const SERVICE_SELECT: &str = "SELECT s.id, s.title_en, s.title_ar, s.description_en, \
     s.description_ar, s.slug_en, s.slug_ar, s.department_id, \
     COALESCE(s.display_order, 0) AS display_order, s.icon FROM medical_services s";

const SERVICE_ORDER: &str = "COALESCE(s.display_order, 0) ASC, s.id ASC";

const DISEASE_SELECT: &str = "SELECT x.id, x.name_en, x.name_ar, x.description_en, \
     x.description_ar, x.body_part FROM diseases x";

const DISEASE_ORDER: &str = "LOWER(TRIM(x.name_en)) ASC, x.id ASC";

const EVENT_SELECT: &str = "SELECT e.id, e.title_en, e.title_ar, e.description_en, \
     e.description_ar, CAST(e.event_date AS CHAR) AS event_date, e.slug, e.image FROM events e";

const EVENT_ORDER: &str = "e.event_date DESC, e.id DESC";

const TEXT_SELECT: &str = "SELECT t.id, t.page, t.title_en, t.title_ar, t.content_en, \
     t.content_ar, COALESCE(t.display_order, 0) AS display_order FROM text_content t";

const PICTURE_SELECT: &str = "SELECT p.id, p.page, p.url, p.alt_en, p.alt_ar, \
     COALESCE(p.display_order, 0) AS display_order FROM pictures p";

// =====================================
// SQL Catalog
// =====================================
/// Catalog روی دیتابیس زنده
#[derive(Debug, Clone)]
pub struct SqlCatalog {
    db: Database,
}

impl SqlCatalog {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// شرط LIKE روی چند ستون، با OR
    fn keyword_condition(&self, columns: &[&str]) -> String {
        let backend = self.db.backend();
        let parts: Vec<String> = columns.iter().map(|c| backend.like(c)).collect();
        format!("({})", parts.join(" OR "))
    }

    fn keyword_params(keyword: &Keyword, columns: usize) -> Vec<SqlParam> {
        vec![SqlParam::Text(keyword.like_pattern()); columns]
    }
}

#[async_trait]
impl Catalog for SqlCatalog {
    async fn doctors(&self, filter: &DoctorFilter) -> DbResult<Vec<Doctor>> {
        const NAME_COLUMNS: [&str; 2] = ["d.name_en", "d.name_ar"];
        const GENERAL_COLUMNS: [&str; 6] = [
            "d.name_en",
            "d.name_ar",
            "d.specialty_en",
            "d.specialty_ar",
            "d.bio_en",
            "d.bio_ar",
        ];

        let (sql, params) = SqlBuilder::new(DOCTOR_SELECT)
            .filter_opt(
                filter.service_id,
                "d.id IN (SELECT ds.doctor_id FROM doctor_services ds WHERE ds.service_id = ?)",
                |id| vec![SqlParam::Int(id)],
            )
            .filter_opt(
                filter.disease_id,
                "d.id IN (SELECT ds.doctor_id FROM doctor_services ds \
                 JOIN service_diseases sd ON sd.service_id = ds.service_id \
                 WHERE sd.disease_id = ?)",
                |id| vec![SqlParam::Int(id)],
            )
            .filter_opt(
                filter.keyword_name.as_ref(),
                &self.keyword_condition(&NAME_COLUMNS),
                |kw| Self::keyword_params(kw, NAME_COLUMNS.len()),
            )
            .filter_opt(
                filter.keyword_general.as_ref(),
                &self.keyword_condition(&GENERAL_COLUMNS),
                |kw| Self::keyword_params(kw, GENERAL_COLUMNS.len()),
            )
            .filter_opt(
                filter.head_of_dep,
                "COALESCE(d.head_of_dep, '0') = ?",
                |head| vec![SqlParam::from(if head { "1" } else { "0" })],
            )
            .order_by(DOCTOR_ORDER)
            .build();

        self.db
            .query::<DoctorRow>(&sql, &params)
            .await?
            .into_iter()
            .map(Doctor::try_from)
            .collect()
    }

    async fn doctor_by_id(&self, id: DoctorId) -> DbResult<Option<Doctor>> {
        let (sql, params) = SqlBuilder::new(DOCTOR_SELECT)
            .filter("d.id = ?", [SqlParam::Int(id.value())])
            .build();

        self.db
            .query_one::<DoctorRow>(&sql, &params)
            .await?
            .map(Doctor::try_from)
            .transpose()
    }

    async fn medical_services(&self, filter: &ServiceFilter) -> DbResult<Vec<MedicalService>> {
        const KEYWORD_COLUMNS: [&str; 4] = [
            "s.title_en",
            "s.title_ar",
            "s.description_en",
            "s.description_ar",
        ];

        let (sql, params) = SqlBuilder::new(SERVICE_SELECT)
            .filter_opt(
                filter.disease_id,
                "s.id IN (SELECT sd.service_id FROM service_diseases sd WHERE sd.disease_id = ?)",
                |id| vec![SqlParam::Int(id)],
            )
            .filter_opt(filter.department_id, "s.department_id = ?", |id| {
                vec![SqlParam::Int(id)]
            })
            .filter_opt(
                filter.keyword.as_ref(),
                &self.keyword_condition(&KEYWORD_COLUMNS),
                |kw| Self::keyword_params(kw, KEYWORD_COLUMNS.len()),
            )
            .order_by(SERVICE_ORDER)
            .build();

        let rows = self.db.query::<MedicalServiceRow>(&sql, &params).await?;
        Ok(rows.into_iter().map(MedicalService::from).collect())
    }

    async fn medical_service_by_slug(&self, slug: &str) -> DbResult<Option<MedicalService>> {
        let (sql, params) = SqlBuilder::new(SERVICE_SELECT)
            .filter(
                "(s.slug_en = ? OR s.slug_ar = ?)",
                [SqlParam::from(slug), SqlParam::from(slug)],
            )
            .order_by(SERVICE_ORDER)
            .limit(Some(1))
            .build();

        let row = self.db.query_one::<MedicalServiceRow>(&sql, &params).await?;
        Ok(row.map(MedicalService::from))
    }

    async fn medical_service_by_id(&self, id: i64) -> DbResult<Option<MedicalService>> {
        let (sql, params) = SqlBuilder::new(SERVICE_SELECT)
            .filter("s.id = ?", [SqlParam::Int(id)])
            .build();

        let row = self.db.query_one::<MedicalServiceRow>(&sql, &params).await?;
        Ok(row.map(MedicalService::from))
    }

    async fn diseases(&self, filter: &DiseaseFilter) -> DbResult<Vec<Disease>> {
        const KEYWORD_COLUMNS: [&str; 2] = ["x.name_en", "x.name_ar"];

        let (sql, params) = SqlBuilder::new(DISEASE_SELECT)
            .filter_opt(
                filter.service_id,
                "x.id IN (SELECT sd.disease_id FROM service_diseases sd WHERE sd.service_id = ?)",
                |id| vec![SqlParam::Int(id)],
            )
            .filter_opt(filter.body_part.as_deref(), "x.body_part = ?", |part| {
                vec![SqlParam::from(part)]
            })
            .filter_opt(
                filter.keyword.as_ref(),
                &self.keyword_condition(&KEYWORD_COLUMNS),
                |kw| Self::keyword_params(kw, KEYWORD_COLUMNS.len()),
            )
            .order_by(DISEASE_ORDER)
            .build();

        let rows = self.db.query::<DiseaseRow>(&sql, &params).await?;
        Ok(rows.into_iter().map(Disease::from).collect())
    }

    async fn events(&self, filter: &EventFilter) -> DbResult<Vec<Event>> {
        let (sql, params) = SqlBuilder::new(EVENT_SELECT)
            .order_by(EVENT_ORDER)
            .limit(filter.limit)
            .build();

        self.db
            .query::<EventRow>(&sql, &params)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    async fn event_by_slug(&self, slug: &str) -> DbResult<Option<Event>> {
        let (sql, params) = SqlBuilder::new(EVENT_SELECT)
            .filter("e.slug = ?", [SqlParam::from(slug)])
            .order_by(EVENT_ORDER)
            .limit(Some(1))
            .build();

        self.db
            .query_one::<EventRow>(&sql, &params)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn text_blocks(&self, page: &str) -> DbResult<Vec<TextContent>> {
        let (sql, params) = SqlBuilder::new(TEXT_SELECT)
            .filter("t.page = ?", [SqlParam::from(page)])
            .order_by("COALESCE(t.display_order, 0) ASC, t.id ASC")
            .build();

        let rows = self.db.query::<TextContentRow>(&sql, &params).await?;
        Ok(rows.into_iter().map(TextContent::from).collect())
    }

    async fn pictures(&self, page: &str) -> DbResult<Vec<Picture>> {
        let (sql, params) = SqlBuilder::new(PICTURE_SELECT)
            .filter("p.page = ?", [SqlParam::from(page)])
            .order_by("COALESCE(p.display_order, 0) ASC, p.id ASC")
            .build();

        let rows = self.db.query::<PictureRow>(&sql, &params).await?;
        Ok(rows.into_iter().map(Picture::from).collect())
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SnapshotCatalog;
    use crate::validation::parse_keyword;
    use pretty_assertions::assert_eq;

    async fn seeded() -> (SqlCatalog, SnapshotCatalog) {
        let snapshot = SnapshotCatalog::bundled().unwrap();
        let db = Database::in_memory().await.unwrap();
        db.seed(snapshot.data()).await.unwrap();
        (SqlCatalog::new(db), snapshot)
    }

    fn keyword(raw: &str) -> Option<Keyword> {
        parse_keyword("keyword", Some(raw)).unwrap()
    }

    #[tokio::test]
    async fn test_doctor_listing_matches_snapshot() {
        let (sql, snapshot) = seeded().await;

        let filters = [
            DoctorFilter::default(),
            DoctorFilter {
                service_id: Some(1),
                ..DoctorFilter::default()
            },
            DoctorFilter {
                disease_id: Some(1),
                ..DoctorFilter::default()
            },
            DoctorFilter {
                keyword_name: keyword("al"),
                ..DoctorFilter::default()
            },
            DoctorFilter {
                keyword_general: keyword("cardio"),
                head_of_dep: Some(false),
                ..DoctorFilter::default()
            },
            DoctorFilter {
                head_of_dep: Some(true),
                ..DoctorFilter::default()
            },
        ];

        for filter in &filters {
            let live = sql.doctors(filter).await.unwrap();
            let offline = snapshot.find_doctors(filter);
            assert_eq!(live, offline, "filter: {filter:?}");
        }
    }

    #[tokio::test]
    async fn test_service_and_disease_listing_matches_snapshot() {
        let (sql, snapshot) = seeded().await;

        for filter in [
            ServiceFilter::default(),
            ServiceFilter {
                disease_id: Some(1),
                ..ServiceFilter::default()
            },
            ServiceFilter {
                keyword: keyword("surgery"),
                ..ServiceFilter::default()
            },
        ] {
            assert_eq!(
                sql.medical_services(&filter).await.unwrap(),
                snapshot.find_medical_services(&filter)
            );
        }

        for filter in [
            DiseaseFilter::default(),
            DiseaseFilter {
                service_id: Some(1),
                ..DiseaseFilter::default()
            },
            DiseaseFilter {
                body_part: Some("heart".to_string()),
                ..DiseaseFilter::default()
            },
        ] {
            assert_eq!(sql.diseases(&filter).await.unwrap(), snapshot.find_diseases(&filter));
        }
    }

    #[tokio::test]
    async fn test_events_and_content_match_snapshot() {
        let (sql, snapshot) = seeded().await;

        let filter = EventFilter { limit: Some(2) };
        let live = sql.events(&filter).await.unwrap();
        assert_eq!(live.len(), 2);
        assert_eq!(live, snapshot.find_events(&filter));
        assert_eq!(
            sql.events(&EventFilter::default()).await.unwrap(),
            snapshot.find_events(&EventFilter::default())
        );

        assert_eq!(sql.text_blocks("about").await.unwrap(), snapshot.find_text_blocks("about"));
        assert_eq!(sql.pictures("about").await.unwrap(), snapshot.find_pictures("about"));
    }

    #[tokio::test]
    async fn test_lookups() {
        let (sql, snapshot) = seeded().await;

        let first = &snapshot.data().doctors[0];
        assert_eq!(sql.doctor_by_id(first.id).await.unwrap().as_ref(), Some(first));

        let service = &snapshot.data().medical_services[0];
        let by_slug = sql.medical_service_by_slug(&service.slug_en).await.unwrap();
        assert_eq!(by_slug.as_ref(), Some(service));
        let by_id = sql.medical_service_by_id(service.id).await.unwrap();
        assert_eq!(by_id.as_ref(), Some(service));

        assert_eq!(sql.medical_service_by_slug("no-such-slug").await.unwrap(), None);
        assert_eq!(sql.event_by_slug("no-such-event").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let db = Database::in_memory().await.unwrap();
        db.execute_script(
            "INSERT INTO doctors (id, name_en, head_of_dep) VALUES (1, 'Noura a%b', '0');
             INSERT INTO doctors (id, name_en, head_of_dep) VALUES (2, 'Naif axxb', '0');
             INSERT INTO doctors (id, name_en, head_of_dep) VALUES (3, 'Rami a_b', '0')",
        )
        .await
        .unwrap();
        let sql = SqlCatalog::new(db);

        let percent = DoctorFilter {
            keyword_name: keyword("a%b"),
            ..DoctorFilter::default()
        };
        let found = sql.doctors(&percent).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name_en, "Noura a%b");

        let underscore = DoctorFilter {
            keyword_name: keyword("a_b"),
            ..DoctorFilter::default()
        };
        let found = sql.doctors(&underscore).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name_en, "Rami a_b");
    }
}
