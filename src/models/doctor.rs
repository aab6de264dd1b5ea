//! # مدل پزشک
//!
//! Entity پزشک، فیلتر جستجو و ترتیب نمایش

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{flag_string, DoctorId};
use crate::utils::sort_key;
use crate::validation::Keyword;

// =====================================
// Doctor Entity
// =====================================
/// پزشک
///
/// فیلدهای متنی در snapshot ممکنه نباشن، پس `#[serde(default)]` دارن.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,

    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,

    #[serde(default)]
    pub bio_en: String,
    #[serde(default)]
    pub bio_ar: String,

    #[serde(default)]
    pub specialty_en: String,
    #[serde(default)]
    pub specialty_ar: String,

    /// رئیس بخش - روی سیم به صورت "0"/"1"
    #[serde(with = "flag_string", default)]
    pub head_of_dep: bool,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub department_id: Option<i64>,
}

impl Doctor {
    /// ترتیب نمایش: رئیس بخش اول، بعد نام انگلیسی، بعد شناسه
    ///
    /// همون ترتیب `ORDER BY` در SQL:
    /// `head_of_dep DESC, LOWER(TRIM(name_en)) ASC, id ASC`
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        b.head_of_dep
            .cmp(&a.head_of_dep)
            .then_with(|| sort_key(&a.name_en).cmp(&sort_key(&b.name_en)))
            .then_with(|| a.id.cmp(&b.id))
    }
}

// =====================================
// Filter
// =====================================
/// فیلترهای لیست پزشکان
///
/// فیلترهای ارتباطی (`service_id` و `disease_id`) به جدول ارتباط نیاز دارن
/// و در catalog اعمال میشن؛ بقیه رو `matches_fields` چک میکنه.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub service_id: Option<i64>,
    pub disease_id: Option<i64>,
    pub keyword_name: Option<Keyword>,
    pub keyword_general: Option<Keyword>,
    pub head_of_dep: Option<bool>,
}

impl DoctorFilter {
    /// تطبیق فیلدهای خود پزشک (بدون ارتباط‌ها)
    #[must_use]
    pub fn matches_fields(&self, doctor: &Doctor) -> bool {
        if let Some(head) = self.head_of_dep {
            if doctor.head_of_dep != head {
                return false;
            }
        }

        if let Some(kw) = &self.keyword_name {
            if !kw.matches_any(&[doctor.name_en.as_str(), doctor.name_ar.as_str()]) {
                return false;
            }
        }

        if let Some(kw) = &self.keyword_general {
            let fields = [
                doctor.name_en.as_str(),
                doctor.name_ar.as_str(),
                doctor.specialty_en.as_str(),
                doctor.specialty_ar.as_str(),
                doctor.bio_en.as_str(),
                doctor.bio_ar.as_str(),
            ];
            if !kw.matches_any(&fields) {
                return false;
            }
        }

        true
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::parse_keyword;

    fn doctor(id: u32, name: &str, head: bool) -> Doctor {
        Doctor {
            id: DoctorId::from_numeric(i64::from(id)).unwrap(),
            name_en: name.to_string(),
            name_ar: String::new(),
            bio_en: String::new(),
            bio_ar: String::new(),
            specialty_en: "Cardiology".to_string(),
            specialty_ar: String::new(),
            head_of_dep: head,
            image: None,
            department_id: None,
        }
    }

    #[test]
    fn test_head_of_department_sorts_first() {
        let mut list = vec![
            doctor(1, "Zaid", false),
            doctor(2, "amal", false),
            doctor(3, "Yusuf", true),
        ];
        list.sort_by(Doctor::display_cmp);
        let names: Vec<_> = list.iter().map(|d| d.name_en.as_str()).collect();
        assert_eq!(names, ["Yusuf", "amal", "Zaid"]);
    }

    #[test]
    fn test_snapshot_record_shape() {
        let json = r#"{"id":"00007","name_en":"Sara Ali","head_of_dep":"1"}"#;
        let d: Doctor = serde_json::from_str(json).unwrap();
        assert_eq!(d.id.value(), 7);
        assert!(d.head_of_dep);

        let out = serde_json::to_value(&d).unwrap();
        assert_eq!(out["id"], "00007");
        assert_eq!(out["head_of_dep"], "1");
    }

    #[test]
    fn test_filter_fields() {
        let d = doctor(1, "Omar Haddad", true);

        let by_name = DoctorFilter {
            keyword_name: parse_keyword("keyword_name", Some("hadd")).unwrap(),
            ..DoctorFilter::default()
        };
        assert!(by_name.matches_fields(&d));

        let general = DoctorFilter {
            keyword_general: parse_keyword("keyword_general", Some("cardio")).unwrap(),
            head_of_dep: Some(false),
            ..DoctorFilter::default()
        };
        assert!(!general.matches_fields(&d));
    }
}
