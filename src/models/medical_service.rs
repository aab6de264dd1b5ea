//! # مدل سرویس پزشکی

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::validation::{Keyword, Lang};

/// سرویس (بخش درمانی) بیمارستان
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalService {
    pub id: i64,

    pub title_en: String,
    #[serde(default)]
    pub title_ar: String,

    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ar: String,

    /// slug هر زبان جداست
    pub slug_en: String,
    #[serde(default)]
    pub slug_ar: String,

    #[serde(default)]
    pub department_id: Option<i64>,

    #[serde(default)]
    pub display_order: i64,

    #[serde(default)]
    pub icon: Option<String>,
}

impl MedicalService {
    /// ترتیب نمایش: `display_order ASC, id ASC`
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.id.cmp(&b.id))
    }

    /// آیا این slug (به هر زبانی) مال این سرویسه؟
    #[must_use]
    pub fn has_slug(&self, slug: &str) -> bool {
        self.slug_en == slug || (!self.slug_ar.is_empty() && self.slug_ar == slug)
    }

    /// slug زبان خواسته شده، با برگشت به انگلیسی
    #[must_use]
    pub fn slug(&self, lang: Lang) -> &str {
        crate::utils::localized(&self.slug_en, &self.slug_ar, lang)
    }
}

/// فیلترهای لیست سرویس‌ها
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub disease_id: Option<i64>,
    pub department_id: Option<i64>,
    pub keyword: Option<Keyword>,
}

impl ServiceFilter {
    /// تطبیق فیلدهای خود سرویس (بیماری در catalog چک میشه)
    #[must_use]
    pub fn matches_fields(&self, service: &MedicalService) -> bool {
        if let Some(dep) = self.department_id {
            if service.department_id != Some(dep) {
                return false;
            }
        }

        match &self.keyword {
            Some(kw) => kw.matches_any(&[
                service.title_en.as_str(),
                service.title_ar.as_str(),
                service.description_en.as_str(),
                service.description_ar.as_str(),
            ]),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lookup_both_languages() {
        let s: MedicalService = serde_json::from_str(
            r#"{"id":1,"title_en":"Cardiology","slug_en":"cardiology","slug_ar":"القلب"}"#,
        )
        .unwrap();
        assert!(s.has_slug("cardiology"));
        assert!(s.has_slug("القلب"));
        assert!(!s.has_slug(""));
        assert_eq!(s.slug(Lang::Ar), "القلب");
    }
}
