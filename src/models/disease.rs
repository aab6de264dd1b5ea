//! # مدل بیماری
//!
//! بیماری‌ها به عضو بدن (`body_part`) و از طریق جدول ارتباط به سرویس‌ها وصلن.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::utils::sort_key;
use crate::validation::Keyword;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: i64,

    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,

    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ar: String,

    /// مثلا "heart" یا "knee"
    #[serde(default)]
    pub body_part: Option<String>,
}

impl Disease {
    /// `LOWER(TRIM(name_en)) ASC, id ASC`
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        sort_key(&a.name_en)
            .cmp(&sort_key(&b.name_en))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseFilter {
    pub service_id: Option<i64>,
    pub body_part: Option<String>,
    pub keyword: Option<Keyword>,
}

impl DiseaseFilter {
    #[must_use]
    pub fn matches_fields(&self, disease: &Disease) -> bool {
        if let Some(part) = &self.body_part {
            if disease.body_part.as_deref() != Some(part.as_str()) {
                return false;
            }
        }

        self.keyword
            .as_ref()
            .map_or(true, |kw| kw.matches_any(&[disease.name_en.as_str(), disease.name_ar.as_str()]))
    }
}
