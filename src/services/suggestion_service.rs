//! # پیشنهاد جستجو (autocomplete)
//!
//! پزشکان بر اساس نام و سرویس‌ها بر اساس عنوان، بدون تکرار و حداکثر به
//! تعداد `limit`.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::Catalog,
    error::Result,
    models::{DoctorFilter, ServiceFilter, Suggestion, SuggestionKind, SuggestionParams},
    utils::{localized, truncate},
};

use super::Service;

/// تعداد پیش‌فرض پیشنهادها
pub const DEFAULT_SUGGESTIONS: u32 = 10;

/// حداکثر طول متن نمایشی
const MAX_LABEL_CHARS: usize = 80;

#[derive(Clone)]
pub struct SuggestionService {
    catalog: Arc<dyn Catalog>,
}

impl Service for SuggestionService {}

impl SuggestionService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// پیشنهادها: اول پزشکان، بعد سرویس‌ها
    #[instrument(skip(self), fields(keyword = %params.keyword))]
    pub async fn suggest(&self, params: SuggestionParams) -> Result<Vec<Suggestion>> {
        let limit = params.limit.unwrap_or(DEFAULT_SUGGESTIONS) as usize;
        let lang = params.lang;

        let doctors = self
            .catalog
            .doctors(&DoctorFilter {
                keyword_name: Some(params.keyword.clone()),
                ..DoctorFilter::default()
            })
            .await?;

        let services = self
            .catalog
            .medical_services(&ServiceFilter {
                keyword: Some(params.keyword.clone()),
                ..ServiceFilter::default()
            })
            .await?;

        let doctor_suggestions = doctors.into_iter().map(|d| Suggestion {
            kind: SuggestionKind::Doctor,
            label: truncate(localized(&d.name_en, &d.name_ar, lang), MAX_LABEL_CHARS),
            target: d.id.padded(),
        });

        // کلمه باید در عنوان باشه، نه فقط توضیحات
        let service_suggestions = services
            .into_iter()
            .filter(|s| {
                params
                    .keyword
                    .matches_any(&[s.title_en.as_str(), s.title_ar.as_str()])
            })
            .map(|s| Suggestion {
                kind: SuggestionKind::Service,
                label: truncate(localized(&s.title_en, &s.title_ar, lang), MAX_LABEL_CHARS),
                target: s.slug(lang).to_string(),
            });

        let mut seen = HashSet::new();
        let suggestions: Vec<Suggestion> = doctor_suggestions
            .chain(service_suggestions)
            .filter(|s| seen.insert((s.kind, s.target.clone())))
            .take(limit)
            .collect();

        debug!(count = suggestions.len(), "Built suggestions");
        Ok(suggestions)
    }
}
