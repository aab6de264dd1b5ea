//! # پارامترهای query string
//!
//! همه فیلدها به صورت `Option<String>` خونده میشن تا مقدار خراب (مثلا
//! `service_id=abc`) به جای خطای deserialize، خطای اعتبارسنجی 400 با نام
//! فیلد بده. `validator` فقط سقف طول ورودی خام رو چک میکنه؛ تبدیل به
//! فیلتر با parser‌های `validation` انجام میشه.

use serde::Deserialize;
use validator::Validate;

use super::{DiseaseFilter, DoctorFilter, EventFilter, ServiceFilter};
use crate::error::{AppError, Result, ValidationError};
use crate::validation::{
    parse_flag, parse_id, parse_keyword, parse_lang, parse_limit, parse_page_key, Collector,
    Keyword, Lang,
};

// =====================================
// Doctors
// =====================================
/// `GET /api/doctors`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DoctorQuery {
    #[validate(length(max = 20, message = "Value is too long"))]
    pub service_id: Option<String>,

    #[validate(length(max = 20, message = "Value is too long"))]
    pub disease_id: Option<String>,

    #[validate(length(max = 512, message = "Keyword is too long"))]
    pub keyword_name: Option<String>,

    #[validate(length(max = 512, message = "Keyword is too long"))]
    pub keyword_general: Option<String>,

    #[validate(length(max = 10, message = "Value is too long"))]
    pub head_of_dep: Option<String>,
}

impl DoctorQuery {
    /// تبدیل به فیلتر؛ همه فیلدهای خراب با هم گزارش میشن
    pub fn into_filter(self) -> Result<DoctorFilter> {
        let mut errors = Collector::new();
        let filter = DoctorFilter {
            service_id: errors.take(parse_id("service_id", self.service_id.as_deref())),
            disease_id: errors.take(parse_id("disease_id", self.disease_id.as_deref())),
            keyword_name: errors.take(parse_keyword("keyword_name", self.keyword_name.as_deref())),
            keyword_general: errors.take(parse_keyword(
                "keyword_general",
                self.keyword_general.as_deref(),
            )),
            head_of_dep: errors.take(parse_flag("head_of_dep", self.head_of_dep.as_deref())),
        };
        errors.finish(filter)
    }
}

// =====================================
// Services
// =====================================
/// `GET /api/services`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ServiceQuery {
    #[validate(length(max = 20, message = "Value is too long"))]
    pub disease_id: Option<String>,

    #[validate(length(max = 20, message = "Value is too long"))]
    pub department_id: Option<String>,

    #[validate(length(max = 512, message = "Keyword is too long"))]
    pub keyword: Option<String>,
}

impl ServiceQuery {
    pub fn into_filter(self) -> Result<ServiceFilter> {
        let mut errors = Collector::new();
        let filter = ServiceFilter {
            disease_id: errors.take(parse_id("disease_id", self.disease_id.as_deref())),
            department_id: errors.take(parse_id("department_id", self.department_id.as_deref())),
            keyword: errors.take(parse_keyword("keyword", self.keyword.as_deref())),
        };
        errors.finish(filter)
    }
}

// =====================================
// Diseases
// =====================================
/// `GET /api/diseases`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DiseaseQuery {
    #[validate(length(max = 20, message = "Value is too long"))]
    pub service_id: Option<String>,

    #[validate(length(max = 50, message = "Body part is too long"))]
    pub body_part: Option<String>,

    #[validate(length(max = 512, message = "Keyword is too long"))]
    pub keyword: Option<String>,
}

impl DiseaseQuery {
    pub fn into_filter(self) -> Result<DiseaseFilter> {
        let mut errors = Collector::new();
        let filter = DiseaseFilter {
            service_id: errors.take(parse_id("service_id", self.service_id.as_deref())),
            body_part: errors
                .take(parse_keyword("body_part", self.body_part.as_deref()))
                .map(|part| part.as_str().to_string()),
            keyword: errors.take(parse_keyword("keyword", self.keyword.as_deref())),
        };
        errors.finish(filter)
    }
}

// =====================================
// Suggestions
// =====================================
/// `GET /api/suggestions`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SuggestionQuery {
    #[validate(length(max = 512, message = "Keyword is too long"))]
    pub keyword: Option<String>,

    #[validate(length(max = 5, message = "Value is too long"))]
    pub lang: Option<String>,

    #[validate(length(max = 10, message = "Value is too long"))]
    pub limit: Option<String>,
}

/// پارامترهای اعتبارسنجی‌شده پیشنهاد جستجو
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionParams {
    pub keyword: Keyword,
    pub lang: Lang,
    pub limit: Option<u32>,
}

impl SuggestionQuery {
    pub fn into_params(self) -> Result<SuggestionParams> {
        let mut errors = Collector::new();
        let keyword = errors.take(
            parse_keyword("keyword", self.keyword.as_deref()).and_then(|kw| {
                kw.ok_or_else(|| ValidationError::new("keyword", "is required"))
                    .map(Some)
            }),
        );
        let lang = errors.take(parse_lang("lang", self.lang.as_deref()));
        let limit = errors.take(parse_limit("limit", self.limit.as_deref()));

        let params = errors.finish((keyword, lang, limit))?;
        match params {
            (Some(keyword), lang, limit) => Ok(SuggestionParams {
                keyword,
                lang,
                limit,
            }),
            (None, ..) => Err(AppError::invalid("keyword", "is required")),
        }
    }
}

// =====================================
// Page Content
// =====================================
/// `GET /api/content`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContentQuery {
    #[validate(length(max = 64, message = "Page key is too long"))]
    pub page: Option<String>,

    #[validate(length(max = 5, message = "Value is too long"))]
    pub lang: Option<String>,
}

impl ContentQuery {
    pub fn into_params(self) -> Result<(String, Lang)> {
        let mut errors = Collector::new();
        let page = errors.take(parse_page_key("page", self.page.as_deref()));
        let lang = errors.take(parse_lang("lang", self.lang.as_deref()));
        errors.finish((page, lang))
    }
}

// =====================================
// Events
// =====================================
/// `GET /api/events`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EventQuery {
    #[validate(length(max = 10, message = "Value is too long"))]
    pub limit: Option<String>,
}

impl EventQuery {
    pub fn into_filter(self) -> Result<EventFilter> {
        let mut errors = Collector::new();
        let limit = errors.take(parse_limit("limit", self.limit.as_deref()));
        errors.finish(EventFilter { limit })
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_doctor_query_collects_all_errors() {
        let query = DoctorQuery {
            service_id: Some("abc".to_string()),
            disease_id: Some("-3".to_string()),
            head_of_dep: Some("maybe".to_string()),
            ..DoctorQuery::default()
        };
        assert_eq!(
            field_names(query.into_filter().unwrap_err()),
            ["service_id", "disease_id", "head_of_dep"]
        );
    }

    #[test]
    fn test_doctor_query_happy_path() {
        let query = DoctorQuery {
            service_id: Some(" 7 ".to_string()),
            keyword_name: Some("  omar   saleh ".to_string()),
            head_of_dep: Some("true".to_string()),
            ..DoctorQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.service_id, Some(7));
        assert_eq!(filter.keyword_name.unwrap().as_str(), "omar saleh");
        assert_eq!(filter.head_of_dep, Some(true));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let query = ServiceQuery {
            disease_id: Some(String::new()),
            keyword: Some("   ".to_string()),
            ..ServiceQuery::default()
        };
        assert_eq!(query.into_filter().unwrap(), ServiceFilter::default());
    }

    #[test]
    fn test_suggestion_keyword_is_required() {
        let err = SuggestionQuery::default().into_params().unwrap_err();
        assert_eq!(field_names(err), ["keyword"]);
    }

    #[test]
    fn test_content_query_requires_page() {
        let err = ContentQuery {
            page: None,
            lang: Some("fr".to_string()),
        }
        .into_params()
        .unwrap_err();
        assert_eq!(field_names(err), ["page", "lang"]);
    }

    #[test]
    fn test_event_limit_is_capped() {
        let filter = EventQuery {
            limit: Some("5000".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.limit, Some(crate::validation::MAX_LIMIT));
    }
}
