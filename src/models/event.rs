//! # مدل رویداد
//!
//! تاریخ رویداد به صورت `NaiveDate` نگه داشته میشه و با فرمت ISO
//! (`YYYY-MM-DD`) serialize میشه.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// رویداد یا خبر بیمارستان
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,

    pub title_en: String,
    #[serde(default)]
    pub title_ar: String,

    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ar: String,

    pub date: NaiveDate,

    pub slug: String,

    #[serde(default)]
    pub image: Option<String>,
}

impl Event {
    /// جدیدترین اول: `event_date DESC, id DESC`
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
    }
}

/// parse کردن تاریخ ذخیره‌شده
///
/// ستون‌های DATETIME هم قبولن؛ فقط بخش تاریخ برداشته میشه.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// فیلتر لیست رویدادها
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// حداکثر تعداد (None یعنی همه)
    pub limit: Option<u32>,
}
