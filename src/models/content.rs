//! # محتوای صفحات
//!
//! بلوک‌های متنی و تصاویر عمومی که با نام منطقی صفحه (مثلا `about`)
//! کلید میخورن.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// بلوک متنی یک صفحه
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub id: i64,
    pub page: String,

    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ar: String,

    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub content_ar: String,

    #[serde(default)]
    pub display_order: i64,
}

/// تصویر مرتبط با یک صفحه
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
    pub page: String,
    pub url: String,

    #[serde(default)]
    pub alt_en: String,
    #[serde(default)]
    pub alt_ar: String,

    #[serde(default)]
    pub display_order: i64,
}

impl TextContent {
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id))
    }
}

impl Picture {
    #[must_use]
    pub fn display_cmp(a: &Self, b: &Self) -> Ordering {
        a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id))
    }
}
