//! # ماژول توابع کمکی (Utilities)
//!
//! توابع کوچک فرمت‌دهی که بین models، validation و services مشترکن.

use crate::validation::Lang;

// =====================================
// Constants
// =====================================
/// طول شناسه پزشک در snapshot (مثلا "00009")
pub const DOCTOR_ID_WIDTH: usize = 5;

// =====================================
// Identifier Formatting
// =====================================
/// تبدیل شناسه عددی به رشته با صفرهای اول
///
/// ```rust
/// use hospital_catalog::utils::pad_id;
///
/// assert_eq!(pad_id(9), "00009");
/// assert_eq!(pad_id(123456), "123456");
/// ```
#[must_use]
pub fn pad_id(id: u32) -> String {
    format!("{:0width$}", id, width = DOCTOR_ID_WIDTH)
}

// =====================================
// Localisation
// =====================================
/// انتخاب متن بر اساس زبان
///
/// اگه متن عربی خالی باشه، انگلیسی نمایش داده میشه.
#[must_use]
pub fn localized<'a>(en: &'a str, ar: &'a str, lang: Lang) -> &'a str {
    match lang {
        Lang::Ar if !ar.trim().is_empty() => ar,
        _ => en,
    }
}

/// کلید مرتب‌سازی بدون حساسیت به حروف بزرگ/کوچک
#[must_use]
pub fn sort_key(text: &str) -> String {
    text.trim().to_lowercase()
}

// =====================================
// String Utilities
// =====================================
/// تمیز کردن whitespace‌های اضافی
#[must_use]
pub fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// خلاصه کردن متن طولانی (بر حسب کاراکتر، نه بایت)
///
/// ```rust
/// use hospital_catalog::utils::truncate;
///
/// assert_eq!(truncate("Hello, World!", 8), "Hello...");
/// ```
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let truncated: String = text.chars().take(keep).collect();
    format!("{}...", truncated.trim_end())
}

/// Mask کردن بخشی از متن (برای لاگ‌ها)
#[must_use]
pub fn mask_string(text: &str, visible_chars: usize) -> String {
    if text.chars().count() <= visible_chars {
        return "*".repeat(text.chars().count());
    }

    let visible: String = text.chars().take(visible_chars).collect();
    format!("{}***", visible)
}
