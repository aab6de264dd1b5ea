//! # لایه اعتبارسنجی (Validation)
//!
//! هر چیزی که از query string میاد اینجا parse و محدود میشه، قبل از اینکه
//! به دیتابیس یا snapshot برسه. خروجی یا یک مقدار typed هست یا یک
//! `ValidationError` که به 400 تبدیل میشه (نه 500).
//!
//! ## مفاهیم Rust:
//! - **Newtype**: `Keyword` متن خام و الگوی LIKE رو کنار هم نگه میداره
//! - **Lazy Regex**: الگوها یک بار کامپایل میشن

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =====================================
// Constants
// =====================================
/// حداکثر طول کلمه جستجو (بر حسب کاراکتر)
pub const MAX_KEYWORD_CHARS: usize = 100;

/// حداکثر طول slug
pub const MAX_SLUG_CHARS: usize = 150;

/// حداکثر تعداد آیتم در لیست‌های محدودشده
pub const MAX_LIMIT: u32 = 100;

/// کلید صفحه: حروف کوچک، عدد، خط تیره و زیرخط
pub static VALID_PAGE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_-]{1,50}$").expect("Invalid regex pattern")
});

// =====================================
// Primitive Validators
// =====================================
/// تبدیل شناسه عددی به عدد صحیح مثبت
///
/// صفر، منفی، اعشاری، غیرعددی، خالی و overflow همه `None` میدن.
/// صفرهای اول مجازن، پس `"00009"` همون `9` هست.
///
/// ```rust
/// use hospital_catalog::validation::validate_id;
///
/// assert_eq!(validate_id("42"), Some(42));
/// assert_eq!(validate_id("00009"), Some(9));
/// assert_eq!(validate_id("0"), None);
/// assert_eq!(validate_id("abc"), None);
/// ```
#[must_use]
pub fn validate_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<i64>().ok().filter(|id| *id > 0)
}

/// escape کردن متاکاراکترهای LIKE
///
/// backslash اول escape میشه تا escape‌های بعدی دوباره escape نشن.
///
/// ```rust
/// use hospital_catalog::validation::sanitize_like_pattern;
///
/// assert_eq!(sanitize_like_pattern("a%b"), r"a\%b");
/// assert_eq!(sanitize_like_pattern(r"x_\y"), r"x\_\\y");
/// ```
#[must_use]
pub fn sanitize_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =====================================
// Keyword
// =====================================
/// کلمه جستجوی اعتبارسنجی‌شده
///
/// متن خام برای تطبیق در حافظه (snapshot) و الگوی escape‌شده برای SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword(String);

impl Keyword {
    /// متن خام (trim شده)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// الگوی `%...%` آماده برای `LIKE ? ESCAPE '\'`
    #[must_use]
    pub fn like_pattern(&self) -> String {
        format!("%{}%", sanitize_like_pattern(&self.0))
    }

    /// تطبیق زیررشته بدون حساسیت به حروف بزرگ/کوچک
    ///
    /// همون رفتاری که LIKE در MySQL (collation پیش‌فرض) داره.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// تطبیق با هر کدوم از فیلدها
    #[must_use]
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.matches(f))
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =====================================
// Field Parsers
// =====================================
// همه این توابع برای ورودی نبود یا خالی `Ok(None)` برمیگردونن.

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// parse کردن شناسه اختیاری
pub fn parse_id(field: &str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match present(raw) {
        None => Ok(None),
        Some(value) => validate_id(value)
            .map(Some)
            .ok_or_else(|| ValidationError::new(field, "must be a positive integer")),
    }
}

/// parse کردن کلمه جستجو
///
/// فقط دو طرف trim میشه؛ فاصله‌های وسط دست نمیخورن تا تطبیق همون
/// زیررشته‌ای باشه که کاربر نوشته. طول بیش از حد رد میشه.
pub fn parse_keyword(field: &str, raw: Option<&str>) -> Result<Option<Keyword>, ValidationError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    if value.chars().count() > MAX_KEYWORD_CHARS {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_KEYWORD_CHARS} characters"),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(field, "contains control characters"));
    }

    Ok(Some(Keyword(value.to_string())))
}

/// parse کردن flag بولی - فقط `"true"` و `"false"`
pub fn parse_flag(field: &str, raw: Option<&str>) -> Result<Option<bool>, ValidationError> {
    match present(raw) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(ValidationError::new(field, "must be \"true\" or \"false\"")),
    }
}

/// parse کردن کلید منطقی صفحه (مثلا `about`)
pub fn parse_page_key(field: &str, raw: Option<&str>) -> Result<String, ValidationError> {
    let value = present(raw).ok_or_else(|| ValidationError::new(field, "is required"))?;
    if VALID_PAGE_KEY.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::new(field, "must match [a-z0-9_-]{1,50}"))
    }
}

/// parse کردن slug مسیر
///
/// slug عربی هم مجازه، فقط `/` و کاراکتر کنترلی نه.
pub fn parse_slug(field: &str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    let len = value.chars().count();
    if len == 0 || len > MAX_SLUG_CHARS {
        return Err(ValidationError::new(
            field,
            format!("must be 1-{MAX_SLUG_CHARS} characters"),
        ));
    }
    if value.chars().any(|c| c == '/' || c.is_control()) {
        return Err(ValidationError::new(field, "contains invalid characters"));
    }
    Ok(value.to_string())
}

/// parse کردن سقف تعداد
pub fn parse_limit(field: &str, raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match parse_id(field, raw)? {
        None => Ok(None),
        Some(n) => Ok(Some(u32::try_from(n).unwrap_or(MAX_LIMIT).min(MAX_LIMIT))),
    }
}

// =====================================
// Language
// =====================================
/// زبان خروجی‌های محلی‌شده
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

/// parse کردن زبان - پیش‌فرض انگلیسی
pub fn parse_lang(field: &str, raw: Option<&str>) -> Result<Lang, ValidationError> {
    match present(raw) {
        None | Some("en") => Ok(Lang::En),
        Some("ar") => Ok(Lang::Ar),
        Some(_) => Err(ValidationError::new(field, "must be \"en\" or \"ar\"")),
    }
}

// =====================================
// Error Collection
// =====================================
/// جمع کردن خطاهای چند فیلد
///
/// به جای توقف روی اولین خطا، همه فیلدهای خراب گزارش میشن.
#[derive(Debug, Default)]
pub struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// گرفتن مقدار یا ثبت خطا
    pub fn take<T: Default>(&mut self, result: Result<T, ValidationError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.errors.push(err);
                T::default()
            }
        }
    }

    /// پایان: اگه خطایی بود `AppError::Validation`
    pub fn finish<T>(self, value: T) -> crate::error::Result<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(crate::error::AppError::Validation(self.errors))
        }
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("1"), Some(1));
        assert_eq!(validate_id(" 17 "), Some(17));
        assert_eq!(validate_id("+5"), Some(5));
        assert_eq!(validate_id("00009"), Some(9));

        for bad in ["", "0", "-1", "1.5", "abc", "1e3", "NaN", "Infinity", "99999999999999999999"] {
            assert_eq!(validate_id(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_sanitize_like_pattern() {
        assert_eq!(sanitize_like_pattern("plain"), "plain");
        assert_eq!(sanitize_like_pattern("a%b"), "a\\%b");
        assert_eq!(sanitize_like_pattern("a_b"), "a\\_b");
        assert_eq!(sanitize_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(sanitize_like_pattern("%_\\"), "\\%\\_\\\\");
    }

    #[test]
    fn test_keyword_parsing() {
        let kw = parse_keyword("keyword_name", Some("  Dr Ahmad ")).unwrap().unwrap();
        assert_eq!(kw.as_str(), "Dr Ahmad");
        assert_eq!(kw.like_pattern(), "%Dr Ahmad%");

        assert_eq!(parse_keyword("k", Some("   ")).unwrap(), None);
        assert_eq!(parse_keyword("k", None).unwrap(), None);

        let long = "x".repeat(MAX_KEYWORD_CHARS + 1);
        assert!(parse_keyword("k", Some(&long)).is_err());
    }

    #[test]
    fn test_keyword_matching_is_literal() {
        let kw = parse_keyword("k", Some("a%b")).unwrap().unwrap();
        assert!(kw.matches("xxA%Byy"));
        assert!(!kw.matches("aXb"));
        assert_eq!(kw.like_pattern(), "%a\\%b%");
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let kw = parse_keyword("k", Some(" a  b ")).unwrap().unwrap();
        assert_eq!(kw.as_str(), "a  b");
        assert!(kw.matches("xa  by"));
        assert!(!kw.matches("xa by"));
        assert_eq!(kw.like_pattern(), "%a  b%");
    }

    #[test]
    fn test_arabic_keyword() {
        let kw = parse_keyword("k", Some("أحمد")).unwrap().unwrap();
        assert!(kw.matches("د. أحمد علي"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("head_of_dep", Some("true")).unwrap(), Some(true));
        assert_eq!(parse_flag("head_of_dep", Some("false")).unwrap(), Some(false));
        assert_eq!(parse_flag("head_of_dep", None).unwrap(), None);
        assert!(parse_flag("head_of_dep", Some("1")).is_err());
        assert!(parse_flag("head_of_dep", Some("TRUE")).is_err());
    }

    #[test]
    fn test_parse_id_reports_field() {
        let err = parse_id("service_id", Some("abc")).unwrap_err();
        assert_eq!(err.field, "service_id");
    }

    #[test]
    fn test_page_key_and_slug() {
        assert_eq!(parse_page_key("page", Some("about-us")).unwrap(), "about-us");
        assert!(parse_page_key("page", Some("About")).is_err());
        assert!(parse_page_key("page", None).is_err());

        assert!(parse_slug("slug", "cardiology").is_ok());
        assert!(parse_slug("slug", "أمراض-القلب").is_ok());
        assert!(parse_slug("slug", "a/b").is_err());
        assert!(parse_slug("slug", "").is_err());
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(parse_limit("limit", Some("5")).unwrap(), Some(5));
        assert_eq!(parse_limit("limit", Some("5000")).unwrap(), Some(MAX_LIMIT));
        assert!(parse_limit("limit", Some("-2")).is_err());
    }

    #[test]
    fn test_collector_gathers_all_errors() {
        let mut c = Collector::new();
        let a = c.take(parse_id("service_id", Some("abc")));
        let b = c.take(parse_flag("head_of_dep", Some("yes")));
        assert_eq!(a, None);
        assert_eq!(b, None);

        match c.finish(()) {
            Err(crate::error::AppError::Validation(errs)) => assert_eq!(errs.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
