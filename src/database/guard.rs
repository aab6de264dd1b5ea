//! # بررسی پارامترها قبل از اجرا
//!
//! همه مقادیر با bind به دیتابیس میرن، ولی پارامترهای رشته‌ای قبل از
//! اجرا یک بار دیگه با الگوهای شناخته‌شده تزریق SQL مقایسه میشن.
//! اگه جور دربیاد query اصلا اجرا نمیشه.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::SqlParam;
use crate::error::DbError;
use crate::utils::truncate;

/// الگوهای مشکوک (case-insensitive)
static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // UNION ... SELECT
        r"(?i)\bunion\b[\s\S]*\bselect\b",
        // کامنت‌های SQL
        r"--",
        r"/\*",
        r"\*/",
        // کامنت MySQL بعد از بستن رشته
        r"'\s*#",
        // دستور دوم بعد از ;
        r"(?i);\s*(drop|delete|insert|update|alter|create|truncate|exec|shutdown)\b",
        // OR 1=1 و AND 1=1
        r"(?i)\b(or|and)\s+(\d+)\s*=\s*\d+",
        // ' OR 'a'='a
        r"(?i)'\s*(or|and)\s+'[^']*'\s*=\s*'",
        // توابع و procedure‌های خطرناک
        r"(?i)\bexec(ute)?\s*\(",
        r"(?i)\bxp_\w+",
        r"(?i)\b(sleep|benchmark|waitfor)\s*\(",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid injection pattern"))
    .collect()
});

/// آیا این مقدار شبیه تلاش برای تزریق SQL هست؟
#[must_use]
pub fn is_suspicious(value: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|re| re.is_match(value))
}

/// بررسی همه پارامترها
///
/// فقط `Text` بررسی میشه؛ نوع‌های عددی و bool خطری ندارن.
pub fn screen_parameters(params: &[SqlParam]) -> Result<(), DbError> {
    for (index, param) in params.iter().enumerate() {
        if let SqlParam::Text(value) = param {
            if is_suspicious(value) {
                warn!(index, value = %truncate(value, 40), "Rejected suspicious query parameter");
                return Err(DbError::UnsafeParameter { index });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures_are_flagged() {
        let attacks = [
            "1 UNION SELECT password FROM users",
            "abc' --",
            "x /* comment */",
            "admin'#",
            "1; DROP TABLE doctors",
            "1 OR 1=1",
            "' or 'a'='a",
            "exec(xp_cmdshell)",
            "SLEEP(5)",
            "benchmark (1000000, md5(1))",
        ];
        for attack in attacks {
            assert!(is_suspicious(attack), "should flag: {attack}");
        }
    }

    #[test]
    fn test_ordinary_search_terms_pass() {
        let ordinary = [
            "cardiology",
            "Dr. O'Brien",
            "%heart%",
            "%a\\%b%",
            "أمراض القلب",
            "ear, nose and throat",
            "C# training",
            "Union Hospital",
        ];
        for term in ordinary {
            assert!(!is_suspicious(term), "should pass: {term}");
        }
    }

    #[test]
    fn test_screen_reports_offending_index() {
        let params = [
            SqlParam::Int(1),
            SqlParam::Text("%ok%".to_string()),
            SqlParam::Text("x' OR 1=1".to_string()),
        ];
        let err = screen_parameters(&params).unwrap_err();
        assert!(matches!(err, DbError::UnsafeParameter { index: 2 }));
    }

    #[test]
    fn test_numeric_parameters_are_not_screened() {
        assert!(screen_parameters(&[SqlParam::Int(-1), SqlParam::Bool(true)]).is_ok());
    }
}
