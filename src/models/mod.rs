//! # ماژول مدل‌ها (Domain Models)
//!
//! entity‌های canonical که هر دو منبع داده (SQL و snapshot) بهشون تبدیل
//! میشن. به همین خاطر لایه نمایش نمیفهمه داده از کجا اومده.
//!
//! ## تفاوت انواع مدل:
//! - **Entity**: `Doctor`، `MedicalService` و ... (اینجا)
//! - **Row**: ردیف خام SQL (در `database::rows`)
//! - **DTO**: بدنه پاسخ‌های API (در `dto`)
//! - **Filter**: پارامترهای اعتبارسنجی‌شده جستجو

mod content;
mod disease;
mod doctor;
mod dto;
mod event;
mod medical_service;
mod query;

pub use content::*;
pub use disease::*;
pub use doctor::*;
pub use dto::*;
pub use event::*;
pub use medical_service::*;
pub use query::*;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::pad_id;
use crate::validation::validate_id;

// =====================================
// Doctor Identifier (Newtype Pattern)
// =====================================
/// شناسه canonical پزشک
///
/// در SQL عدد صحیح هست، در snapshot رشته ۵ رقمی با صفرهای اول ("00009")،
/// و در جدول ارتباط پزشک↔سرویس دوباره عدد. همه اینجا به یک نوع تبدیل
/// میشن و همیشه به صورت رشته ۵ رقمی serialize میشن.
///
/// ```rust
/// use hospital_catalog::models::DoctorId;
///
/// let from_json = DoctorId::parse("00009").unwrap();
/// let from_link = DoctorId::from_numeric(9).unwrap();
/// assert_eq!(from_json, from_link);
/// assert_eq!(from_link.padded(), "00009");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoctorId(u32);

impl DoctorId {
    /// از رشته (با یا بدون صفرهای اول)
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        validate_id(raw).and_then(Self::from_numeric)
    }

    /// از عدد (ستون SQL یا `doctor_id` ارتباط)
    #[must_use]
    pub fn from_numeric(value: i64) -> Option<Self> {
        u32::try_from(value).ok().filter(|v| *v > 0).map(Self)
    }

    /// مقدار عددی برای bind در SQL
    #[must_use]
    pub fn value(self) -> i64 {
        i64::from(self.0)
    }

    /// نمایش ۵ رقمی
    #[must_use]
    pub fn padded(self) -> String {
        pad_id(self.0)
    }
}

impl std::fmt::Display for DoctorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.padded())
    }
}

impl Serialize for DoctorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.padded())
    }
}

impl<'de> Deserialize<'de> for DoctorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from_numeric(n)
                .ok_or_else(|| de::Error::custom(format!("invalid doctor id {n}"))),
            Raw::Text(s) => {
                Self::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid doctor id {s:?}")))
            }
        }
    }
}

// =====================================
// "0"/"1" Flag
// =====================================
/// serde برای flag‌هایی که به صورت رشته "0"/"1" ذخیره میشن
///
/// موقع خوندن `"1"`، `1` و `true` همه قبوله.
pub mod flag_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Number(n) => Ok(n != 0),
            Raw::Text(s) => super::parse_flag_text(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid flag {s:?}"))),
        }
    }
}

/// تبدیل "0"/"1" به bool
#[must_use]
pub fn parse_flag_text(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" | "" => Some(false),
        _ => None,
    }
}

// =====================================
// Relationships
// =====================================
/// ارتباط چند به چند پزشک ↔ سرویس
///
/// در snapshot فیلد `doctor_id` عددیه ولی شناسه خود پزشک رشته ۵ رقمی.
/// deserialize کردن به `DoctorId` این دو رو یکسان میکنه.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorServiceLink {
    pub doctor_id: DoctorId,
    pub service_id: i64,
}

/// ارتباط سرویس ↔ بیماری
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDiseaseLink {
    pub service_id: i64,
    pub disease_id: i64,
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_doctor_id_reconciliation() {
        let padded: DoctorId = serde_json::from_str("\"00009\"").unwrap();
        let numeric: DoctorId = serde_json::from_str("9").unwrap();
        assert_eq!(padded, numeric);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"00009\"");
    }

    #[test]
    fn test_doctor_id_rejects_garbage() {
        assert!(serde_json::from_str::<DoctorId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<DoctorId>("0").is_err());
        assert!(serde_json::from_str::<DoctorId>("-4").is_err());
        assert_eq!(DoctorId::parse("00000"), None);
    }

    #[test]
    fn test_link_deserializes_numeric_doctor_id() {
        let link: DoctorServiceLink =
            serde_json::from_str(r#"{"doctor_id": 12, "service_id": 3}"#).unwrap();
        assert_eq!(link.doctor_id, DoctorId::parse("00012").unwrap());
    }

    #[test]
    fn test_flag_text() {
        assert_eq!(parse_flag_text("1"), Some(true));
        assert_eq!(parse_flag_text("0"), Some(false));
        assert_eq!(parse_flag_text("2"), None);
    }
}
