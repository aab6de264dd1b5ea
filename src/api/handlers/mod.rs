//! # HTTP Handlers
//!
//! هر handler پارامترها رو اعتبارسنجی میکنه، سرویس مربوط رو صدا میزنه و
//! نتیجه رو JSON برمیگردونه. خطاها با `AppError` به پاسخ تبدیل میشن.

pub mod content;
pub mod diseases;
pub mod doctors;
pub mod events;
pub mod health;
pub mod services;
pub mod suggestions;
