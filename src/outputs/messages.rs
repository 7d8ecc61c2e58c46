//! Fixed user-facing notices for the two failure states.

use crate::models::Locale;

pub fn not_found(locale: &Locale) -> &'static str {
    if locale.is_arabic() {
        "الخبر غير موجود"
    } else {
        "News article not found"
    }
}

pub fn unavailable(locale: &Locale) -> &'static str {
    if locale.is_arabic() {
        "الأخبار غير متاحة مؤقتاً، يرجى المحاولة لاحقاً"
    } else {
        "News is temporarily unavailable, please try again later"
    }
}
