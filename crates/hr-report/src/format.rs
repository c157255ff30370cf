//! Date renderings.
//!
//! Metadata dates use a long localized form; entry headings and cookie
//! expiry use a sortable RFC 3339 timestamp. Both are deterministic.

use crate::error::Result;
use crate::i18n::Translator;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// `2024-01-15T14:30:22.000Z`
pub fn timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Localized long date-time, e.g. `January 15, 2024 at 14:30:22 UTC`.
pub fn long_date(date: &DateTime<Utc>, t: &Translator<'_>) -> Result<String> {
    let month = t.translate(&format!("date.month-{}", date.month()))?;
    let day = date.day().to_string();
    let year = date.year().to_string();
    let time = date.format("%H:%M:%S").to_string();
    t.translate_with(
        "date.long",
        &[
            ("month", month.as_str()),
            ("day", day.as_str()),
            ("year", year.as_str()),
            ("time", time.as_str()),
        ],
    )
}

/// Cookie `expires` as a timestamp when it parses, verbatim otherwise.
pub fn cookie_expiry(expires: &str) -> String {
    DateTime::parse_from_rfc3339(expires)
        .map(|d| timestamp(&d.with_timezone(&Utc)))
        .unwrap_or_else(|_| expires.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, Translations};
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap()
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(&date()), "2024-03-05T09:07:02.000Z");
    }

    #[test]
    fn test_long_date_localized() {
        let translations = Translations::bundled().unwrap();
        let en = translations.translator(Language::En).unwrap();
        let de = translations.translator(Language::De).unwrap();
        assert_eq!(long_date(&date(), &en).unwrap(), "March 5, 2024 at 09:07:02 UTC");
        assert_eq!(long_date(&date(), &de).unwrap(), "5. März 2024 um 09:07:02 UTC");
    }

    #[test]
    fn test_cookie_expiry() {
        assert_eq!(
            cookie_expiry("2025-01-01T00:00:00+01:00"),
            "2024-12-31T23:00:00.000Z"
        );
        assert_eq!(cookie_expiry("Session"), "Session");
    }
}
