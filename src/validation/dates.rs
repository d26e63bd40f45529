use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use super::FormatError;

/// Pattern used for any locale without an entry in [`LOCALE_PATTERNS`].
pub const DEFAULT_PATTERN: &str = "%Y/%m/%d %H:%M";

/// Date-time patterns keyed by primary language subtag.
const LOCALE_PATTERNS: &[(&str, &str)] = &[("es", "%d/%m/%Y %H:%M")];

/// Returns the date-time pattern submitted forms use for `locale`.
///
/// Only the primary language subtag is considered, so `es`, `es-ES` and
/// `es_AR` all select the day-first pattern.
pub fn pattern_for(locale: &str) -> &'static str {
    let language = primary_language(locale);
    LOCALE_PATTERNS
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(language))
        .map(|(_, pattern)| *pattern)
        .unwrap_or(DEFAULT_PATTERN)
}

fn primary_language(locale: &str) -> &str {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .trim()
}

/// Parses a single locale-formatted instant. Submitted values carry no zone
/// and are read as UTC.
pub fn parse_instant(
    field: &'static str,
    raw: &str,
    locale: &str,
) -> Result<DateTime<Utc>, FormatError> {
    let pattern = pattern_for(locale);
    NaiveDateTime::parse_from_str(raw.trim(), pattern)
        .map(|naive| naive.and_utc())
        .map_err(|_| FormatError::Date {
            field,
            value: raw.to_string(),
            pattern,
        })
}

/// A parsed beginning/ending pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
}

impl DateWindow {
    /// Parses both ends of a window. The beginning is parsed first, so a
    /// window with two bad values reports the beginning.
    pub fn parse(beginning: &str, ending: &str, locale: &str) -> Result<Self, FormatError> {
        Ok(Self {
            beginning: parse_instant("beginning", beginning, locale)?,
            ending: parse_instant("ending", ending, locale)?,
        })
    }

    /// Whole minutes from beginning to ending, truncated toward zero.
    /// Negative when the window is inverted.
    pub fn elapsed_minutes(&self) -> i64 {
        (self.ending - self.beginning).num_minutes()
    }
}

/// Lenient parsing accepts years like `21` or `202`; forms must carry four.
pub fn has_four_digit_year(instant: &DateTime<Utc>) -> bool {
    (1000..=9999).contains(&instant.year())
}
