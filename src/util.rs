use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

/// Parse an ISO-8601 timestamp with lenient fallbacks.
///
/// RFC 3339 first, then offset-less naive forms (interpreted as UTC), then
/// a bare calendar date at midnight. Returns `None` for anything else; the
/// caller decides whether that means "exclude" or "sort earliest".
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}

/// Sort key for timestamp strings: unparseable values sort earliest.
pub fn timestamp_sort_key(value: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// "March 5, 2026", the human format used by exports. Unparseable input
/// is passed through unchanged rather than dropped.
pub fn format_long_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

/// "Mar 5", the short label used by daily growth points.
pub fn format_month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Weekday display name, Sunday-first to match the activity histogram.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Write a file atomically: temp file in the same directory, then rename.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2026-03-05T09:30:00-05:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-05T14:30:00+00:00");
    }

    #[test]
    fn parses_naive_and_date_only_as_utc() {
        assert!(parse_timestamp("2026-03-05T09:30:00").is_some());
        assert!(parse_timestamp("2026-03-05T09:30").is_some());
        let midnight = parse_timestamp("2026-03-05").unwrap();
        assert_eq!(midnight.format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("03/05/2026").is_none());
    }

    #[test]
    fn unparseable_sorts_earliest() {
        assert!(timestamp_sort_key("garbage") < timestamp_sort_key("1970-01-01"));
    }

    #[test]
    fn long_date_format() {
        assert_eq!(format_long_date("2026-03-05T09:30:00Z"), "March 5, 2026");
        assert_eq!(format_long_date("not a date"), "not a date");
    }

    #[test]
    fn month_day_label() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_month_day(date), "Mar 5");
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        atomic_write_str(&path, "first").unwrap();
        atomic_write_str(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
