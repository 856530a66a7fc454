//! Value encodings: text escaping and date-time forms.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const FLOATING_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// Escape a TEXT value (RFC 5545 section 3.3.11).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

pub fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(c @ ('\\' | ',' | ';' | ':')) => out.push(c),
            // unknown escape: keep it as written
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub fn format_utc(at: DateTime<Utc>) -> String {
    at.format(UTC_FORMAT).to_string()
}

/// Parse a DATE or DATE-TIME value into an instant.
///
/// - `20240101T100000Z` is UTC
/// - `20240101T100000` with a known `TZID` is resolved in that zone
/// - `20240101T100000` without one (or with an unknown zone) is local time
/// - `20240101` (or `VALUE=DATE`) is local midnight
pub fn parse_instant(raw: &str, tzid: Option<&str>, date_only: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if date_only || raw.len() == 8 {
        let date = NaiveDate::parse_from_str(raw.get(..8)?, DATE_FORMAT).ok()?;
        return local_midnight(date);
    }

    if let Some(utc) = raw.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, FLOATING_FORMAT).ok()?;
        return Some(naive.and_utc());
    }

    let naive = NaiveDateTime::parse_from_str(raw, FLOATING_FORMAT).ok()?;
    match tzid.and_then(|id| id.trim_start_matches('/').parse::<Tz>().ok()) {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Start of `date` in the local time zone.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_datetime() {
        let at = parse_instant("20240305T101500Z", None, false).unwrap();
        assert_eq!(format_utc(at), "20240305T101500Z");
    }

    #[test]
    fn test_parse_zoned_datetime() {
        let at = parse_instant("20240105T100000", Some("America/New_York"), false).unwrap();
        assert_eq!(format_utc(at), "20240105T150000Z");
    }

    #[test]
    fn test_parse_date_is_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_instant("20240305", None, true), local_midnight(date));
        assert_eq!(parse_instant("20240305", None, false), local_midnight(date));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_instant("tomorrow", None, false).is_none());
        assert!(parse_instant("", None, false).is_none());
    }

    #[test]
    fn test_unescape_handles_trailing_backslash() {
        assert_eq!(unescape_text("a\\"), "a\\");
        assert_eq!(unescape_text("a\\\\b\\Nc"), "a\\b\nc");
        assert_eq!(unescape_text("C:\\temp"), "C:\\temp");
    }
}
