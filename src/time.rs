// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lenient parsing of the date-time strings found in FITS headers.
//!
//! FITS files in the wild carry dates in a handful of shapes; the SVO only
//! cares that a value can be pinned to an unambiguous instant, so everything
//! is normalised to a naive UTC date-time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats attempted when a value doesn't parse as RFC 3339. Ordered from
/// most to least common in solar FITS archives.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y"];

/// Parse a date-time-like string. Returns `None` when the string cannot be
/// interpreted as a date; date-only strings parse to midnight.
pub(crate) fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Some(date_time.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(s, format) {
            return Some(date_time);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a date-time the way the SVO API expects it (ISO 8601).
pub(crate) fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_8601() {
        let result = parse_date_time("2000-01-01T00:00:00Z");
        assert!(result.is_some());
        assert_eq!(result.unwrap().to_string(), "2000-01-01 00:00:00");

        let result = parse_date_time("2021-06-13T09:22:30.5");
        assert!(result.is_some());
        assert_eq!(result.unwrap().to_string(), "2021-06-13 09:22:30.500");
    }

    #[test]
    fn test_parse_common_fits_forms() {
        assert!(parse_date_time("2010/03/21 14:00:05").is_some());
        assert!(parse_date_time("2010-03-21 14:00:05").is_some());
        assert!(parse_date_time("21-Mar-2010 14:00:05").is_some());

        let midnight = parse_date_time("2010-03-21").unwrap();
        assert_eq!(midnight.to_string(), "2010-03-21 00:00:00");
    }

    #[test]
    fn test_rejects_ordinary_text() {
        assert!(parse_date_time("").is_none());
        assert!(parse_date_time("SWAP").is_none());
        assert!(parse_date_time("level 1 data").is_none());
        // Out-of-range components are not dates either.
        assert!(parse_date_time("2000-01-01T24:00:00Z").is_none());
    }

    #[test]
    fn test_format_round_trip() {
        let date_time = parse_date_time("2013-02-03T04:05:06.7Z").unwrap();
        assert_eq!(format_date_time(date_time), "2013-02-03T04:05:06.700");
    }
}
