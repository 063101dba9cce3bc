//! Relative and absolute date resolution for sprint boundaries.
//!
//! A small fixed vocabulary covers the interactive cases (`today`,
//! `tomorrow`, `next week`, `+N days`, `+N weeks`); anything else is parsed
//! as an absolute date.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

static RELATIVE_RE: OnceLock<Regex> = OnceLock::new();

fn relative_re() -> &'static Regex {
    RELATIVE_RE.get_or_init(|| Regex::new(r"(?i)^\+([0-9]+)\s*(day|days|week|weeks)$").unwrap())
}

/// Naive date-time layouts, interpreted in local time.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Resolve `input` against `now`.
///
/// Returns `None` when the input is neither a recognized relative token nor
/// a parseable absolute date; rejecting that is up to the caller.
pub fn resolve(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match input.to_lowercase().as_str() {
        "today" => return Some(now),
        "tomorrow" => return now.checked_add_signed(Duration::try_days(1)?),
        "next week" => return now.checked_add_signed(Duration::try_days(7)?),
        _ => {}
    }

    if let Some(caps) = relative_re().captures(input) {
        let amount: i64 = caps[1].parse().ok()?;
        let days = if caps[2].to_lowercase().starts_with("day") {
            amount
        } else {
            amount.checked_mul(7)?
        };
        return now.checked_add_signed(Duration::try_days(days)?);
    }

    parse_absolute(input)
}

fn parse_absolute(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    // Date-only input means midnight UTC.
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn days(n: i64) -> Duration {
        Duration::days(n)
    }

    #[test]
    fn keywords() {
        assert_eq!(resolve("today", now()), Some(now()));
        assert_eq!(resolve("TODAY", now()), Some(now()));
        assert_eq!(resolve("tomorrow", now()), Some(now() + days(1)));
        assert_eq!(resolve("Tomorrow", now()), Some(now() + days(1)));
        assert_eq!(resolve("next week", now()), Some(now() + days(7)));
        assert_eq!(resolve("Next Week", now()), Some(now() + days(7)));
    }

    #[test]
    fn relative_offsets() {
        for n in [0i64, 1, 2, 10, 52] {
            for unit in ["day", "days", "DAY", "Days"] {
                assert_eq!(
                    resolve(&format!("+{n} {unit}"), now()),
                    Some(now() + days(n)),
                    "+{n} {unit}"
                );
            }
            for unit in ["week", "weeks", "WEEK", "Weeks"] {
                assert_eq!(
                    resolve(&format!("+{n} {unit}"), now()),
                    Some(now() + days(n * 7)),
                    "+{n} {unit}"
                );
            }
        }
    }

    #[test]
    fn singular_and_plural_agree() {
        assert_eq!(resolve("+2 week", now()), resolve("+2 weeks", now()));
        assert_eq!(resolve("+3 day", now()), resolve("+3 days", now()));
    }

    #[test]
    fn whitespace_between_amount_and_unit_is_optional() {
        assert_eq!(resolve("+3days", now()), Some(now() + days(3)));
        assert_eq!(resolve("+1   week", now()), Some(now() + days(7)));
    }

    #[test]
    fn relative_requires_leading_plus() {
        assert_eq!(resolve("2 weeks", now()), None);
        assert_eq!(resolve("-2 weeks", now()), None);
        assert_eq!(resolve("+-1 days", now()), None);
        assert_eq!(resolve("+1.5 days", now()), None);
        assert_eq!(resolve("+2 months", now()), None);
    }

    #[test]
    fn overflow_is_invalid() {
        assert_eq!(resolve("+99999999999999999 weeks", now()), None);
        assert_eq!(resolve("+9223372036854775807 weeks", now()), None);
    }

    #[test]
    fn absolute_dates() {
        assert_eq!(
            resolve("2024-03-01", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            resolve("2024-03-01T12:00:00Z", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            resolve("2024-03-01T12:00:00+02:00", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            resolve("Fri, 01 Mar 2024 12:00:00 +0000", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn naive_datetime_is_local() {
        let expected = Local
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
        assert_eq!(resolve("2024-03-01T12:00", now()), expected);
        assert_eq!(resolve("2024-03-01 12:00:00", now()), expected);
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(resolve("not a date", now()), None);
        assert_eq!(resolve("", now()), None);
        assert_eq!(resolve("2024-13-45", now()), None);
    }
}
