//! Timestamp parsing for the log sources.
//!
//! Three formats show up across the sources, each needing a different
//! completion strategy:
//! - full date+time (custom log): parsed directly;
//! - date+time with numeric zone offset (journal `short-iso`): parsed
//!   directly, converted to local time;
//! - month-day+time (syslog/cron log): no year on the line, so the current
//!   year is assumed and rolled back by one when the result lands in the
//!   future. A December line read in January must resolve to the previous
//!   year, never appear ahead of "now".
//!
//! Unparsable input yields `None`, which every downstream comparison treats
//! as "unknown": it sorts after all valid instants and is never a last run.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Parse a custom-log timestamp: `2024-01-10 09:00:00`.
pub fn parse_full(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Parse a journal `short-iso` timestamp: `2023-08-12T10:30:15+0000`.
pub fn parse_journal(s: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|t| t.with_timezone(&Local))
}

/// Parse a syslog-style timestamp lacking a year: `Aug 12 10:30:15`.
pub fn parse_short(s: &str) -> Option<DateTime<Local>> {
    parse_short_at(s, Local::now())
}

/// Year inference against an explicit "now", so the December-in-January
/// rollback is testable.
pub fn parse_short_at(s: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    // Syslog pads single-digit days with a second space; collapse it.
    let normalized = s.trim().split_whitespace().collect::<Vec<_>>().join(" ");
    let with_year = format!("{} {}", now.year(), normalized);
    let naive = NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S").ok()?;
    let t = Local.from_local_datetime(&naive).earliest()?;
    if t > now {
        // No year on the line: a "future" instant is really last year's.
        // Feb 29 rolled into a non-leap year normalizes to Mar 1 rather
        // than dropping the observation.
        let year = now.year() - 1;
        let rolled = naive.with_year(year).or_else(|| {
            NaiveDate::from_ymd_opt(year, 3, 1).map(|d| d.and_time(naive.time()))
        })?;
        return Local.from_local_datetime(&rolled).earliest();
    }
    Some(t)
}

/// Second-precision rendering used for display and dedup keys.
pub fn format_second(t: DateTime<Local>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_full_timestamp() {
        let t = parse_full("2024-01-10 09:00:00").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2024, 1, 10));
        assert_eq!(t.hour(), 9);
    }

    #[test]
    fn rejects_malformed_full_timestamp() {
        assert!(parse_full("2024-01-10").is_none());
        assert!(parse_full("not a timestamp").is_none());
    }

    #[test]
    fn parses_journal_timestamp_with_offset() {
        let t = parse_journal("2023-08-12T10:30:15+0000").unwrap();
        assert_eq!(t.with_timezone(&chrono::Utc).hour(), 10);
    }

    #[test]
    fn short_timestamp_assumes_current_year() {
        let now = Local.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap();
        let t = parse_short_at("Aug 12 10:30:15", now).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2024, 8, 12));
    }

    #[test]
    fn december_line_read_in_january_resolves_to_prior_year() {
        let now = Local.with_ymd_and_hms(2025, 1, 3, 8, 0, 0).unwrap();
        let t = parse_short_at("Dec 31 23:59:59", now).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2024, 12, 31));
    }

    #[test]
    fn leap_day_rollback_normalizes_to_march_first() {
        // Read in January 2024 (leap year), "Feb 29" parses into the
        // future and rolls back into non-leap 2023.
        let now = Local.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let t = parse_short_at("Feb 29 10:30:00", now).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2023, 3, 1));
        assert_eq!(t.hour(), 10);
    }

    #[test]
    fn short_timestamp_handles_padded_day() {
        let now = Local.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap();
        let t = parse_short_at("Aug  2 01:02:03", now).unwrap();
        assert_eq!(t.day(), 2);
    }

    #[test]
    fn garbage_short_timestamp_is_none() {
        let now = Local.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap();
        assert!(parse_short_at("nonsense line", now).is_none());
    }
}
