//! Date handling for invoice periods.
//!
//! Dates come from hand-edited configuration, so parsing never fails: anything
//! that is not a real calendar day resolves to a sentinel that callers must
//! check with [`ResolvedDate::is_valid`].

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use regex::Regex;

/// Full date or the reduced ISO forms `YYYY-MM` and `YYYY`.
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").expect("static date pattern")
});

/// A configuration date anchored at 23:59:59 UTC, or the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    instant: DateTime<Utc>,
    valid: bool,
}

impl ResolvedDate {
    /// The fallback for unparseable input: 1970-01-01T00:00:00Z.
    pub fn sentinel() -> Self {
        Self {
            instant: DateTime::UNIX_EPOCH,
            valid: false,
        }
    }

    fn end_of_day(day: NaiveDate) -> Self {
        let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        Self {
            instant: day.and_time(time).and_utc(),
            valid: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Calendar day in UTC.
    pub fn day(&self) -> NaiveDate {
        self.instant.date_naive()
    }
}

/// Resolve a configuration date string. Absent or malformed input yields
/// [`ResolvedDate::sentinel`].
pub fn resolve_date(input: Option<&str>) -> ResolvedDate {
    let Some(raw) = input else {
        return ResolvedDate::sentinel();
    };

    match parse_calendar_day(raw) {
        Some(day) => ResolvedDate::end_of_day(day),
        None => {
            tracing::debug!(input = raw, "date did not parse, using sentinel");
            ResolvedDate::sentinel()
        }
    }
}

fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(raw)?;
    let year = caps[1].parse().ok()?;
    let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
    let day = caps.get(3).map_or(Some(1), |d| d.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every calendar day in `[start, end]`. Empty when `start > end`.
pub fn each_day_of_interval(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of Monday–Friday days in the closed interval `[start, end]`.
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !is_weekend(*d))
        .count() as u32
}

/// Compact range text, collapsing the parts both ends share.
///
/// `Jan 1, 2021`, `Jan 1–15, 2021`, `Jan 25 – Feb 5, 2021`,
/// `Dec 28, 2020 – Jan 8, 2021`.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        return start.format("%b %-d, %Y").to_string();
    }

    if start.year() != end.year() {
        return format!(
            "{} – {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        );
    }

    if start.month() != end.month() {
        return format!(
            "{} – {}, {}",
            start.format("%b %-d"),
            end.format("%b %-d"),
            end.year()
        );
    }

    format!(
        "{}–{}, {}",
        start.format("%b %-d"),
        end.day(),
        end.year()
    )
}

/// Header date text, e.g. `Jan 15 2021`.
pub fn format_display_date(day: NaiveDate) -> String {
    day.format("%b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_to_end_of_day_utc() {
        let resolved = resolve_date(Some("2021-01-15"));
        assert!(resolved.is_valid());
        assert_eq!(resolved.instant().to_rfc3339(), "2021-01-15T23:59:59+00:00");
        assert_eq!(resolved.day(), date(2021, 1, 15));
    }

    #[test]
    fn reduced_forms_start_the_period() {
        assert_eq!(resolve_date(Some("2021-03")).day(), date(2021, 3, 1));
        assert_eq!(resolve_date(Some("2021")).day(), date(2021, 1, 1));
    }

    #[test]
    fn malformed_input_is_sentinel() {
        for input in ["not-a-date", "", "2021-13-01", "2021-02-30", " 2021-01-01", "01/15/2021"] {
            let resolved = resolve_date(Some(input));
            assert!(!resolved.is_valid(), "{input} should not be valid");
            assert_eq!(resolved, ResolvedDate::sentinel());
        }
        assert_eq!(resolve_date(None), ResolvedDate::sentinel());
        assert_eq!(ResolvedDate::sentinel().day(), date(1970, 1, 1));
    }

    #[test]
    fn business_days_in_first_half_of_january_2021() {
        assert_eq!(count_business_days(date(2021, 1, 1), date(2021, 1, 15)), 11);
    }

    #[test]
    fn business_days_single_day() {
        // Friday, then Saturday.
        assert_eq!(count_business_days(date(2021, 1, 15), date(2021, 1, 15)), 1);
        assert_eq!(count_business_days(date(2021, 1, 16), date(2021, 1, 16)), 0);
    }

    #[test]
    fn reversed_interval_is_empty() {
        assert!(each_day_of_interval(date(2021, 1, 15), date(2021, 1, 1)).is_empty());
        assert_eq!(count_business_days(date(2021, 1, 15), date(2021, 1, 1)), 0);
    }

    #[test]
    fn interval_is_inclusive() {
        let days = each_day_of_interval(date(2020, 2, 27), date(2020, 3, 1));
        assert_eq!(
            days,
            vec![date(2020, 2, 27), date(2020, 2, 28), date(2020, 2, 29), date(2020, 3, 1)]
        );
    }

    #[test]
    fn range_formats() {
        assert_eq!(format_range(date(2021, 1, 1), date(2021, 1, 1)), "Jan 1, 2021");
        assert_eq!(format_range(date(2021, 1, 1), date(2021, 1, 15)), "Jan 1–15, 2021");
        assert_eq!(format_range(date(2021, 1, 25), date(2021, 2, 5)), "Jan 25 – Feb 5, 2021");
        assert_eq!(
            format_range(date(2020, 12, 28), date(2021, 1, 8)),
            "Dec 28, 2020 – Jan 8, 2021"
        );
    }

    #[test]
    fn display_date_pads_day() {
        assert_eq!(format_display_date(date(2021, 1, 5)), "Jan 05 2021");
    }

    proptest! {
        #[test]
        fn counts_only_weekdays(start in 0i64..20_000, len in 0i64..400) {
            let start = date(1970, 1, 1) + chrono::Duration::days(start);
            let end = start + chrono::Duration::days(len);
            let expected = each_day_of_interval(start, end)
                .into_iter()
                .filter(|d| d.weekday().number_from_monday() <= 5)
                .count() as u32;
            prop_assert_eq!(count_business_days(start, end), expected);
        }

        #[test]
        fn start_after_end_counts_zero(start in 1i64..20_000, back in 1i64..400) {
            let start = date(1970, 1, 1) + chrono::Duration::days(start);
            let end = start - chrono::Duration::days(back);
            prop_assert_eq!(count_business_days(start, end), 0);
        }

        #[test]
        fn formatting_is_deterministic(a in 0i64..40_000, b in 0i64..40_000) {
            let start = date(1970, 1, 1) + chrono::Duration::days(a);
            let end = date(1970, 1, 1) + chrono::Duration::days(b);
            prop_assert_eq!(format_range(start, end), format_range(start, end));
        }
    }
}
