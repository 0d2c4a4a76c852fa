// Date utility functions
// Calendar-day helpers shared by the grid, the engine and persistence

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Storage and config format for calendar days.
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,
    #[error("'{0}' is not a YYYY-MM-DD date or an RFC 3339 timestamp")]
    Unrecognized(String),
}

/// Parse a date-only string (`YYYY-MM-DD`).
///
/// Full RFC 3339 timestamps are accepted too and reduced to the calendar day
/// they fall on in the local zone.
pub fn parse_date_only(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT) {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|_| DateParseError::Unrecognized(trimmed.to_string()))
}

pub fn format_date_only(date: NaiveDate) -> String {
    date.format(DATE_ONLY_FORMAT).to_string()
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), last).unwrap_or(date)
}

/// Get the number of days in a given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

/// Shift a date by the given number of months, clamping the day of month.
///
/// Jan 31 + 1 month lands on Feb 28 (or 29 in a leap year).
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let total_months = (date.year() * 12) + (date.month() as i32 - 1) + delta;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    let day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(date)
}

/// Source of "today" for restriction checks and the `is_today` flag.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, optionally pinned to an IANA time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: Option<Tz>,
}

impl SystemClock {
    pub fn new(zone: Option<Tz>) -> Self {
        Self { zone }
    }

    /// Build from a zone name such as `Europe/Berlin`. Unknown names fall
    /// back to the local zone.
    pub fn from_zone_name(name: Option<&str>) -> Self {
        let zone = name.and_then(|name| match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(err) => {
                log::warn!("Unknown time zone '{}', using local time: {}", name, err);
                None
            }
        });
        Self { zone }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.zone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Clock that always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(2024, 2 => 29 ; "leap february")]
    #[test_case(2023, 2 => 28 ; "common february")]
    #[test_case(1900, 2 => 28 ; "century non leap")]
    #[test_case(2000, 2 => 29 ; "quad century leap")]
    #[test_case(2024, 4 => 30 ; "april")]
    #[test_case(2024, 12 => 31 ; "december")]
    fn test_days_in_month(year: i32, month: u32) -> u32 {
        days_in_month(year, month)
    }

    #[test]
    fn test_shift_month_rolls_year() {
        assert_eq!(shift_month(ymd(2024, 12, 15), 1), ymd(2025, 1, 15));
        assert_eq!(shift_month(ymd(2025, 1, 15), -1), ymd(2024, 12, 15));
        assert_eq!(shift_month(ymd(2024, 6, 1), -18), ymd(2022, 12, 1));
    }

    #[test]
    fn test_shift_month_clamps_day() {
        assert_eq!(shift_month(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(shift_month(ymd(2023, 1, 31), 1), ymd(2023, 2, 28));
        assert_eq!(shift_month(ymd(2024, 3, 31), -1), ymd(2024, 2, 29));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 1));
        assert_eq!(last_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 29));
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(parse_date_only("2024-06-15"), Ok(ymd(2024, 6, 15)));
        assert_eq!(parse_date_only(" 2024-06-15 "), Ok(ymd(2024, 6, 15)));
        assert_eq!(parse_date_only(""), Err(DateParseError::Empty));
        assert!(matches!(
            parse_date_only("not-a-date"),
            Err(DateParseError::Unrecognized(_))
        ));
        assert!(parse_date_only("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_rfc3339_keeps_a_calendar_day() {
        let parsed = parse_date_only("2024-06-15T12:00:00+00:00").unwrap();
        // Any zone within +/-11h of UTC keeps noon on the same day.
        assert!((parsed - ymd(2024, 6, 15)).num_days().abs() <= 1);
    }

    #[test]
    fn test_format_date_only() {
        assert_eq!(format_date_only(ymd(2024, 1, 5)), "2024-01-05");
    }

    #[test]
    fn test_system_clock_zone_name() {
        assert!(SystemClock::from_zone_name(Some("Europe/Berlin")).zone().is_some());
        assert!(SystemClock::from_zone_name(Some("Mars/Olympus")).zone().is_none());
        assert!(SystemClock::from_zone_name(None).zone().is_none());
    }
}
