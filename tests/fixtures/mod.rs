// Test fixtures - reusable test data
// Provides consistent dates, hosts and focus doubles across all test files

#![allow(dead_code)]

use chrono::NaiveDate;
use range_calendar::models::calendar_date::FocusTarget;
use range_calendar::models::settings::PickerConfig;
use range_calendar::services::date_picker::DatePickerHost;
use range_calendar::services::focus::FocusHost;
use range_calendar::services::persistence::KeyValueStore;
use range_calendar::utils::date::FixedClock;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// The "today" every fixture host is pinned to
    pub fn today() -> NaiveDate {
        ymd(2024, 6, 15)
    }

    /// Last day before the June 2024 minimum used by restriction tests
    pub fn may_31_2024() -> NaiveDate {
        ymd(2024, 5, 31)
    }

    pub fn june_1_2024() -> NaiveDate {
        ymd(2024, 6, 1)
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        ymd(2024, 2, 29)
    }

    /// Returns Dec 31, 2024 (year boundary)
    pub fn new_years_eve_2024() -> NaiveDate {
        ymd(2024, 12, 31)
    }
}

/// Focus double: a fixed element list and a cursor.
#[derive(Debug, Default)]
pub struct ListFocus {
    pub elements: Vec<FocusTarget>,
    pub focused: Option<FocusTarget>,
}

impl ListFocus {
    pub fn with_elements(elements: Vec<FocusTarget>) -> Self {
        Self {
            elements,
            focused: None,
        }
    }

    /// Focus double preloaded with a host's current targets, focus on the toggle.
    pub fn for_host<S: KeyValueStore>(host: &mut DatePickerHost<S>) -> Self {
        Self {
            elements: host.focusable_targets(),
            focused: Some(FocusTarget::Toggle),
        }
    }
}

impl FocusHost for ListFocus {
    type Element = FocusTarget;

    fn list_focusable(&self) -> Vec<FocusTarget> {
        self.elements.clone()
    }

    fn active_element(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn focus(&mut self, element: &FocusTarget) {
        self.focused = Some(*element);
    }
}

/// Host pinned to [`dates::today`].
pub fn host_with<S: KeyValueStore>(config: PickerConfig, store: S) -> DatePickerHost<S> {
    DatePickerHost::with_clock(config, store, Box::new(FixedClock(dates::today())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_dates_valid() {
        assert_eq!(dates::today(), ymd(2024, 6, 15));
        assert!(dates::may_31_2024() < dates::june_1_2024());
        assert_eq!(dates::leap_day_2024().format("%m-%d").to_string(), "02-29");
    }
}
