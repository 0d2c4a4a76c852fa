// Calendar date module
// Render-ready day cells and the month panels that hold them

use chrono::{Datelike, NaiveDate};

/// Days shown per month panel: six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;
pub const DAYS_PER_WEEK: usize = 7;

/// One day cell. Rebuilt on every recompute, never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub date: NaiveDate,
    /// Stable integer key (days since the common era) for equality and
    /// widget identity.
    pub key: i32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_in_range: bool,
    pub is_range_start: bool,
    pub is_range_end: bool,
    pub is_hovered: bool,
    pub is_disabled: bool,
    /// 0 for the first visible month, 1 for the second.
    pub month_index: u8,
}

impl CalendarDate {
    pub fn new(date: NaiveDate, month_index: u8) -> Self {
        Self {
            date,
            key: date.num_days_from_ce(),
            is_current_month: false,
            is_today: false,
            is_selected: false,
            is_in_range: false,
            is_range_start: false,
            is_range_end: false,
            is_hovered: false,
            is_disabled: false,
            month_index,
        }
    }

    /// Whether keyboard focus and clicks may land on this cell.
    pub fn is_interactive(&self) -> bool {
        self.is_current_month && !self.is_disabled
    }

    pub fn day_label(&self) -> String {
        self.date.day().to_string()
    }
}

/// A rendered month: its anchor (day 1) and the 42 cells around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPanel {
    pub anchor: NaiveDate,
    pub month_index: u8,
    pub days: Vec<CalendarDate>,
}

impl MonthPanel {
    pub fn title(&self) -> String {
        self.anchor.format("%B %Y").to_string()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDate]> {
        self.days.chunks(DAYS_PER_WEEK)
    }
}

/// Interactive elements inside the open calendar, plus the toggle that
/// opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Toggle,
    PrevMonth,
    NextMonth,
    Day(NaiveDate),
    Clear,
    Close,
}
