// Selection module
// Single-date and range selection state machine

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

/// An inclusive, ordered pair of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two endpoints in either order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Value exposed through the form-control contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerValue {
    Single(NaiveDate),
    Range(DateRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    DateChosen,
    RangeStarted,
    RangeComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click did not change anything (disabled day).
    Ignored,
    /// First endpoint of a range was chosen.
    RangeStarted(NaiveDate),
    Committed(PickerValue),
}

/// Read-only copy of the selection handed to the grid generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSnapshot {
    pub mode: SelectionMode,
    pub selected_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hover_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    mode: SelectionMode,
    selected_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    hover_date: Option<NaiveDate>,
    /// Range to fall back to when an in-progress restart is cancelled.
    last_committed_range: Option<DateRange>,
}

impl SelectionState {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn hover_date(&self) -> Option<NaiveDate> {
        self.hover_date
    }

    /// True exactly when a range start is set and its end is not.
    pub fn selection_in_progress(&self) -> bool {
        self.mode == SelectionMode::Range && self.start_date.is_some() && self.end_date.is_none()
    }

    pub fn phase(&self) -> SelectionPhase {
        match self.mode {
            SelectionMode::Single => match self.selected_date {
                Some(_) => SelectionPhase::DateChosen,
                None => SelectionPhase::Idle,
            },
            SelectionMode::Range => match (self.start_date, self.end_date) {
                (Some(_), Some(_)) => SelectionPhase::RangeComplete,
                (Some(_), None) => SelectionPhase::RangeStarted,
                _ => SelectionPhase::Idle,
            },
        }
    }

    /// The committed value, if the selection is complete.
    pub fn value(&self) -> Option<PickerValue> {
        match self.mode {
            SelectionMode::Single => self.selected_date.map(PickerValue::Single),
            SelectionMode::Range => match (self.start_date, self.end_date) {
                (Some(start), Some(end)) => Some(PickerValue::Range(DateRange { start, end })),
                _ => None,
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.value().is_some()
    }

    /// Apply a click on `date`. Callers reject disabled days before calling.
    pub fn click(&mut self, date: NaiveDate) -> ClickOutcome {
        match self.mode {
            SelectionMode::Single => {
                self.selected_date = Some(date);
                ClickOutcome::Committed(PickerValue::Single(date))
            }
            SelectionMode::Range => match self.phase() {
                SelectionPhase::RangeStarted => {
                    let start = self.start_date.unwrap_or(date);
                    let range = DateRange::new(start, date);
                    self.start_date = Some(range.start);
                    self.end_date = Some(range.end);
                    self.hover_date = None;
                    self.last_committed_range = Some(range);
                    ClickOutcome::Committed(PickerValue::Range(range))
                }
                _ => {
                    // Idle or complete: every click begins a fresh range.
                    self.start_date = Some(date);
                    self.end_date = None;
                    self.hover_date = None;
                    ClickOutcome::RangeStarted(date)
                }
            },
        }
    }

    /// Update the range preview. Returns true when the hover date changed.
    ///
    /// Only meaningful while a range is in progress; otherwise ignored.
    pub fn hover(&mut self, date: Option<NaiveDate>) -> bool {
        if !self.selection_in_progress() {
            return false;
        }
        if self.hover_date == date {
            return false;
        }
        self.hover_date = date;
        true
    }

    /// Reset to `Idle`, dropping every endpoint and the preview.
    pub fn clear(&mut self) {
        self.selected_date = None;
        self.start_date = None;
        self.end_date = None;
        self.hover_date = None;
        self.last_committed_range = None;
    }

    /// Abandon an unfinished range step and the hover preview.
    ///
    /// A range committed before the restart comes back; a completed
    /// selection is left untouched.
    pub fn cancel_in_progress(&mut self) {
        self.hover_date = None;
        if self.selection_in_progress() {
            match self.last_committed_range {
                Some(range) => {
                    self.start_date = Some(range.start);
                    self.end_date = Some(range.end);
                }
                None => self.start_date = None,
            }
        }
    }

    /// Replace the selection with an externally supplied value.
    ///
    /// Returns false, leaving the state untouched, when the value's shape
    /// does not match the mode.
    pub fn apply(&mut self, value: Option<PickerValue>) -> bool {
        match (self.mode, value) {
            (_, None) => {
                self.clear();
                true
            }
            (SelectionMode::Single, Some(PickerValue::Single(date))) => {
                self.clear();
                self.selected_date = Some(date);
                true
            }
            (SelectionMode::Range, Some(PickerValue::Range(range))) => {
                let range = DateRange::new(range.start, range.end);
                self.clear();
                self.start_date = Some(range.start);
                self.end_date = Some(range.end);
                self.last_committed_range = Some(range);
                true
            }
            _ => false,
        }
    }

    /// Restore range endpoints from storage, tolerating a missing end.
    pub fn restore_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.clear();
        match (start, end) {
            (Some(start), Some(end)) => {
                self.apply(Some(PickerValue::Range(DateRange::new(start, end))));
            }
            (Some(start), None) => self.start_date = Some(start),
            // An end without a start cannot be resumed.
            _ => {}
        }
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            mode: self.mode,
            selected_date: self.selected_date,
            start_date: self.start_date,
            end_date: self.end_date,
            hover_date: self.hover_date,
        }
    }
}
