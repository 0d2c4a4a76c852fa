// Calendar engine
// Visible month window, grid generation and click/hover dispatch

pub mod grid;
pub mod keyboard;

use chrono::NaiveDate;

use crate::models::calendar_date::{FocusTarget, MonthPanel};
use crate::models::restrictions::DateRestrictions;
use crate::models::selection::{ClickOutcome, SelectionMode, SelectionState};
use crate::utils::date::{first_of_month, last_of_month, shift_month};

pub use grid::GridCache;
pub use keyboard::{CalendarKey, KeyOutcome};

pub struct CalendarEngine {
    mode: SelectionMode,
    /// Day 1 of the first visible month.
    anchor: NaiveDate,
    restrictions: DateRestrictions,
    today: NaiveDate,
    cache: GridCache,
    focused_date: Option<NaiveDate>,
}

impl CalendarEngine {
    pub fn new(mode: SelectionMode, today: NaiveDate) -> Self {
        Self {
            mode,
            anchor: first_of_month(today),
            restrictions: DateRestrictions::default(),
            today,
            cache: GridCache::new(),
            focused_date: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Second panel's month. Derived from the anchor, never stored.
    pub fn next_anchor(&self) -> NaiveDate {
        shift_month(self.anchor, 1)
    }

    /// One panel for single dates, two side by side for ranges.
    pub fn visible_months(&self) -> u8 {
        match self.mode {
            SelectionMode::Single => 1,
            SelectionMode::Range => 2,
        }
    }

    pub fn first_visible_day(&self) -> NaiveDate {
        self.anchor
    }

    pub fn last_visible_day(&self) -> NaiveDate {
        last_of_month(shift_month(self.anchor, self.visible_months() as i32 - 1))
    }

    pub fn is_visible(&self, date: NaiveDate) -> bool {
        self.first_visible_day() <= date && date <= self.last_visible_day()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn restrictions(&self) -> &DateRestrictions {
        &self.restrictions
    }

    pub fn set_restrictions(&mut self, restrictions: DateRestrictions) {
        if self.restrictions != restrictions {
            log::debug!("Calendar restrictions changed: {:?}", restrictions);
            self.restrictions = restrictions;
        }
    }

    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        self.restrictions.is_disabled(date, self.today)
    }

    pub fn prev_month(&mut self) {
        self.anchor = shift_month(self.anchor, -1);
    }

    pub fn next_month(&mut self) {
        self.anchor = shift_month(self.anchor, 1);
    }

    /// Make `date`'s month the first visible month.
    /// Shift the window the least amount needed for `date` to be visible.
    /// Returns true when the window moved.
    pub fn reveal(&mut self, date: NaiveDate) -> bool {
        if date < self.first_visible_day() {
            self.anchor = first_of_month(date);
            true
        } else if date > self.last_visible_day() {
            let span = self.visible_months() as i32 - 1;
            self.anchor = first_of_month(shift_month(first_of_month(date), -span));
            true
        } else {
            false
        }
    }

    pub fn focused_date(&self) -> Option<NaiveDate> {
        self.focused_date
    }

    pub fn set_focused_date(&mut self, date: Option<NaiveDate>) {
        self.focused_date = date;
    }

    /// Reset the view for a fresh open: start from the selected date (or
    /// range start), falling back to today.
    pub fn reset_view(&mut self, selection: &SelectionState) {
        let origin = match self.mode {
            SelectionMode::Single => selection.selected_date(),
            SelectionMode::Range => selection.start_date(),
        }
        .unwrap_or(self.today);
        self.anchor = first_of_month(origin);
        self.focused_date = Some(origin);
    }

    /// Regenerate every visible panel.
    pub fn panels(&mut self, selection: &SelectionState) -> Vec<MonthPanel> {
        let snapshot = selection.snapshot();
        (0..self.visible_months())
            .map(|index| {
                let anchor = shift_month(self.anchor, index as i32);
                self.cache
                    .panel(anchor, index, &self.restrictions, self.today, &snapshot)
            })
            .collect()
    }

    /// Dispatch a click on `date`. Disabled days short-circuit before the
    /// selection sees them.
    pub fn click(&mut self, selection: &mut SelectionState, date: NaiveDate) -> ClickOutcome {
        if self.is_disabled(date) {
            log::debug!("Ignoring click on disabled date {}", date);
            return ClickOutcome::Ignored;
        }
        self.focused_date = Some(date);
        selection.click(date)
    }

    /// Forward a hover to the range preview. Disabled days clear it.
    pub fn hover(&self, selection: &mut SelectionState, date: Option<NaiveDate>) -> bool {
        let date = date.filter(|d| !self.is_disabled(*d));
        selection.hover(date)
    }

    /// Interactive elements in tab order: month buttons, enabled
    /// current-month days of every panel, then the footer buttons.
    pub fn focusable_targets(&mut self) -> Vec<FocusTarget> {
        let mut targets = vec![FocusTarget::PrevMonth, FocusTarget::NextMonth];
        for index in 0..self.visible_months() {
            let anchor = shift_month(self.anchor, index as i32);
            let base = self
                .cache
                .base(anchor, index, &self.restrictions, self.today);
            targets.extend(
                base.iter()
                    .filter(|day| day.is_interactive())
                    .map(|day| FocusTarget::Day(day.date)),
            );
        }
        targets.push(FocusTarget::Clear);
        targets.push(FocusTarget::Close);
        targets
    }
}
