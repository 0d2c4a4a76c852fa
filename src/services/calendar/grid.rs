//! Month grid generation.
//!
//! Builds the 42-cell Sunday-first grid for a month and decorates it with
//! the selection flags. The selection-independent part (membership, today,
//! restrictions) is cached per month panel.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::calendar_date::{CalendarDate, MonthPanel, GRID_CELLS};
use crate::models::restrictions::DateRestrictions;
use crate::models::selection::{DateRange, SelectionMode, SelectionSnapshot};
use crate::utils::date::first_of_month;

/// First cell of the grid: the Sunday on or before the 1st.
pub fn first_day_to_show(month_anchor: NaiveDate) -> NaiveDate {
    let first = first_of_month(month_anchor);
    let offset = first.weekday().num_days_from_sunday() as i64;
    first - Duration::days(offset)
}

/// Cells without selection flags.
pub fn base_grid(
    month_anchor: NaiveDate,
    month_index: u8,
    restrictions: &DateRestrictions,
    today: NaiveDate,
) -> Vec<CalendarDate> {
    let start = first_day_to_show(month_anchor);
    let month = month_anchor.month();

    (0..GRID_CELLS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let mut cell = CalendarDate::new(date, month_index);
            cell.is_current_month = date.month() == month;
            cell.is_today = date == today;
            cell.is_disabled = restrictions.is_disabled(date, today);
            cell
        })
        .collect()
}

/// Set the selection flags on freshly generated cells.
pub fn apply_selection(days: &mut [CalendarDate], selection: &SelectionSnapshot) {
    match selection.mode {
        SelectionMode::Single => {
            for day in days.iter_mut() {
                day.is_selected = selection.selected_date == Some(day.date);
            }
        }
        SelectionMode::Range => match (selection.start_date, selection.end_date) {
            (Some(start), Some(end)) => {
                let range = DateRange::new(start, end);
                for day in days.iter_mut() {
                    day.is_range_start = day.date == start;
                    day.is_range_end = day.date == end;
                    day.is_in_range = day.is_current_month && range.contains(day.date);
                }
            }
            (Some(start), None) => {
                // Preview paints the open interval towards the hovered day,
                // whichever side of the start it is on.
                let preview = selection.hover_date.map(|hover| {
                    if hover < start {
                        (hover, start)
                    } else {
                        (start, hover)
                    }
                });
                for day in days.iter_mut() {
                    day.is_range_start = day.date == start;
                    day.is_hovered = selection.hover_date == Some(day.date);
                    day.is_in_range =
                        matches!(preview, Some((low, high)) if low < day.date && day.date < high);
                }
            }
            _ => {}
        },
    }
}

/// Generate a fully flagged month without caching.
pub fn generate(
    month_anchor: NaiveDate,
    month_index: u8,
    restrictions: &DateRestrictions,
    today: NaiveDate,
    selection: &SelectionSnapshot,
) -> Vec<CalendarDate> {
    let mut days = base_grid(month_anchor, month_index, restrictions, today);
    apply_selection(&mut days, selection);
    days
}

/// Memo of base grids keyed by `(anchor, month_index)`.
///
/// Dropped wholesale as soon as the restrictions or today's date differ
/// from the ones the entries were built with.
#[derive(Debug, Default)]
pub struct GridCache {
    restrictions: DateRestrictions,
    today: Option<NaiveDate>,
    entries: HashMap<(NaiveDate, u8), Vec<CalendarDate>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_inputs(&mut self, restrictions: &DateRestrictions, today: NaiveDate) {
        if self.restrictions != *restrictions || self.today != Some(today) {
            if !self.entries.is_empty() {
                log::debug!(
                    "Restrictions or today changed, dropping {} cached month grids",
                    self.entries.len()
                );
            }
            self.entries.clear();
            self.restrictions = *restrictions;
            self.today = Some(today);
        }
    }

    pub fn base(
        &mut self,
        month_anchor: NaiveDate,
        month_index: u8,
        restrictions: &DateRestrictions,
        today: NaiveDate,
    ) -> &[CalendarDate] {
        self.ensure_inputs(restrictions, today);
        let anchor = first_of_month(month_anchor);
        self.entries
            .entry((anchor, month_index))
            .or_insert_with(|| base_grid(anchor, month_index, restrictions, today))
    }

    pub fn panel(
        &mut self,
        month_anchor: NaiveDate,
        month_index: u8,
        restrictions: &DateRestrictions,
        today: NaiveDate,
        selection: &SelectionSnapshot,
    ) -> MonthPanel {
        let anchor = first_of_month(month_anchor);
        let mut days = self
            .base(anchor, month_index, restrictions, today)
            .to_vec();
        apply_selection(&mut days, selection);
        MonthPanel {
            anchor,
            month_index,
            days,
        }
    }
}
