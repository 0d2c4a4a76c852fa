use chrono::{Duration, NaiveDate};

use crate::models::selection::{ClickOutcome, SelectionState};
use crate::utils::date::{first_of_month, last_of_month, shift_month};

use super::CalendarEngine;

/// Keys the calendar reacts to while a day cell has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Escape,
    Tab { shift: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Focus moved to `date`; `view_shifted` is set when the visible months
    /// changed to reveal it.
    FocusMoved { date: NaiveDate, view_shifted: bool },
    Click(ClickOutcome),
    Close,
    /// Tab handling belongs to the focus trap.
    Tab { shift: bool },
}

impl CalendarEngine {
    /// Where `key` would move focus from `from`. `None` for keys that do not
    /// navigate.
    pub fn key_target(key: CalendarKey, from: NaiveDate) -> Option<NaiveDate> {
        let target = match key {
            CalendarKey::ArrowLeft => from - Duration::days(1),
            CalendarKey::ArrowRight => from + Duration::days(1),
            CalendarKey::ArrowUp => from - Duration::days(7),
            CalendarKey::ArrowDown => from + Duration::days(7),
            CalendarKey::Home => first_of_month(from),
            CalendarKey::End => last_of_month(from),
            CalendarKey::PageUp => shift_month(from, -1),
            CalendarKey::PageDown => shift_month(from, 1),
            _ => return None,
        };
        Some(target)
    }

    pub fn handle_key(&mut self, key: CalendarKey, selection: &mut SelectionState) -> KeyOutcome {
        match key {
            CalendarKey::Escape => KeyOutcome::Close,
            CalendarKey::Tab { shift } => KeyOutcome::Tab { shift },
            CalendarKey::Enter | CalendarKey::Space => match self.focused_date {
                Some(date) => KeyOutcome::Click(self.click(selection, date)),
                None => KeyOutcome::Ignored,
            },
            _ => {
                let from = self.focused_date.unwrap_or(self.anchor);
                let Some(target) = Self::key_target(key, from) else {
                    return KeyOutcome::Ignored;
                };
                let view_shifted = self.reveal(target);
                self.focused_date = Some(target);
                if selection.selection_in_progress() {
                    self.hover(selection, Some(target));
                }
                KeyOutcome::FocusMoved {
                    date: target,
                    view_shifted,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::restrictions::DateRestrictions;
    use crate::models::selection::{PickerValue, SelectionMode};
    use test_case::test_case;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(CalendarKey::ArrowLeft, (2024, 6, 14) ; "left")]
    #[test_case(CalendarKey::ArrowRight, (2024, 6, 16) ; "right")]
    #[test_case(CalendarKey::ArrowUp, (2024, 6, 8) ; "up")]
    #[test_case(CalendarKey::ArrowDown, (2024, 6, 22) ; "down")]
    #[test_case(CalendarKey::Home, (2024, 6, 1) ; "home")]
    #[test_case(CalendarKey::End, (2024, 6, 30) ; "end")]
    #[test_case(CalendarKey::PageUp, (2024, 5, 15) ; "page up")]
    #[test_case(CalendarKey::PageDown, (2024, 7, 15) ; "page down")]
    fn test_key_targets(key: CalendarKey, expected: (i32, u32, u32)) {
        let (y, m, d) = expected;
        assert_eq!(CalendarEngine::key_target(key, ymd(2024, 6, 15)), Some(ymd(y, m, d)));
    }

    #[test]
    fn test_page_down_clamps_day() {
        assert_eq!(
            CalendarEngine::key_target(CalendarKey::PageDown, ymd(2024, 1, 31)),
            Some(ymd(2024, 2, 29))
        );
    }

    #[test]
    fn test_arrow_past_window_shifts_view() {
        let mut engine = CalendarEngine::new(SelectionMode::Single, ymd(2024, 6, 30));
        let mut selection = SelectionState::new(SelectionMode::Single);
        engine.set_focused_date(Some(ymd(2024, 6, 30)));

        let outcome = engine.handle_key(CalendarKey::ArrowRight, &mut selection);
        assert_eq!(
            outcome,
            KeyOutcome::FocusMoved {
                date: ymd(2024, 7, 1),
                view_shifted: true
            }
        );
        assert_eq!(engine.anchor(), ymd(2024, 7, 1));
    }

    #[test]
    fn test_arrow_into_second_panel_keeps_view() {
        let mut engine = CalendarEngine::new(SelectionMode::Range, ymd(2024, 6, 30));
        let mut selection = SelectionState::new(SelectionMode::Range);
        engine.set_focused_date(Some(ymd(2024, 6, 30)));

        let outcome = engine.handle_key(CalendarKey::ArrowDown, &mut selection);
        assert_eq!(
            outcome,
            KeyOutcome::FocusMoved {
                date: ymd(2024, 7, 7),
                view_shifted: false
            }
        );
        assert_eq!(engine.anchor(), ymd(2024, 6, 1));
    }

    #[test]
    fn test_enter_commits_focused_day() {
        let mut engine = CalendarEngine::new(SelectionMode::Single, ymd(2024, 6, 15));
        let mut selection = SelectionState::new(SelectionMode::Single);
        assert_eq!(engine.handle_key(CalendarKey::Enter, &mut selection), KeyOutcome::Ignored);

        engine.set_focused_date(Some(ymd(2024, 6, 18)));
        let outcome = engine.handle_key(CalendarKey::Space, &mut selection);
        assert_eq!(
            outcome,
            KeyOutcome::Click(ClickOutcome::Committed(PickerValue::Single(ymd(2024, 6, 18))))
        );
    }

    #[test]
    fn test_enter_on_disabled_day_is_noop() {
        let mut engine = CalendarEngine::new(SelectionMode::Single, ymd(2024, 6, 15));
        engine.set_restrictions(DateRestrictions::new().with_disable_past_dates(true));
        let mut selection = SelectionState::new(SelectionMode::Single);
        engine.set_focused_date(Some(ymd(2024, 6, 10)));

        assert_eq!(
            engine.handle_key(CalendarKey::Enter, &mut selection),
            KeyOutcome::Click(ClickOutcome::Ignored)
        );
        assert_eq!(selection.selected_date(), None);
    }

    #[test]
    fn test_keyboard_moves_range_preview() {
        let mut engine = CalendarEngine::new(SelectionMode::Range, ymd(2024, 6, 15));
        let mut selection = SelectionState::new(SelectionMode::Range);
        engine.click(&mut selection, ymd(2024, 6, 15));

        engine.handle_key(CalendarKey::ArrowRight, &mut selection);
        engine.handle_key(CalendarKey::ArrowRight, &mut selection);
        assert_eq!(selection.hover_date(), Some(ymd(2024, 6, 17)));
        assert_eq!(selection.start_date(), Some(ymd(2024, 6, 15)));
    }

    #[test]
    fn test_escape_and_tab_are_passed_up() {
        let mut engine = CalendarEngine::new(SelectionMode::Single, ymd(2024, 6, 15));
        let mut selection = SelectionState::new(SelectionMode::Single);
        assert_eq!(engine.handle_key(CalendarKey::Escape, &mut selection), KeyOutcome::Close);
        assert_eq!(
            engine.handle_key(CalendarKey::Tab { shift: true }, &mut selection),
            KeyOutcome::Tab { shift: true }
        );
    }
}
