use chrono::NaiveDate;

use crate::models::selection::{SelectionMode, SelectionState};
use crate::models::settings::PickerConfig;

pub const SELECT_END_DATE: &str = "Select end date";

pub fn format_date(date: NaiveDate, config: &PickerConfig) -> String {
    date.format(config.effective_date_format()).to_string()
}

/// Text shown in the closed picker field.
pub fn display_value(selection: &SelectionState, config: &PickerConfig) -> String {
    match selection.mode() {
        SelectionMode::Single => selection
            .selected_date()
            .map(|date| format_date(date, config))
            .unwrap_or_else(|| config.placeholder.clone()),
        SelectionMode::Range => match (selection.start_date(), selection.end_date()) {
            (Some(start), Some(end)) => {
                format!("{} - {}", format_date(start, config), format_date(end, config))
            }
            (Some(start), None) => format!("{} - {}", format_date(start, config), SELECT_END_DATE),
            _ => config.range_placeholder.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_display() {
        let config = PickerConfig::single();
        let mut selection = SelectionState::new(SelectionMode::Single);
        assert_eq!(display_value(&selection, &config), "Select date");

        selection.click(ymd(2024, 6, 5));
        assert_eq!(display_value(&selection, &config), "Jun 5, 2024");
    }

    #[test]
    fn test_range_display_states() {
        let config = PickerConfig {
            date_format: "%Y-%m-%d".to_string(),
            range_placeholder: "Pick a period".to_string(),
            ..PickerConfig::range()
        };
        let mut selection = SelectionState::new(SelectionMode::Range);
        assert_eq!(display_value(&selection, &config), "Pick a period");

        selection.click(ymd(2024, 6, 20));
        assert_eq!(display_value(&selection, &config), "2024-06-20 - Select end date");

        selection.click(ymd(2024, 6, 15));
        assert_eq!(display_value(&selection, &config), "2024-06-15 - 2024-06-20");
    }
}
