// Settings module
// Configuration surface of a date picker instance

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::models::restrictions::{DateInput, DateRestrictions};
use crate::models::selection::SelectionMode;

pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";
pub const DEFAULT_PLACEHOLDER: &str = "Select date";
pub const DEFAULT_RANGE_PLACEHOLDER: &str = "Select date range";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub is_range: bool,
    pub placeholder: String,
    pub range_placeholder: String,
    /// chrono strftime pattern used for the display string.
    pub date_format: String,
    /// `YYYY-MM-DD`; anything unparseable leaves the bound open.
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub disable_future_dates: bool,
    pub disable_past_dates: bool,
    pub storage_key: Option<String>,
    /// IANA zone used to decide "today"; local time when unset.
    pub time_zone: Option<String>,
    pub persist_debounce_ms: u64,
    pub close_on_select: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            is_range: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            range_placeholder: DEFAULT_RANGE_PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            min_date: None,
            max_date: None,
            disable_future_dates: false,
            disable_past_dates: false,
            storage_key: None,
            time_zone: None,
            persist_debounce_ms: DEFAULT_DEBOUNCE_MS,
            close_on_select: true,
        }
    }
}

impl PickerConfig {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn range() -> Self {
        Self {
            is_range: true,
            ..Self::default()
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn mode(&self) -> SelectionMode {
        if self.is_range {
            SelectionMode::Range
        } else {
            SelectionMode::Single
        }
    }

    pub fn restrictions(&self) -> DateRestrictions {
        DateRestrictions::new()
            .with_min_date(DateInput::from(self.min_date.clone()))
            .with_max_date(DateInput::from(self.max_date.clone()))
            .with_disable_future_dates(self.disable_future_dates)
            .with_disable_past_dates(self.disable_past_dates)
    }

    /// The configured display format, or the default when it contains
    /// specifiers chrono cannot render.
    pub fn effective_date_format(&self) -> &str {
        if is_valid_date_format(&self.date_format) {
            &self.date_format
        } else {
            DEFAULT_DATE_FORMAT
        }
    }
}

pub fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
