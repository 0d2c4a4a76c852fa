// Date restriction module
// Decides whether a calendar day can be picked

use chrono::NaiveDate;

use crate::utils::date::parse_date_only;

/// Restriction settings consumed by the grid and the click handler.
///
/// Compared structurally by the grid cache: any change to these values
/// invalidates every cached month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRestrictions {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub disable_future_dates: bool,
    pub disable_past_dates: bool,
}

impl DateRestrictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_date(mut self, date: impl Into<DateInput>) -> Self {
        self.min_date = date.into().resolve();
        self
    }

    pub fn with_max_date(mut self, date: impl Into<DateInput>) -> Self {
        self.max_date = date.into().resolve();
        self
    }

    pub fn with_disable_future_dates(mut self, disable: bool) -> Self {
        self.disable_future_dates = disable;
        self
    }

    pub fn with_disable_past_dates(mut self, disable: bool) -> Self {
        self.disable_past_dates = disable;
        self
    }

    /// Returns true when `date` may not be selected. Rules are independent;
    /// any one of them disables the day.
    pub fn is_disabled(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if self.disable_future_dates && date > today {
            return true;
        }
        if self.disable_past_dates && date < today {
            return true;
        }
        if matches!(self.min_date, Some(min) if date < min) {
            return true;
        }
        matches!(self.max_date, Some(max) if date > max)
    }

    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }
}

/// A min/max bound as handed in by the caller: a day, a date-only string, or
/// nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
    #[default]
    Unset,
}

impl DateInput {
    /// Resolve to a calendar day. Unparseable text resolves to `None`, which
    /// leaves the bound unrestricted instead of failing the render.
    pub fn resolve(self) -> Option<NaiveDate> {
        match self {
            DateInput::Date(date) => Some(date),
            DateInput::Unset => None,
            DateInput::Text(text) => match parse_date_only(&text) {
                Ok(date) => Some(date),
                Err(err) => {
                    log::warn!("Ignoring date restriction: {}", err);
                    None
                }
            },
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<Option<NaiveDate>> for DateInput {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(DateInput::Date).unwrap_or_default()
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<Option<String>> for DateInput {
    fn from(text: Option<String>) -> Self {
        text.map(DateInput::Text).unwrap_or_default()
    }
}
