//! Persistence of the picker selection.
//!
//! Selections are written as date-only strings under a caller supplied key.
//! Writes are debounced; every storage failure is logged and swallowed so
//! the live selection never depends on storage health.

mod sqlite;
mod store;

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::selection::{PickerValue, SelectionMode, SelectionState};
use crate::utils::date::{format_date_only, parse_date_only};

pub use sqlite::SqliteStore;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

#[cfg(test)]
pub use store::MockKeyValueStore;

/// Slot used when the caller does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "date-picker-selection";

/// Persisted form: `{ "selectedDate": "YYYY-MM-DD" }` or
/// `{ "startDate": "YYYY-MM-DD", "endDate": "YYYY-MM-DD" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl StoredSelection {
    pub fn from_value(value: &PickerValue) -> Self {
        match value {
            PickerValue::Single(date) => Self {
                selected_date: Some(format_date_only(*date)),
                ..Self::default()
            },
            PickerValue::Range(range) => Self {
                start_date: Some(format_date_only(range.start)),
                end_date: Some(format_date_only(range.end)),
                ..Self::default()
            },
        }
    }

    /// Only complete selections have a stored form.
    pub fn from_selection(selection: &SelectionState) -> Option<Self> {
        selection.value().as_ref().map(Self::from_value)
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        parse_field("selectedDate", self.selected_date.as_deref())
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_field("startDate", self.start_date.as_deref())
    }

    pub fn end(&self) -> Option<NaiveDate> {
        parse_field("endDate", self.end_date.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.selected_date.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Write the fields relevant to `selection`'s mode into it. Unreadable
    /// fields count as absent.
    pub fn apply_to(&self, selection: &mut SelectionState) {
        match selection.mode() {
            SelectionMode::Single => {
                selection.apply(self.selected().map(PickerValue::Single));
            }
            SelectionMode::Range => selection.restore_range(self.start(), self.end()),
        }
    }
}

fn parse_field(name: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    match parse_date_only(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!("Ignoring stored {}: {}", name, err);
            None
        }
    }
}

#[derive(Debug, Clone)]
struct PendingWrite {
    payload: String,
    queued_at: Instant,
}

pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
    key: String,
    debounce: Duration,
    pending: Option<PendingWrite>,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, key: Option<&str>) -> Self {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(DEFAULT_STORAGE_KEY)
            .to_string();
        Self {
            store,
            key,
            debounce: Duration::from_millis(crate::models::settings::DEFAULT_DEBOUNCE_MS),
            pending: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn save(&mut self, selection: &StoredSelection) {
        self.save_at(selection, Instant::now());
    }

    /// Queue a write. A newer save replaces the queued one and restarts the
    /// debounce window.
    pub fn save_at(&mut self, selection: &StoredSelection, now: Instant) {
        match serde_json::to_string(selection) {
            Ok(payload) => {
                self.pending = Some(PendingWrite {
                    payload,
                    queued_at: now,
                });
            }
            Err(err) => log::warn!("Failed to serialize selection for '{}': {}", self.key, err),
        }
    }

    /// Write the queued selection if its debounce window has elapsed.
    /// Returns true when a write was attempted.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now.saturating_duration_since(pending.queued_at) >= self.debounce => {
                self.flush()
            }
            _ => false,
        }
    }

    /// Write the queued selection immediately.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match self.store.set(&self.key, &pending.payload) {
            Ok(()) => log::debug!("Persisted selection under '{}'", self.key),
            Err(err) => log::warn!("Failed to persist selection under '{}': {}", self.key, err),
        }
        true
    }

    /// Read the saved selection. Missing, unreadable or malformed data all
    /// read as `None`. A queued, not yet written save is returned as is.
    pub fn load(&self) -> Option<StoredSelection> {
        let raw = match &self.pending {
            Some(pending) => pending.payload.clone(),
            None => match self.store.get(&self.key) {
                Ok(Some(raw)) => raw,
                Ok(None) => return None,
                Err(err) => {
                    log::warn!("Failed to read saved selection '{}': {}", self.key, err);
                    return None;
                }
            },
        };

        match serde_json::from_str::<StoredSelection>(&raw) {
            Ok(stored) if stored.is_empty() => None,
            Ok(stored) => Some(stored),
            Err(err) => {
                log::warn!("Discarding malformed saved selection '{}': {}", self.key, err);
                None
            }
        }
    }

    /// Drop any queued write and remove the slot.
    pub fn clear(&mut self) {
        self.pending = None;
        if let Err(err) = self.store.remove(&self.key) {
            log::warn!("Failed to clear saved selection '{}': {}", self.key, err);
        }
    }
}

impl<S: KeyValueStore> Drop for PersistenceAdapter<S> {
    fn drop(&mut self) {
        self.flush();
    }
}
