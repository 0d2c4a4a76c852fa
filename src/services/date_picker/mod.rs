// Date picker host
// Binds the calendar engine and persistence to a form-control contract

mod display;

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::models::calendar_date::{FocusTarget, MonthPanel};
use crate::models::restrictions::{DateInput, DateRestrictions};
use crate::models::selection::{ClickOutcome, DateRange, PickerValue, SelectionState};
use crate::models::settings::PickerConfig;
use crate::services::calendar::{CalendarEngine, CalendarKey, KeyOutcome};
use crate::services::focus::{FocusHost, FocusTrap, TabDirection};
use crate::services::persistence::{KeyValueStore, PersistenceAdapter, StoredSelection};
use crate::utils::date::{Clock, SystemClock};

pub use display::{display_value, format_date, SELECT_END_DATE};

pub type ChangeCallback = Box<dyn FnMut(Option<PickerValue>)>;
pub type TouchedCallback = Box<dyn FnMut()>;

/// Focus access as seen by the picker.
pub type PickerFocus<'a> = dyn FocusHost<Element = FocusTarget> + 'a;

/// Events emitted by the picker, drained by the embedding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    DateSelected(NaiveDate),
    RangeSelected(DateRange),
    Closed,
}

pub struct DatePickerHost<S: KeyValueStore> {
    config: PickerConfig,
    clock: Box<dyn Clock>,
    engine: CalendarEngine,
    selection: SelectionState,
    persistence: PersistenceAdapter<S>,
    focus_trap: FocusTrap<FocusTarget>,
    is_open: bool,
    touched: bool,
    disabled: bool,
    on_change: Option<ChangeCallback>,
    on_touched: Option<TouchedCallback>,
    /// Restored value waiting for a change callback to be registered.
    pending_restore: Option<PickerValue>,
    events: Vec<PickerEvent>,
}

impl<S: KeyValueStore> DatePickerHost<S> {
    pub fn new(config: PickerConfig, store: S) -> Self {
        let clock = SystemClock::from_zone_name(config.time_zone.as_deref());
        Self::with_clock(config, store, Box::new(clock))
    }

    pub fn with_clock(config: PickerConfig, store: S, clock: Box<dyn Clock>) -> Self {
        let mode = config.mode();
        let mut engine = CalendarEngine::new(mode, clock.today());
        engine.set_restrictions(config.restrictions());

        let persistence = PersistenceAdapter::new(store, config.storage_key.as_deref())
            .with_debounce(Duration::from_millis(config.persist_debounce_ms));

        let mut selection = SelectionState::new(mode);
        let mut pending_restore = None;
        if let Some(stored) = persistence.load() {
            stored.apply_to(&mut selection);
            pending_restore = selection.value();
            log::info!(
                "Restored date picker selection from '{}': {:?}",
                persistence.key(),
                stored
            );
        }
        engine.reset_view(&selection);

        Self {
            config,
            clock,
            engine,
            selection,
            persistence,
            focus_trap: FocusTrap::new(),
            is_open: false,
            touched: false,
            disabled: false,
            on_change: None,
            on_touched: None,
            pending_restore,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn engine(&self) -> &CalendarEngine {
        &self.engine
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    // ---- form-control contract ----

    pub fn value(&self) -> Option<PickerValue> {
        self.selection.value()
    }

    /// Set the value from the owning form. Does not notify or persist.
    pub fn write(&mut self, value: Option<PickerValue>) {
        if !self.selection.apply(value) {
            log::warn!(
                "Ignoring value {:?} that does not fit a {:?} picker",
                value,
                self.selection.mode()
            );
            return;
        }
        self.pending_restore = None;
        if !self.is_open {
            self.engine.reset_view(&self.selection);
        }
    }

    /// Register the change callback. A selection restored from storage is
    /// delivered to it straight away.
    pub fn on_change(&mut self, callback: impl FnMut(Option<PickerValue>) + 'static) {
        let mut callback: ChangeCallback = Box::new(callback);
        if let Some(restored) = self.pending_restore.take() {
            callback(Some(restored));
        }
        self.on_change = Some(callback);
    }

    pub fn on_touched(&mut self, callback: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(callback));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.is_open {
            self.is_open = false;
            self.selection.cancel_in_progress();
            self.focus_trap.deactivate();
            self.events.push(PickerEvent::Closed);
        }
    }

    // ---- derived state ----

    pub fn display_value(&self) -> String {
        display_value(&self.selection, &self.config)
    }

    /// Single: a date is chosen. Range: both endpoints are chosen.
    pub fn is_valid(&self) -> bool {
        self.selection.is_complete()
    }

    /// Regenerate the visible month grids.
    pub fn panels(&mut self) -> Vec<MonthPanel> {
        self.engine.set_today(self.clock.today());
        self.engine.panels(&self.selection)
    }

    pub fn focusable_targets(&mut self) -> Vec<FocusTarget> {
        self.engine.focusable_targets()
    }

    // ---- restrictions ----

    fn update_restrictions(&mut self, update: impl FnOnce(DateRestrictions) -> DateRestrictions) {
        let restrictions = update(*self.engine.restrictions());
        self.engine.set_restrictions(restrictions);
    }

    pub fn set_min_date(&mut self, date: impl Into<DateInput>) {
        let date = date.into();
        self.update_restrictions(|r| r.with_min_date(date));
    }

    pub fn set_max_date(&mut self, date: impl Into<DateInput>) {
        let date = date.into();
        self.update_restrictions(|r| r.with_max_date(date));
    }

    pub fn set_disable_future_dates(&mut self, disable: bool) {
        self.update_restrictions(|r| r.with_disable_future_dates(disable));
    }

    pub fn set_disable_past_dates(&mut self, disable: bool) {
        self.update_restrictions(|r| r.with_disable_past_dates(disable));
    }

    // ---- open / close ----

    /// Open the calendar. Returns false when disabled or already open.
    pub fn open(&mut self, focus: &mut PickerFocus<'_>) -> bool {
        if self.disabled || self.is_open {
            return false;
        }
        self.engine.set_today(self.clock.today());
        self.engine.reset_view(&self.selection);
        self.is_open = true;

        if !self.touched {
            self.touched = true;
            if let Some(callback) = self.on_touched.as_mut() {
                callback();
            }
        }

        self.focus_trap.activate(&*focus);
        if let Some(target) = self.initial_focus_target() {
            focus.focus(&target);
        }
        true
    }

    /// Where focus lands on open: the focused day when it is enabled and
    /// visible, else the first focusable element.
    pub fn initial_focus_target(&mut self) -> Option<FocusTarget> {
        let targets = self.engine.focusable_targets();
        self.engine
            .focused_date()
            .map(FocusTarget::Day)
            .filter(|target| targets.contains(target))
            .or_else(|| targets.first().copied())
    }

    /// Close without committing. An unfinished range step is abandoned and
    /// focus returns to where it was before opening.
    pub fn close(&mut self, focus: &mut PickerFocus<'_>) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.selection.cancel_in_progress();
        self.focus_trap.release(focus);
        self.events.push(PickerEvent::Closed);
    }

    pub fn toggle(&mut self, focus: &mut PickerFocus<'_>) {
        if self.is_open {
            self.close(focus);
        } else {
            self.open(focus);
        }
    }

    pub fn handle_outside_click(&mut self, focus: &mut PickerFocus<'_>) {
        if self.is_open {
            log::debug!("Click outside the calendar, closing");
            self.close(focus);
        }
    }

    // ---- interaction ----

    pub fn prev_month(&mut self) {
        self.engine.prev_month();
    }

    pub fn next_month(&mut self) {
        self.engine.next_month();
    }

    pub fn select_date(&mut self, date: NaiveDate, focus: &mut PickerFocus<'_>) -> ClickOutcome {
        let outcome = self.engine.click(&mut self.selection, date);
        if let ClickOutcome::Committed(value) = outcome {
            self.commit(value, focus);
        }
        outcome
    }

    /// Keep the keyboard cursor in step with focus that moved by other
    /// means (Tab, pointer).
    pub fn set_focused_date(&mut self, date: NaiveDate) {
        self.engine.set_focused_date(Some(date));
    }

    pub fn hover_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.engine.hover(&mut self.selection, date)
    }

    pub fn handle_key(&mut self, key: CalendarKey, focus: &mut PickerFocus<'_>) -> KeyOutcome {
        if !self.is_open {
            return KeyOutcome::Ignored;
        }
        let outcome = self.engine.handle_key(key, &mut self.selection);
        match outcome {
            KeyOutcome::FocusMoved { date, .. } => focus.focus(&FocusTarget::Day(date)),
            KeyOutcome::Click(ClickOutcome::Committed(value)) => self.commit(value, focus),
            KeyOutcome::Close => self.close(focus),
            KeyOutcome::Tab { shift } => {
                self.focus_trap
                    .handle_tab(focus, TabDirection::from_shift(shift));
            }
            KeyOutcome::Click(_) | KeyOutcome::Ignored => {}
        }
        outcome
    }

    /// Reset to nothing selected, forget the saved selection and notify the
    /// form.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.pending_restore = None;
        self.persistence.clear();
        self.notify_change(None);
    }

    fn commit(&mut self, value: PickerValue, focus: &mut PickerFocus<'_>) {
        self.persistence.save(&StoredSelection::from_value(&value));
        self.notify_change(Some(value));
        self.events.push(match value {
            PickerValue::Single(date) => PickerEvent::DateSelected(date),
            PickerValue::Range(range) => PickerEvent::RangeSelected(range),
        });
        if self.config.close_on_select {
            self.close(focus);
        }
    }

    fn notify_change(&mut self, value: Option<PickerValue>) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }

    pub fn drain_events(&mut self) -> Vec<PickerEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- persistence ----

    /// Drive the debounced write; call once per UI frame.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.persistence.flush_due(now)
    }

    pub fn flush_persistence(&mut self) -> bool {
        self.persistence.flush()
    }

    pub fn has_pending_write(&self) -> bool {
        self.persistence.has_pending()
    }
}
