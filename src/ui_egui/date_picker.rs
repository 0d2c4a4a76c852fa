//! egui rendering of a [`DatePickerHost`].
//!
//! Draws the toggle field and, while open, a popup with one or two month
//! panels. Interaction is collected into actions during painting and applied
//! to the host afterwards.

use std::hash::Hash;
use std::time::Duration;

use chrono::NaiveDate;
use egui::{
    Align2, EventFilter, FontId, Id, Key, Modifiers, Rect, Response, RichText, Sense, Stroke, Ui,
    Vec2,
};

use super::focus::{target_id, EguiFocus};
use super::palette::PickerPalette;
use crate::models::calendar_date::{CalendarDate, FocusTarget, MonthPanel};
use crate::services::calendar::CalendarKey;
use crate::services::date_picker::DatePickerHost;
use crate::services::focus::FocusHost;
use crate::services::persistence::KeyValueStore;

const DAY_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_SIZE: Vec2 = Vec2::new(28.0, 24.0);

/// Keys the picker routes itself while one of its widgets has focus.
const PICKER_KEYS: EventFilter = EventFilter {
    tab: true,
    horizontal_arrows: true,
    vertical_arrows: true,
    escape: true,
};

enum PickerAction {
    PrevMonth,
    NextMonth,
    Select(NaiveDate),
    Hover(Option<NaiveDate>),
    Clear,
    Close,
}

/// Show the picker. Returns the toggle field's response.
pub fn date_picker<S: KeyValueStore>(
    ui: &mut Ui,
    host: &mut DatePickerHost<S>,
    id_salt: impl Hash,
) -> Response {
    let base = ui.make_persistent_id(id_salt);
    let ctx = ui.ctx().clone();

    let toggle = toggle_field(ui, host, base);
    let was_open = host.is_open();
    if toggle.clicked() {
        // Focus the field first so closing hands focus back to it.
        toggle.request_focus();
        let mut focus = EguiFocus::new(&ctx, base, host.focusable_targets());
        host.toggle(&mut focus);
    }
    let initial_focus = base.with("initial_focus");
    if !was_open && host.is_open() {
        ctx.data_mut(|d| d.insert_temp(initial_focus, true));
    }

    if host.is_open() {
        let panels = host.panels();
        let mut actions = Vec::new();
        let popup = egui::Area::new(base.with("popup"))
            .order(egui::Order::Foreground)
            .fixed_pos(toggle.rect.left_bottom() + Vec2::new(0.0, 4.0))
            .show(&ctx, |ui| {
                let sizing_pass = ui.is_sizing_pass();
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    calendar_body(ui, &panels, base, &mut actions);
                });
                sizing_pass
            });

        let hovered_day = actions
            .iter()
            .any(|action| matches!(action, PickerAction::Hover(_)));
        // Only pointer movement clears the preview, so a preview driven by
        // the keyboard survives a resting mouse.
        let pointer_moved = ctx.input(|i| {
            i.pointer.delta() != Vec2::ZERO
                || i.events.iter().any(|e| matches!(e, egui::Event::PointerGone))
        });
        if !hovered_day && pointer_moved {
            actions.push(PickerAction::Hover(None));
        }

        let mut focus = EguiFocus::new(&ctx, base, host.focusable_targets());
        // The first frame of a new popup only measures it and its widgets
        // drop focus, so the opening focus is applied once it is drawn.
        let pending = ctx.data(|d| d.get_temp::<bool>(initial_focus)).unwrap_or(false);
        if pending && !popup.inner {
            ctx.data_mut(|d| d.remove::<bool>(initial_focus));
            if let Some(target) = host.initial_focus_target() {
                focus.focus(&target);
                ctx.request_repaint();
            }
        }

        for action in actions {
            match action {
                PickerAction::PrevMonth => host.prev_month(),
                PickerAction::NextMonth => host.next_month(),
                PickerAction::Select(date) => {
                    host.select_date(date, &mut focus);
                }
                PickerAction::Hover(date) => {
                    host.hover_date(date);
                }
                PickerAction::Clear => host.clear_selection(),
                PickerAction::Close => host.close(&mut focus),
            }
        }

        if host.is_open() {
            handle_keyboard(&ctx, host, base);
        }

        let popup_rect = popup.response.rect;
        let clicked_outside = ctx.input(|i| {
            i.pointer.any_click()
                && i.pointer
                    .interact_pos()
                    .is_some_and(|pos| !popup_rect.contains(pos) && !toggle.rect.contains(pos))
        });
        if clicked_outside {
            let mut focus = EguiFocus::new(&ctx, base, host.focusable_targets());
            host.handle_outside_click(&mut focus);
        }
    }

    host.tick();
    if host.has_pending_write() {
        ctx.request_repaint_after(Duration::from_millis(host.config().persist_debounce_ms));
    }

    toggle
}

fn toggle_field<S: KeyValueStore>(ui: &mut Ui, host: &DatePickerHost<S>, base: Id) -> Response {
    let id = target_id(base, FocusTarget::Toggle);
    let width = ui.spacing().interact_size.x.max(220.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 26.0), Sense::hover());
    let sense = if host.is_disabled() {
        Sense::hover()
    } else {
        Sense::click()
    };
    let response = ui.interact(rect, id, sense);

    let visuals = ui.style().interact_selectable(&response, host.is_open());
    ui.painter()
        .rect(rect, 3.0, visuals.weak_bg_fill, visuals.bg_stroke);
    if response.has_focus() {
        ui.painter()
            .rect_stroke(rect, 3.0, Stroke::new(1.5, ui.visuals().selection.stroke.color));
    }

    let text_color = if host.value().is_some() {
        visuals.text_color()
    } else {
        ui.visuals().weak_text_color()
    };
    ui.painter().text(
        rect.left_center() + Vec2::new(8.0, 0.0),
        Align2::LEFT_CENTER,
        format!("📅 {}", host.display_value()),
        FontId::proportional(14.0),
        text_color,
    );
    response
}

fn calendar_body(ui: &mut Ui, panels: &[MonthPanel], base: Id, actions: &mut Vec<PickerAction>) {
    let palette = PickerPalette::from_visuals(ui.visuals());
    let last = panels.len().saturating_sub(1);

    ui.horizontal_top(|ui| {
        for (index, panel) in panels.iter().enumerate() {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    if index == 0 {
                        if nav_button(ui, base, FocusTarget::PrevMonth, "◀")
                            .on_hover_text("Previous month")
                            .clicked()
                        {
                            actions.push(PickerAction::PrevMonth);
                        }
                    } else {
                        ui.add_space(CELL_SIZE.x);
                    }

                    let title_width = CELL_SIZE.x * 5.0;
                    ui.allocate_ui(Vec2::new(title_width, CELL_SIZE.y), |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.label(RichText::new(panel.title()).strong());
                        });
                    });

                    if index == last {
                        if nav_button(ui, base, FocusTarget::NextMonth, "▶")
                            .on_hover_text("Next month")
                            .clicked()
                        {
                            actions.push(PickerAction::NextMonth);
                        }
                    } else {
                        ui.add_space(CELL_SIZE.x);
                    }
                });

                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for name in DAY_NAMES {
                        let (rect, _) = ui.allocate_exact_size(CELL_SIZE, Sense::hover());
                        ui.painter().text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            name,
                            FontId::proportional(11.0),
                            palette.weak_text,
                        );
                    }
                });

                for week in panel.weeks() {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        for day in week {
                            day_cell(ui, day, base, &palette, actions);
                        }
                    });
                }
            });
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        if nav_button(ui, base, FocusTarget::Clear, "Clear").clicked() {
            actions.push(PickerAction::Clear);
        }
        if nav_button(ui, base, FocusTarget::Close, "Close").clicked() {
            actions.push(PickerAction::Close);
        }
    });
}

fn nav_button(ui: &mut Ui, base: Id, target: FocusTarget, label: &str) -> Response {
    let galley_width = label.chars().count() as f32 * 8.0 + 12.0;
    let size = Vec2::new(galley_width.max(CELL_SIZE.x), CELL_SIZE.y);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let response = ui.interact(rect, target_id(base, target), Sense::click());

    let visuals = ui.style().interact(&response);
    ui.painter()
        .rect(rect, 3.0, visuals.weak_bg_fill, visuals.bg_stroke);
    if response.has_focus() {
        ui.painter()
            .rect_stroke(rect, 3.0, Stroke::new(1.5, ui.visuals().selection.stroke.color));
    }
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(13.0),
        visuals.text_color(),
    );
    response
}

fn day_cell(
    ui: &mut Ui,
    day: &CalendarDate,
    base: Id,
    palette: &PickerPalette,
    actions: &mut Vec<PickerAction>,
) {
    let (rect, _) = ui.allocate_exact_size(CELL_SIZE, Sense::hover());

    // Leading and trailing days only fill the grid.
    if !day.is_current_month {
        paint_day_label(ui, rect, day, palette.disabled_text);
        return;
    }

    // Disabled days still take keyboard focus so arrows can pass over them.
    let sense = if day.is_disabled {
        Sense::focusable_noninteractive()
    } else {
        Sense::click()
    };
    let response = ui.interact(rect, target_id(base, FocusTarget::Day(day.date)), sense);

    let is_endpoint = day.is_selected || day.is_range_start || day.is_range_end;
    let painter = ui.painter();
    if is_endpoint {
        painter.rect_filled(rect.shrink(1.0), 4.0, palette.selected_bg);
    } else if day.is_in_range {
        painter.rect_filled(rect, 0.0, palette.range_bg);
    } else if (day.is_hovered || response.hovered()) && !day.is_disabled {
        painter.rect_filled(rect.shrink(1.0), 4.0, palette.hover_bg);
    }
    if day.is_today {
        painter.rect_stroke(rect.shrink(1.0), 4.0, Stroke::new(1.0, palette.today_border));
    }
    if response.has_focus() {
        painter.rect_stroke(rect.shrink(0.5), 4.0, Stroke::new(2.0, palette.focus_ring));
    }

    let text_color = if day.is_disabled {
        palette.disabled_text
    } else if is_endpoint {
        palette.selected_text
    } else {
        palette.text
    };
    paint_day_label(ui, rect, day, text_color);

    if day.is_disabled {
        return;
    }
    if response.clicked() {
        actions.push(PickerAction::Select(day.date));
    } else if response.hovered() {
        actions.push(PickerAction::Hover(Some(day.date)));
    }
}

fn paint_day_label(ui: &Ui, rect: Rect, day: &CalendarDate, color: egui::Color32) {
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        day.day_label(),
        FontId::proportional(13.0),
        color,
    );
}

/// Route keys to the host while the popup is open. Navigation keys only
/// apply while a day cell has focus; Enter and Space reach day cells as
/// clicks through egui itself.
///
/// egui's own Tab, arrow and Escape handling is locked out for whichever
/// picker widget holds focus, so each key moves focus once.
fn handle_keyboard<S: KeyValueStore>(ctx: &egui::Context, host: &mut DatePickerHost<S>, base: Id) {
    let mut focus = EguiFocus::new(ctx, base, host.focusable_targets());
    let focused_id = ctx.memory(|m| m.focused());
    let active = focus.active_element();
    let focused_day = match active {
        Some(FocusTarget::Day(date)) => Some(date),
        // Disabled days are not in the Tab order but can hold focus.
        _ => host
            .engine()
            .focused_date()
            .filter(|date| focused_id == Some(target_id(base, FocusTarget::Day(*date)))),
    };
    if let Some(date) = focused_day {
        if host.engine().focused_date() != Some(date) {
            host.set_focused_date(date);
        }
    }
    if let Some(id) = focused_id {
        if active.is_some() || focused_day.is_some() {
            ctx.memory_mut(|m| m.set_focus_lock_filter(id, PICKER_KEYS));
        }
    }

    let mut keys = Vec::new();
    ctx.input_mut(|i| {
        if i.consume_key(Modifiers::NONE, Key::Escape) {
            keys.push(CalendarKey::Escape);
        }
        if i.consume_key(Modifiers::SHIFT, Key::Tab) {
            keys.push(CalendarKey::Tab { shift: true });
        }
        if i.consume_key(Modifiers::NONE, Key::Tab) {
            keys.push(CalendarKey::Tab { shift: false });
        }
        if focused_day.is_some() {
            for (key, calendar_key) in [
                (Key::ArrowLeft, CalendarKey::ArrowLeft),
                (Key::ArrowRight, CalendarKey::ArrowRight),
                (Key::ArrowUp, CalendarKey::ArrowUp),
                (Key::ArrowDown, CalendarKey::ArrowDown),
                (Key::Home, CalendarKey::Home),
                (Key::End, CalendarKey::End),
                (Key::PageUp, CalendarKey::PageUp),
                (Key::PageDown, CalendarKey::PageDown),
            ] {
                if i.consume_key(Modifiers::NONE, key) {
                    keys.push(calendar_key);
                }
            }
        }
    });

    if keys.is_empty() {
        return;
    }
    for key in keys {
        host.handle_key(key, &mut focus);
        if !host.is_open() {
            break;
        }
    }
    // The focus lock only takes hold once the new widget has kept focus
    // for a frame.
    ctx.request_repaint();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::selection::PickerValue;
    use crate::models::settings::PickerConfig;
    use crate::services::persistence::MemoryStore;
    use crate::utils::date::FixedClock;
    use egui::{Context, Event, PointerButton, Pos2, RawInput};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Runs the picker in a headless egui context, one frame per call.
    struct Harness {
        ctx: Context,
        host: DatePickerHost<MemoryStore>,
        base: Id,
        toggle: Rect,
    }

    impl Harness {
        fn new(config: PickerConfig) -> Self {
            let host = DatePickerHost::with_clock(
                config,
                MemoryStore::new(),
                Box::new(FixedClock(ymd(2024, 6, 12))),
            );
            let mut harness = Self {
                ctx: Context::default(),
                host,
                base: Id::NULL,
                toggle: Rect::NOTHING,
            };
            harness.settle();
            harness
        }

        fn frame(&mut self, events: Vec<Event>) {
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
                events,
                ..Default::default()
            };
            let host = &mut self.host;
            let mut base = Id::NULL;
            let mut toggle = Rect::NOTHING;
            let _ = self.ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    base = ui.make_persistent_id("picker");
                    toggle = date_picker(ui, host, "picker").rect;
                });
            });
            self.base = base;
            self.toggle = toggle;
        }

        /// Idle frames, enough for pending focus requests and locks to land.
        fn settle(&mut self) {
            for _ in 0..3 {
                self.frame(Vec::new());
            }
        }

        fn press(&mut self, key: Key, modifiers: Modifiers) {
            self.frame(vec![Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers,
            }]);
            self.settle();
        }

        fn click_at(&mut self, pos: Pos2) {
            self.frame(vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::NONE,
                },
            ]);
            self.frame(vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::NONE,
            }]);
            self.settle();
        }

        fn move_to(&mut self, pos: Pos2) {
            self.frame(vec![Event::PointerMoved(pos)]);
        }

        fn open(&mut self) {
            let toggle = self.toggle.center();
            self.click_at(toggle);
            assert!(self.host.is_open());
        }

        fn id(&self, target: FocusTarget) -> Id {
            target_id(self.base, target)
        }

        fn focused(&self) -> Option<Id> {
            self.ctx.memory(|m| m.focused())
        }

        fn focus(&mut self, target: FocusTarget) {
            let id = self.id(target);
            self.ctx.memory_mut(|m| m.request_focus(id));
            self.settle();
        }

        fn cell_center(&self, date: NaiveDate) -> Pos2 {
            let id = self.id(FocusTarget::Day(date));
            self.ctx
                .read_response(id)
                .map(|response| response.rect.center())
                .unwrap_or_else(|| panic!("no cell drawn for {date}"))
        }
    }

    #[test]
    fn test_first_open_focuses_selected_day() {
        let mut harness = Harness::new(PickerConfig::single());
        harness.host.write(Some(PickerValue::Single(ymd(2024, 6, 20))));

        harness.open();

        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 20)))));
    }

    #[test]
    fn test_arrow_right_moves_one_day() {
        let mut harness = Harness::new(PickerConfig::single());
        harness.open();
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 12)))));

        harness.press(Key::ArrowRight, Modifiers::NONE);
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 13)))));
        assert_eq!(harness.host.engine().focused_date(), Some(ymd(2024, 6, 13)));

        harness.press(Key::ArrowDown, Modifiers::NONE);
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 20)))));
    }

    #[test]
    fn test_tab_moves_one_element() {
        let mut harness = Harness::new(PickerConfig::single());
        harness.open();

        harness.press(Key::Tab, Modifiers::NONE);

        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 13)))));
    }

    #[test]
    fn test_tab_from_close_wraps_to_prev_month() {
        let mut harness = Harness::new(PickerConfig::single());
        harness.open();
        harness.focus(FocusTarget::Close);

        harness.press(Key::Tab, Modifiers::NONE);
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::PrevMonth)));

        harness.press(Key::Tab, Modifiers::SHIFT);
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Close)));
        assert!(harness.host.is_open());
    }

    #[test]
    fn test_escape_restores_toggle_focus() {
        let mut harness = Harness::new(PickerConfig::single());
        harness.open();

        harness.press(Key::Escape, Modifiers::NONE);

        assert!(!harness.host.is_open());
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Toggle)));
    }

    #[test]
    fn test_arrows_cross_disabled_days() {
        let mut config = PickerConfig::single();
        config.max_date = Some("2024-06-13".to_string());
        let mut harness = Harness::new(config);
        harness.open();

        harness.press(Key::ArrowRight, Modifiers::NONE);
        harness.press(Key::ArrowRight, Modifiers::NONE);
        let disabled = ymd(2024, 6, 14);
        assert_eq!(harness.host.engine().focused_date(), Some(disabled));
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(disabled))));

        harness.press(Key::ArrowLeft, Modifiers::NONE);
        assert_eq!(harness.focused(), Some(harness.id(FocusTarget::Day(ymd(2024, 6, 13)))));
    }

    #[test]
    fn test_pointer_leaving_enabled_days_clears_hover() {
        let mut config = PickerConfig::range();
        config.max_date = Some("2024-06-20".to_string());
        let mut harness = Harness::new(config);
        harness.open();

        let start = harness.cell_center(ymd(2024, 6, 10));
        harness.click_at(start);
        assert!(harness.host.selection().selection_in_progress());

        let enabled = harness.cell_center(ymd(2024, 6, 15));
        harness.move_to(enabled);
        assert_eq!(harness.host.selection().hover_date(), Some(ymd(2024, 6, 15)));

        let disabled = harness.cell_center(ymd(2024, 6, 25));
        harness.move_to(disabled);
        assert_eq!(harness.host.selection().hover_date(), None);

        harness.move_to(enabled);
        assert_eq!(harness.host.selection().hover_date(), Some(ymd(2024, 6, 15)));
        harness.move_to(Pos2::new(790.0, 590.0));
        assert_eq!(harness.host.selection().hover_date(), None);
    }
}
