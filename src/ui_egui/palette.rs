use egui::{Color32, Visuals};

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Colours for the picker's day cells, derived from the active egui theme.
#[derive(Clone, Copy)]
pub(crate) struct PickerPalette {
    pub text: Color32,
    pub weak_text: Color32,
    pub disabled_text: Color32,
    pub selected_bg: Color32,
    pub selected_text: Color32,
    pub range_bg: Color32,
    pub hover_bg: Color32,
    pub today_border: Color32,
    pub focus_ring: Color32,
}

impl PickerPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let accent = visuals.selection.bg_fill;
        let background = visuals.extreme_bg_color;
        Self {
            text: visuals.text_color(),
            weak_text: visuals.weak_text_color(),
            disabled_text: with_alpha(visuals.weak_text_color(), if visuals.dark_mode { 90 } else { 110 }),
            selected_bg: accent,
            selected_text: visuals.strong_text_color(),
            range_bg: blend(background, accent, 0.35),
            hover_bg: visuals.widgets.hovered.weak_bg_fill,
            today_border: blend(accent, visuals.text_color(), 0.3),
            focus_ring: visuals.selection.stroke.color,
        }
    }
}
