//! egui visuals for the persisted light/dark theme.

use eframe::egui;
use shared::domain::Theme;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);
const PANEL_ROUNDING: u8 = 8;

pub fn visuals_for_theme(theme: Theme) -> egui::Visuals {
    let mut visuals = match theme {
        Theme::Dark => {
            let mut v = egui::Visuals::dark();
            v.window_fill = egui::Color32::from_rgb(30, 31, 34);
            v.panel_fill = egui::Color32::from_rgb(30, 31, 34);
            v.extreme_bg_color = egui::Color32::from_rgb(43, 45, 49);
            v.faint_bg_color = egui::Color32::from_rgb(29, 29, 30);
            v
        }
        Theme::Light => egui::Visuals::light(),
    };

    visuals.hyperlink_color = ACCENT;
    visuals.window_corner_radius = egui::CornerRadius::same(PANEL_ROUNDING);
    visuals.menu_corner_radius = egui::CornerRadius::same(PANEL_ROUNDING);
    visuals.selection.bg_fill = ACCENT;
    visuals
}

pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let mut style = (*ctx.style()).clone();
    style.visuals = visuals_for_theme(theme);

    // Make text inputs reliably clickable and visible:
    style.visuals.widgets.inactive.bg_stroke =
        egui::Stroke::new(1.0, style.visuals.widgets.noninteractive.bg_stroke.color);
    style.visuals.widgets.active.bg_stroke =
        egui::Stroke::new(1.2, style.visuals.selection.bg_fill.gamma_multiply(0.9));
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_selects_matching_egui_base() {
        assert!(visuals_for_theme(Theme::Dark).dark_mode);
        assert!(!visuals_for_theme(Theme::Light).dark_mode);
    }
}
