//! Reusable UI components

use crate::theme;
use eframe::egui;

/// Rounded square with the site's initial, shown until a favicon arrives.
pub fn letter_badge(ui: &mut egui::Ui, letter: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            letter,
            egui::FontId::proportional(size * 0.6),
            theme::TEXT_MUTED,
        );
    }

    response
}

/// Selection box for edit mode rows.
pub fn selection_box(ui: &mut egui::Ui, selected: bool) -> egui::Response {
    let size = theme::CHECKBOX_SIZE;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        theme::paint_checkbox(ui.painter(), rect, selected);
    }
    response
}

/// Label/value pair used in the login detail window.
pub fn detail_field(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(label)
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_DIM),
        )
        .selectable(false),
    );
    ui.add(egui::Label::new(
        egui::RichText::new(value)
            .size(theme::FONT_BODY)
            .color(theme::TEXT_SECONDARY),
    ));
    ui.add_space(theme::SPACING_MD);
}
