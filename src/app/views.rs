//! View rendering (toolbar, search field, sectioned list, section index)

use super::{flat_rows, App, FlatRow};
use crate::logins::controller::RowTap;
use crate::logins::Position;
use crate::theme;
use crate::ui::components::{letter_badge, selection_box};
use crate::utils::display_host;
use eframe::egui;
use egui_phosphor::regular as icons;

impl App {
    pub(crate) fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let row_height = self.settings.row_height;

        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(self.controller.title())
                        .size(theme::FONT_TITLE)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                )
                .selectable(false),
            );
            if self.controller.is_loading() || self.controller.is_deleting() {
                ui.add(egui::Spinner::new().size(14.0).color(theme::TEXT_DIM));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.controller.is_editing() {
                    if ui.add(theme::button("Cancel")).clicked() {
                        self.controller.cancel_editing();
                    }

                    let delete = theme::button_danger(format!("{}  Delete", icons::TRASH));
                    if ui
                        .add_enabled(self.controller.delete_enabled(), delete)
                        .clicked()
                    {
                        self.controller.request_delete();
                    }

                    if self.controller.select_all_visible() {
                        let select_all = theme::button(self.controller.select_all_label())
                            .min_size(egui::vec2(0.0, row_height * 0.6));
                        if ui.add(select_all).clicked() {
                            self.controller.toggle_select_all();
                        }
                    }
                } else if self.controller.edit_enabled() {
                    let edit = theme::button(format!("{}  Edit", icons::PENCIL_SIMPLE));
                    if ui.add(edit).clicked() {
                        self.controller.begin_editing();
                    }
                }
            });
        });

        ui.add_space(theme::SPACING_MD);
        self.render_search_field(ui);
    }

    fn render_search_field(&mut self, ui: &mut egui::Ui) {
        let searching = self.controller.is_searching();

        theme::search_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(icons::MAGNIFYING_GLASS)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );

                let clear_width = if searching { 24.0 } else { 0.0 };
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .hint_text("Search logins")
                        .frame(false)
                        .desired_width(ui.available_width() - clear_width),
                );

                if response.gained_focus() {
                    self.controller.begin_search();
                }
                if response.changed() {
                    self.controller.search_text_changed(&self.search_query);
                }
                let escaped = ui.input(|i| i.key_pressed(egui::Key::Escape));
                if response.lost_focus() && (escaped || self.search_query.is_empty()) {
                    self.search_query.clear();
                    self.controller.end_search();
                }

                if searching {
                    let clear = ui.add(
                        egui::Label::new(
                            egui::RichText::new(icons::X)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_MUTED),
                        )
                        .selectable(false)
                        .sense(egui::Sense::click()),
                    );
                    if clear.clicked() {
                        self.search_query.clear();
                        response.surrender_focus();
                        self.controller.end_search();
                    }
                }
            });
        });
    }

    pub(crate) fn render_list_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use egui_extras::{Column, TableBuilder};

        let rows = flat_rows(self.controller.data_source());
        if rows.is_empty() {
            self.render_empty_state(ui);
            return;
        }

        let row_height = self.settings.row_height;
        let full_rect = ui.available_rect_before_wrap();
        let index_width = if self.settings.show_section_index {
            theme::INDEX_WIDTH
        } else {
            0.0
        };
        let editing = self.controller.is_editing();
        let mut tapped: Option<Position> = None;

        let mut table = TableBuilder::new(ui)
            .striped(false)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .sense(egui::Sense::click())
            .min_scrolled_height(0.0)
            .column(Column::remainder().at_most(full_rect.width() - index_width));

        if let Some(target) = self.scroll_target_row.take() {
            table = table.scroll_to_row(target, Some(egui::Align::TOP));
        }

        let mut first_visible_row: Option<usize> = None;
        table.body(|mut body| {
            body.ui_mut().visuals_mut().selection.bg_fill = theme::TABLE_ROW_SELECTED;

            body.rows(row_height, rows.len(), |mut row| {
                let row_idx = row.index();
                first_visible_row.get_or_insert(row_idx);

                match rows[row_idx] {
                    FlatRow::Header(section) => {
                        let title = self
                            .controller
                            .data_source()
                            .section_title(section)
                            .unwrap_or_default()
                            .to_string();
                        row.col(|ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(title)
                                        .size(theme::FONT_SMALL)
                                        .strong()
                                        .color(theme::ACCENT),
                                )
                                .selectable(false),
                            );
                        });
                    }
                    FlatRow::Login(position) => {
                        let selected = editing && self.controller.is_selected(position);
                        row.set_selected(selected);
                        row.col(|ui| self.render_login_row(ui, ctx, position, editing, selected));

                        let response = row.response();
                        if response.hovered() {
                            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if response.clicked() {
                            tapped = Some(position);
                        }
                    }
                }
            });
        });

        if self.settings.show_section_index {
            let current = first_visible_row.unwrap_or(0);
            if let Some(target) = self.render_section_index(ui, full_rect, &rows, current) {
                self.scroll_target_row = Some(target);
            }
        }

        if let Some(position) = tapped {
            if let RowTap::OpenDetail(login) = self.controller.tap_row(position) {
                self.open_detail(login);
            }
        }
    }

    fn render_login_row(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        position: Position,
        editing: bool,
        selected: bool,
    ) {
        let Ok(login) = self.controller.data_source().record_at(position) else {
            return;
        };
        let guid = login.guid.clone();
        let host = display_host(&login.hostname).to_string();
        let username = if login.username.is_empty() {
            "(no username)".to_string()
        } else {
            login.username.clone()
        };

        if editing {
            selection_box(ui, selected);
        }

        match self.favicon_texture(ctx, &guid) {
            Some(texture) => {
                let size = egui::vec2(theme::FAVICON_SIZE, theme::FAVICON_SIZE);
                ui.image(egui::load::SizedTexture::new(texture.id(), size));
            }
            None => {
                let letter = self
                    .controller
                    .data_source()
                    .section_title(position.section)
                    .unwrap_or("?")
                    .to_string();
                letter_badge(ui, &letter, theme::FAVICON_SIZE);
            }
        }

        ui.vertical(|ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            ui.add(
                egui::Label::new(
                    egui::RichText::new(host)
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_PRIMARY),
                )
                .truncate()
                .selectable(false),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new(username)
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .truncate()
                .selectable(false),
            );
        });
    }

    fn render_empty_state(&self, ui: &mut egui::Ui) {
        let text = if self.controller.is_loading() {
            "Loading…"
        } else if self.controller.is_searching() && !self.search_query.is_empty() {
            "No logins match your search"
        } else {
            "No saved logins"
        };
        ui.centered_and_justified(|ui| {
            ui.add(
                egui::Label::new(egui::RichText::new(text).color(theme::TEXT_DIM))
                    .selectable(false),
            );
        });
    }

    /// Letter index along the right edge. Returns the flat row to jump to.
    fn render_section_index(
        &self,
        ui: &mut egui::Ui,
        list_rect: egui::Rect,
        rows: &[FlatRow],
        current_row: usize,
    ) -> Option<usize> {
        let markers: Vec<(usize, usize)> = rows
            .iter()
            .enumerate()
            .filter_map(|(row_idx, row)| match row {
                FlatRow::Header(section) => Some((*section, row_idx)),
                FlatRow::Login(_) => None,
            })
            .collect();
        if markers.is_empty() {
            return None;
        }

        let track_rect = egui::Rect::from_min_max(
            egui::pos2(list_rect.max.x - theme::INDEX_WIDTH, list_rect.min.y),
            list_rect.max,
        );
        let marker_height = (track_rect.height() / markers.len() as f32).clamp(10.0, 16.0);

        let current_marker = markers
            .iter()
            .rposition(|(_, row_idx)| current_row >= *row_idx)
            .unwrap_or(0);

        let titles = self.controller.data_source().section_titles();
        let mut clicked_row = None;
        let painter = ui.painter();

        for (i, (section, row_idx)) in markers.iter().enumerate() {
            let marker_rect = egui::Rect::from_min_size(
                egui::pos2(track_rect.min.x, track_rect.min.y + i as f32 * marker_height),
                egui::vec2(theme::INDEX_WIDTH, marker_height),
            );
            let response = ui.interact(marker_rect, ui.id().with(("section_idx", i)), egui::Sense::click());

            let is_current = i == current_marker;
            if is_current {
                painter.rect_filled(marker_rect, 2.0, theme::INDEX_ACTIVE);
            }
            let color = if is_current || response.hovered() {
                theme::TEXT_PRIMARY
            } else {
                theme::TEXT_DIM
            };
            painter.text(
                marker_rect.center(),
                egui::Align2::CENTER_CENTER,
                titles.get(*section).copied().unwrap_or("?"),
                egui::FontId::proportional(10.0),
                color,
            );

            if response.clicked() {
                clicked_row = Some(*row_idx);
            }
        }

        clicked_row
    }
}
