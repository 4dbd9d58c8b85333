//! Modal dialogs (delete confirmation, login detail)

use super::App;
use crate::theme;
use crate::ui::components::detail_field;
use crate::utils::{display_host, format_timestamp};
use eframe::egui;
use egui_phosphor::regular as icons;
use tracing::{debug, warn};

const CONFIRM_WIDTH: f32 = 340.0;
const DETAIL_WIDTH: f32 = 380.0;

impl App {
    pub(crate) fn render_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(confirmation) = self.controller.pending_confirmation() else {
            return;
        };

        let mut confirmed = false;
        let mut declined = false;

        let modal_area = egui::Modal::default_area(egui::Id::new("delete_confirmation"))
            .default_width(CONFIRM_WIDTH + theme::SPACING_XL * 2.0);
        let modal = egui::Modal::new(egui::Id::new("delete_confirmation"))
            .area(modal_area)
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(CONFIRM_WIDTH);
            ui.set_max_width(CONFIRM_WIDTH);

            ui.vertical_centered(|ui| {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(icons::WARNING)
                        .size(32.0)
                        .color(theme::BTN_DANGER),
                );
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(confirmation.title())
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(4.0);
                ui.label(egui::RichText::new(confirmation.message()).color(theme::TEXT_MUTED));
                ui.add_space(theme::SPACING_XL);

                ui.horizontal(|ui| {
                    let buttons_width = 170.0;
                    ui.add_space((ui.available_width() - buttons_width).max(0.0) / 2.0);
                    if ui.add(theme::button("Cancel")).clicked() {
                        declined = true;
                    }
                    if ui
                        .add(theme::button_danger(format!("{}  Remove", icons::TRASH)))
                        .clicked()
                    {
                        confirmed = true;
                    }
                });
            });
        });

        if confirmed {
            self.controller.confirm_delete();
        } else if declined || modal_response.should_close() {
            self.controller.decline_delete();
        }
    }

    pub(crate) fn render_detail_window(&mut self, ctx: &egui::Context) {
        let Some(login) = self.detail.clone() else {
            return;
        };

        let mut close = false;
        let mut open_site = false;

        let modal_area = egui::Modal::default_area(egui::Id::new("login_detail"))
            .default_width(DETAIL_WIDTH + theme::SPACING_XL * 2.0);
        let modal = egui::Modal::new(egui::Id::new("login_detail"))
            .area(modal_area)
            .backdrop_color(egui::Color32::from_black_alpha(160))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(DETAIL_WIDTH);
            ui.set_max_width(DETAIL_WIDTH);

            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(display_host(&login.hostname))
                        .size(theme::FONT_TITLE)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
            });
            ui.add_space(theme::SPACING_MD);
            ui.separator();
            ui.add_space(theme::SPACING_MD);

            detail_field(ui, "Website", &login.hostname);
            detail_field(ui, "Username", &login.username);

            let password = if self.reveal_password {
                login.password.clone()
            } else {
                "•".repeat(login.password.chars().count().min(12))
            };
            ui.horizontal(|ui| {
                ui.vertical(|ui| detail_field(ui, "Password", &password));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, hint) = if self.reveal_password {
                        (icons::EYE_SLASH, "Hide password")
                    } else {
                        (icons::EYE, "Show password")
                    };
                    if ui.add(theme::button(icon)).on_hover_text(hint).clicked() {
                        self.reveal_password = !self.reveal_password;
                    }
                });
            });

            if let Some(realm) = &login.http_realm {
                detail_field(ui, "Realm", realm);
            }
            if let Some(action) = &login.form_submit_url {
                detail_field(ui, "Form action", action);
            }
            detail_field(ui, "Created", &format_timestamp(login.time_created));
            detail_field(ui, "Last used", &format_timestamp(login.time_last_used));

            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                if ui
                    .add(theme::button(format!("{}  Open Site", icons::ARROW_SQUARE_OUT)))
                    .clicked()
                {
                    open_site = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(theme::button("Close")).clicked() {
                        close = true;
                    }
                });
            });
        });

        if open_site {
            let url = login.hostname.clone();
            debug!(url = %url, "Opening site");
            self.runtime.spawn_blocking(move || {
                if let Err(e) = open::that(&url) {
                    warn!(url = %url, error = %e, "Failed to open site");
                }
            });
        }

        if close || modal_response.should_close() {
            self.detail = None;
            self.reveal_password = false;
        }
    }
}
