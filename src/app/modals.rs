//! Modal dialogs (error alert, sign-out confirmation)

use super::App;
use crate::theme;
use eframe::egui;

impl App {
    /// Error alert raised by a failed initial load
    pub(crate) fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.screen.alert().cloned() else {
            return;
        };

        let modal_response = dialog("error_alert").show(ctx, |ui| {
            ui.set_width(theme::MODAL_WIDTH);
            ui.label(
                egui::RichText::new(&alert.title)
                    .size(theme::FONT_HEADING)
                    .strong(),
            );
            ui.add_space(theme::SPACING_MD);
            ui.label(egui::RichText::new(&alert.message).color(theme::TEXT_SECONDARY));
            ui.add_space(theme::SPACING_XL);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(theme::button("OK")).clicked()
            })
            .inner
        });

        if modal_response.inner || modal_response.should_close() {
            self.screen.dismiss_alert();
        }
    }

    pub(crate) fn render_sign_out_confirm(&mut self, ctx: &egui::Context) {
        if !self.screen.is_confirming_sign_out() {
            return;
        }

        let mut confirmed = false;
        let mut cancelled = false;

        let modal_response = dialog("sign_out_confirm").show(ctx, |ui| {
            ui.set_width(theme::MODAL_WIDTH);
            ui.label(egui::RichText::new("Logout").size(theme::FONT_HEADING).strong());
            ui.add_space(theme::SPACING_MD);
            ui.label(
                egui::RichText::new("Are you sure you want to logout?").color(theme::TEXT_SECONDARY),
            );
            ui.add_space(theme::SPACING_XL);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::button_danger("Logout")).clicked() {
                    confirmed = true;
                }
                if ui.add(theme::button("Cancel")).clicked() {
                    cancelled = true;
                }
            });
        });

        if confirmed {
            self.abort_loads();
            self.screen.confirm_sign_out(&mut self.session);
            self.images.clear();
        } else if cancelled || modal_response.should_close() {
            self.screen.cancel_sign_out();
        }
    }
}

fn dialog(id: &str) -> egui::Modal {
    egui::Modal::new(egui::Id::new(id))
        .backdrop_color(egui::Color32::from_black_alpha(180))
        .frame(theme::modal_frame())
}
