//! View rendering: picks loading / error / ready from the screen state

use super::images::CardImages;
use super::App;
use crate::constants::MSG_LOADING;
use crate::session::AuthProvider;
use crate::theme;
use crate::types::{DisplayItem, ScreenState};
use crate::ui::components;
use eframe::egui;

impl App {
    pub(crate) fn render_screen(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.session.user_id().is_none() {
            self.render_signed_out(ui, ctx);
            return;
        }

        match self.screen.state() {
            ScreenState::Loading => components::loading_spinner(ui, MSG_LOADING),
            ScreenState::Error(message) => {
                let message = message.clone();
                self.render_error(ui, ctx, &message);
            }
            ScreenState::Ready(items) => {
                if render_ready(ui, ctx, items, &mut self.images) {
                    self.screen.request_sign_out();
                }
            }
        }
    }

    fn render_error(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, message: &str) {
        if components::header(ui) {
            self.screen.request_sign_out();
        }

        let mut retry = false;
        ui.vertical_centered(|ui| {
            ui.add_space((ui.available_height() / 2.0 - 120.0).max(theme::SPACING_XXL));
            ui.label(
                egui::RichText::new(egui_phosphor::regular::WARNING)
                    .size(theme::ICON_LARGE)
                    .color(theme::TEXT_LIGHT),
            );
            ui.add_space(theme::SPACING_XL);
            ui.label(
                egui::RichText::new("Unable to Load Favorites")
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            ui.add_space(theme::SPACING_MD);
            ui.label(
                egui::RichText::new(message)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_LIGHT),
            );
            ui.add_space(theme::SPACING_XXL);
            if ui.add(theme::button_accent("Try Again")).clicked() {
                retry = true;
            }
        });

        if retry {
            self.retry_load(ctx);
        }
    }

    fn render_signed_out(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut submit = false;
        ui.vertical_centered(|ui| {
            ui.add_space((ui.available_height() / 2.0 - 100.0).max(theme::SPACING_XXL));
            ui.label(
                egui::RichText::new(egui_phosphor::regular::USER_CIRCLE)
                    .size(theme::ICON_LARGE)
                    .color(theme::TEXT_LIGHT),
            );
            ui.add_space(theme::SPACING_XL);
            ui.label(
                egui::RichText::new("Sign in to see your favorites")
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            ui.add_space(theme::SPACING_LG);
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.sign_in_input)
                    .hint_text("User ID")
                    .desired_width(240.0),
            );
            if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.add_space(theme::SPACING_LG);
            let enabled = !self.sign_in_input.trim().is_empty();
            if ui.add_enabled(enabled, theme::button_accent("Sign In")).clicked() {
                submit = true;
            }
        });

        if submit && !self.sign_in_input.trim().is_empty() {
            let user_id = std::mem::take(&mut self.sign_in_input);
            self.session.sign_in(&user_id);
            self.images.clear();
            self.mount_screen(ctx);
        }
    }
}

/// Header plus card grid; returns true when sign-out was clicked
fn render_ready(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    items: &[DisplayItem],
    images: &mut CardImages,
) -> bool {
    let mut sign_out = false;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .id_salt("favorites_scroll")
        .show(ui, |ui| {
            sign_out = components::header(ui);

            if items.is_empty() {
                components::no_favorites_found(ui);
                return;
            }

            let spacing = theme::SPACING_LG;
            let columns = theme::GRID_COLUMNS as f32;
            let card_w = ((ui.available_width() - spacing * (columns - 1.0)) / columns).floor();
            let card_h = card_w * theme::CARD_IMAGE_RATIO + theme::CARD_TEXT_HEIGHT;

            for (row_idx, row) in items.chunks(theme::GRID_COLUMNS).enumerate() {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = spacing;
                    for (col_idx, item) in row.iter().enumerate() {
                        // Cards without a recipeId fall back to their position
                        let key = item
                            .key()
                            .unwrap_or_else(|| format!("#{}", row_idx * theme::GRID_COLUMNS + col_idx));
                        let id = ui.id().with(("favorite", key));
                        let (_, rect) = ui.allocate_space(egui::vec2(card_w, card_h));
                        let response = ui.interact(rect, id, egui::Sense::hover());

                        if ui.is_rect_visible(rect) {
                            let image = item
                                .image_url()
                                .and_then(|url| images.load(ctx, url));
                            components::recipe_card(ui, rect, item, image.as_ref(), response.hovered());
                        }

                        if let Some(description) = item.description() {
                            response.on_hover_text(description);
                        }
                    }
                });
                ui.add_space(spacing);
            }
        });
    sign_out
}
