//! Reusable UI components
//!
//! Standalone widgets used by the favorites screen views.

use crate::theme;
use crate::types::DisplayItem;
use crate::utils::meta_line;
use eframe::egui;

/// Screen header: "Favorites" title with a sign-out icon button on the right.
/// Returns true when the sign-out button was clicked.
pub fn header(ui: &mut egui::Ui) -> bool {
    let mut sign_out = false;
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), theme::HEADER_HEIGHT),
        egui::Sense::hover(),
    );

    ui.painter().text(
        rect.left_center(),
        egui::Align2::LEFT_CENTER,
        "Favorites",
        egui::FontId::proportional(theme::FONT_DISPLAY),
        theme::TEXT_PRIMARY,
    );

    let btn_size = theme::ICON_BUTTON + theme::SPACING_LG * 2.0;
    let btn_rect = egui::Rect::from_center_size(
        egui::pos2(rect.right() - btn_size / 2.0, rect.center().y),
        egui::vec2(btn_size, btn_size),
    );
    let response = ui.interact(btn_rect, ui.id().with("sign_out"), egui::Sense::click());
    let (fill, draw_rect) = theme::button_visual(&response, theme::BG_ELEVATED, btn_rect);
    ui.painter().circle_filled(draw_rect.center(), draw_rect.width() / 2.0, fill);
    ui.painter().text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        egui_phosphor::regular::SIGN_OUT,
        egui::FontId::proportional(theme::ICON_BUTTON),
        theme::TEXT_PRIMARY,
    );
    if response.on_hover_text("Logout").clicked() {
        sign_out = true;
    }

    ui.add_space(theme::SPACING_MD);
    sign_out
}

/// Full-screen spinner with a caption
pub fn loading_spinner(ui: &mut egui::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() / 2.0 - theme::SPINNER_SIZE).max(0.0));
        ui.add(egui::Spinner::new().size(theme::SPINNER_SIZE).color(theme::ACCENT));
        ui.add_space(theme::SPACING_LG);
        ui.label(
            egui::RichText::new(message)
                .size(theme::FONT_BODY)
                .color(theme::TEXT_LIGHT),
        );
    });
}

/// Placeholder shown when the user has no favorites yet
pub fn no_favorites_found(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(theme::SPACING_XXL * 3.0);
        ui.label(
            egui::RichText::new(egui_phosphor::regular::HEART)
                .size(theme::ICON_LARGE)
                .color(theme::TEXT_DIM),
        );
        ui.add_space(theme::SPACING_XL);
        ui.label(
            egui::RichText::new("No favorites yet")
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(theme::SPACING_MD);
        ui.label(
            egui::RichText::new("Start exploring and save your favorite recipes")
                .size(theme::FONT_BODY)
                .color(theme::TEXT_LIGHT),
        );
    });
}

/// Paint one favorite card into `rect`
pub fn recipe_card(
    ui: &egui::Ui,
    rect: egui::Rect,
    item: &DisplayItem,
    image: Option<&egui::TextureHandle>,
    hovered: bool,
) {
    let painter = ui.painter();
    let fill = if hovered { theme::BG_HOVER } else { theme::BG_CARD };
    painter.rect_filled(rect, theme::RADIUS_CARD, fill);

    let image_rect = egui::Rect::from_min_size(
        rect.min,
        egui::vec2(rect.width(), rect.width() * theme::CARD_IMAGE_RATIO),
    );

    match image {
        Some(tex) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), image_rect, uv, egui::Color32::WHITE);
        }
        None => {
            painter.rect_filled(image_rect, theme::RADIUS_CARD, theme::BG_ELEVATED);
            painter.text(
                image_rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::COOKING_POT,
                egui::FontId::proportional(image_rect.height() * 0.3),
                theme::TEXT_DIM,
            );
        }
    }

    let text_left = rect.left() + theme::SPACING_LG;
    let max_text_w = rect.width() - theme::SPACING_LG * 2.0;
    let title = painter.layout(
        item.title().to_string(),
        egui::FontId::proportional(theme::FONT_HEADING),
        theme::TEXT_PRIMARY,
        max_text_w,
    );
    let title_pos = egui::pos2(text_left, image_rect.bottom() + theme::SPACING_MD);
    let title_h = title.size().y;
    painter.galley(title_pos, title, theme::TEXT_PRIMARY);

    let meta = meta_line(item.cook_time(), item.servings());
    if !meta.is_empty() {
        painter.text(
            egui::pos2(text_left, title_pos.y + title_h + theme::SPACING_SM),
            egui::Align2::LEFT_TOP,
            meta,
            egui::FontId::proportional(theme::FONT_SMALL),
            theme::TEXT_LIGHT,
        );
    }
}
