//! Centralized theme constants for Recipe Favorites
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x1c, 0x19, 0x17); // stone-900
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x29, 0x25, 0x24); // stone-800
pub const BG_CARD: Color32 = Color32::from_rgb(0x24, 0x20, 0x1e);
pub const BG_HOVER: Color32 = Color32::from_rgb(0x33, 0x2a, 0x24); // warm hover

// =============================================================================
// COLORS - Accent (Orange)
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0xf9, 0x73, 0x16); // orange-500

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0xfa, 0xfa, 0xf9); // stone-50
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe7, 0xe5, 0xe4); // stone-200
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xa8, 0xa2, 0x9e); // stone-400
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x78, 0x71, 0x6c); // stone-500
pub const TEXT_ON_ACCENT: Color32 = Color32::WHITE;

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x29, 0x25, 0x24); // stone-800
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x44, 0x40, 0x3c); // stone-700

// =============================================================================
// COLORS - Buttons
// =============================================================================
pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0x44, 0x40, 0x3c); // stone-700
pub const BTN_DANGER: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26); // red-600

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_DISPLAY: f32 = 28.0;
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_HEADING: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_SMALL: f32 = 12.0;

// =============================================================================
// DIMENSIONS
// =============================================================================
pub const HEADER_HEIGHT: f32 = 56.0;
pub const GRID_COLUMNS: usize = 2;
/// Card image height as a fraction of card width
pub const CARD_IMAGE_RATIO: f32 = 0.75;
pub const CARD_TEXT_HEIGHT: f32 = 64.0;
pub const ICON_LARGE: f32 = 60.0;
pub const ICON_BUTTON: f32 = 22.0;
pub const SPINNER_SIZE: f32 = 36.0;
pub const MODAL_WIDTH: f32 = 320.0;

// =============================================================================
// CORNER RADIUS
// =============================================================================
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;
pub const RADIUS_CARD: f32 = 12.0;

// =============================================================================
// STROKE WIDTHS
// =============================================================================
pub const STROKE_DEFAULT: f32 = 1.0;
pub const STROKE_MEDIUM: f32 = 1.5;

// =============================================================================
// SPACING
// =============================================================================
pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;
pub const SPACING_XXL: f32 = 20.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    let widget = |bg: Color32, fg: Color32| egui::style::WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
        fg_stroke: egui::Stroke::new(STROKE_DEFAULT, fg),
        corner_radius: RADIUS_DEFAULT.into(),
        expansion: 0.0,
    };

    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: BG_ELEVATED,
        extreme_bg_color: BG_CARD,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        widgets: egui::style::Widgets {
            noninteractive: widget(BG_ELEVATED, TEXT_PRIMARY),
            inactive: widget(BG_ELEVATED, TEXT_SECONDARY),
            hovered: egui::style::WidgetVisuals {
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(STROKE_MEDIUM, TEXT_PRIMARY),
                ..widget(BG_HOVER, TEXT_PRIMARY)
            },
            active: egui::style::WidgetVisuals {
                bg_stroke: egui::Stroke::NONE,
                expansion: -2.0,
                ..widget(BG_HOVER, TEXT_PRIMARY)
            },
            open: widget(BG_ELEVATED, TEXT_PRIMARY),
        },
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT),
        window_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.scroll.bar_width = 6.0;
        style.spacing.scroll.floating = false;
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================
pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(SPACING_XL)
}

pub fn screen_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_BASE)
        .inner_margin(egui::Margin::symmetric(SPACING_XXL as i8, SPACING_LG as i8))
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default gray button
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(text.into())
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Accent button for the primary action ("Try Again", "Sign In")
pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).strong().color(TEXT_ON_ACCENT))
        .fill(ACCENT)
        .corner_radius(RADIUS_LARGE)
        .min_size(egui::vec2(0.0, 40.0))
}

/// Danger red button (for destructive actions like Logout)
pub fn button_danger(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY))
        .fill(BTN_DANGER)
        .corner_radius(RADIUS_DEFAULT)
}

/// Returns (fill, draw_rect) for a custom-painted button with hover/press effects.
/// Lightens on hover, slightly lightens + shrinks on press.
pub fn button_visual(
    response: &egui::Response,
    base_fill: Color32,
    rect: egui::Rect,
) -> (Color32, egui::Rect) {
    if response.is_pointer_button_down_on() {
        (lighten(base_fill, 0.06), rect.shrink(1.5))
    } else if response.hovered() {
        (lighten(base_fill, 0.12), rect)
    } else {
        (base_fill, rect)
    }
}

fn lighten(c: Color32, amount: f32) -> Color32 {
    let r = (c.r() as f32 + (255.0 - c.r() as f32) * amount) as u8;
    let g = (c.g() as f32 + (255.0 - c.g() as f32) * amount) as u8;
    let b = (c.b() as f32 + (255.0 - c.b() as f32) * amount) as u8;
    Color32::from_rgb(r, g, b)
}
