//! App module - contains the main application state and logic

mod images;
mod loader;
mod modals;
mod views;

use self::images::CardImages;
use crate::api::FavoritesClient;
use crate::error::FavoritesError;
use crate::screen::FavoritesScreen;
use crate::session::LocalSession;
use crate::settings::Settings;
use crate::theme;
use crate::types::{DisplayItem, LoadKind};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

/// Result of a background favorites fetch, handed back to the UI thread
pub(crate) struct LoadOutcome {
    pub kind: LoadKind,
    pub result: Result<Vec<DisplayItem>, FavoritesError>,
}

pub struct App {
    pub(crate) screen: FavoritesScreen,
    pub(crate) session: LocalSession,
    pub(crate) client: FavoritesClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) request_timeout: Duration,
    // Latest finished fetch, overwritten by each completion
    pub(crate) pending: Arc<Mutex<Option<LoadOutcome>>>,
    // Ends the signed-in session's requests on sign-out and shutdown
    pub(crate) cancel_token: Option<CancellationToken>,
    pub(crate) mounted: bool,
    pub(crate) sign_in_input: String,
    pub(crate) images: CardImages,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = data_dir.join("cache");
        std::fs::create_dir_all(cache_dir.join("images")).ok();

        let images = CardImages::new(runtime.handle().clone(), cache_dir);

        let client = FavoritesClient::new(settings.api_url_or_default());
        info!(api_url = client.base_url(), "Favorites API configured");

        Self {
            screen: FavoritesScreen::new(),
            session: LocalSession::load(&data_dir),
            client,
            runtime,
            request_timeout: settings.request_timeout(),
            pending: Arc::new(Mutex::new(None)),
            cancel_token: None,
            mounted: false,
            sign_in_input: String::new(),
            images,
            needs_center: settings.window_x.is_none(),
            settings,
            window_pos: None,
            window_size: None,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }
}

// ============================================================================
// MAIN UPDATE LOOP
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        if !self.mounted {
            self.mounted = true;
            self.mount_screen(ctx);
        }

        self.poll_load_results();

        self.render_alert(ctx);
        self.render_sign_out_confirm(ctx);

        egui::CentralPanel::default()
            .frame(theme::screen_frame())
            .show(ctx, |ui| {
                self.render_screen(ui, ctx);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.abort_loads();
        self.save_settings();
    }
}
