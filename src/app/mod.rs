//! App module - contains the main application state and logic

mod favicons;
mod modals;
mod views;

use crate::icons::HttpFaviconService;
use crate::logins::controller::{ControllerConfig, ListController};
use crate::logins::data_source::SectionedDataSource;
use crate::logins::{Login, Position};
use crate::settings::Settings;
use crate::store::LoginStore;
use crate::theme;
use crate::utils::get_cache_dir;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// One row of the flattened table: a section header or a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlatRow {
    Header(usize),
    Login(Position),
}

/// Section headers interleaved with login rows, in display order.
pub(crate) fn flat_rows(data: &SectionedDataSource) -> Vec<FlatRow> {
    let mut rows = Vec::with_capacity(data.visible_count() + data.section_count());
    for section in 0..data.section_count() {
        rows.push(FlatRow::Header(section));
        rows.extend(
            (0..data.row_count(section)).map(|row| FlatRow::Login(Position::new(section, row))),
        );
    }
    rows
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) controller: ListController,
    // Keeps the runtime alive for the controller's background tasks
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) search_query: String,
    // Favicon textures keyed by guid and icon url
    pub(crate) favicon_textures: HashMap<String, Option<egui::TextureHandle>>,
    // Detail window
    pub(crate) detail: Option<Login>,
    pub(crate) reveal_password: bool,
    // Section index
    pub(crate) scroll_target_row: Option<usize>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: Arc<dyn LoginStore>,
        runtime: tokio::runtime::Runtime,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons for toolbar buttons
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let icons = Arc::new(HttpFaviconService::new(get_cache_dir()));
        let config = ControllerConfig {
            load_favicons: settings.load_favicons,
            favicon_concurrency: settings.favicon_concurrency,
        };
        let mut controller = ListController::new(store, icons, runtime.handle().clone(), config);

        let ctx = cc.egui_ctx.clone();
        controller.set_waker(Arc::new(move || ctx.request_repaint()));
        controller.load();

        Self {
            controller,
            runtime,
            search_query: String::new(),
            favicon_textures: HashMap::new(),
            detail: None,
            reveal_password: false,
            scroll_target_row: None,
            settings,
            data_dir,
            window_pos: None,
            window_size: None,
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

    /// Open a login in the detail window.
    pub(crate) fn open_detail(&mut self, login: Login) {
        self.reveal_password = false;
        self.detail = Some(login);
    }
}
