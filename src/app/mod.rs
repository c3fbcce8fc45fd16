//! App module - contains the main application state and logic

mod activity_table;
mod asset_header;
mod profile_assets;
mod views;

pub use activity_table::{ActivityTable, TableAction, TableEnv};
pub use asset_header::AssetHeader;
pub use profile_assets::ProfileAssets;

use crate::api::{AoClient, MarketApi};
use crate::currency::CurrencyRegistry;
use crate::language::Language;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use crate::ui::panel::Panel;
use crate::viewport::EguiViewport;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What background work needs: the API, a runtime to spawn on and a context to wake
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn MarketApi>,
    pub runtime: tokio::runtime::Handle,
    pub ctx: egui::Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Asset(String),
    Profile(String),
}

impl Route {
    pub fn title(&self) -> String {
        match self {
            Route::Asset(id) => format!("Asset {}", crate::utils::format_address(id, false)),
            Route::Profile(address) => {
                format!("Profile {}", crate::utils::format_address(address, false))
            }
        }
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    // Kept alive for the spawned tasks; `services.runtime` is its handle
    pub(crate) _runtime: tokio::runtime::Runtime,
    pub(crate) services: Services,
    pub(crate) registry: CurrencyRegistry,
    pub(crate) language: Language,
    pub(crate) viewport: EguiViewport,
    // Navigation
    pub(crate) routes: Vec<Route>,
    pub(crate) search_input: String,
    // Views
    pub(crate) activity: ActivityTable,
    pub(crate) profile_assets: ProfileAssets,
    pub(crate) asset_header: AssetHeader,
    pub(crate) order_panel: Option<(Panel<EguiViewport>, ResolvedOrder)>,
    // Window geometry, saved on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let api: Arc<dyn MarketApi> = Arc::new(AoClient::new(
            &settings.cu_url,
            &settings.ucm_process,
            &settings.profile_registry,
        ));
        let services = Services {
            api,
            runtime: runtime.handle().clone(),
            ctx: cc.egui_ctx.clone(),
        };
        let viewport = EguiViewport::new(&cc.egui_ctx, settings.smooth_scroll);

        let start = settings
            .start_asset
            .clone()
            .map(Route::Asset)
            .or_else(|| settings.start_address.clone().map(Route::Profile));

        let mut app = Self {
            registry: settings.currency_registry(),
            activity: ActivityTable::new(settings.default_sort),
            settings,
            data_dir,
            _runtime: runtime,
            services,
            language: Language::default(),
            viewport,
            routes: Vec::new(),
            search_input: String::new(),
            profile_assets: ProfileAssets::default(),
            asset_header: AssetHeader::default(),
            order_panel: None,
            window_pos: None,
            window_size: None,
        };

        info!(currencies = app.registry.len(), start = ?start, "App initialized");
        if let Some(route) = start {
            app.navigate(route);
        }
        app
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.routes.last()
    }

    /// Push `route` and point the views at it
    pub fn navigate(&mut self, route: Route) {
        if self.current_route() == Some(&route) {
            return;
        }
        info!(?route, "Navigate");
        self.order_panel = None;
        self.routes.push(route);
        self.enter_current_route();
    }

    pub fn back(&mut self) {
        if self.routes.len() < 2 {
            return;
        }
        self.routes.pop();
        self.order_panel = None;
        self.enter_current_route();
    }

    fn enter_current_route(&mut self) {
        let Some(route) = self.routes.last().cloned() else {
            return;
        };
        match route {
            Route::Asset(id) => {
                self.asset_header.set_asset(&id, &self.services);
                self.activity
                    .set_query(ActivityQuery::for_asset(id), &self.services);
            }
            Route::Profile(address) => {
                self.profile_assets.set_address(&address, &self.services);
                self.activity
                    .set_query(ActivityQuery::for_address(address), &self.services);
            }
        }
    }

    /// Apply finished network work
    pub fn poll(&mut self) {
        self.activity.poll(&self.services);
        self.profile_assets.poll();
        self.asset_header.poll();
    }

    pub fn open_order(&mut self, order: ResolvedOrder) {
        // Release the previous lock before taking a new one
        self.order_panel = None;
        let panel = Panel::open(
            ("order_panel", &order.event.order_id),
            Some(self.language.order_details.to_string()),
            self.viewport.clone(),
        )
        .width(520.0);
        self.order_panel = Some((panel, order));
    }

    pub fn handle_action(&mut self, action: TableAction) {
        match action {
            TableAction::OpenAsset(id) => self.navigate(Route::Asset(id)),
            TableAction::OpenProfile(address) => self.navigate(Route::Profile(address)),
            TableAction::OpenOrder(order) => self.open_order(order),
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            default_sort: self.activity.feed().sort(),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }
}
