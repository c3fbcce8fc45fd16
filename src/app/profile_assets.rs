//! Assets owned by an address, shown in a paged grid

use super::Services;
use crate::constants::PROFILE_ASSETS_PAGE_SIZE;
use crate::language::Language;
use crate::theme;
use crate::ui::components::asset_grid;
use eframe::egui;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

struct AssetsLoaded {
    address: String,
    ids: Vec<String>,
}

pub struct ProfileAssets {
    address: Option<String>,
    ids: Option<Vec<String>>,
    in_flight: bool,
    page: usize,
    tx: UnboundedSender<AssetsLoaded>,
    rx: UnboundedReceiver<AssetsLoaded>,
}

impl Default for ProfileAssets {
    fn default() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            address: None,
            ids: None,
            in_flight: false,
            page: 0,
            tx,
            rx,
        }
    }
}

impl ProfileAssets {
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.ids.is_none()
    }

    /// Point the view at `address`, fetching its assets if not already known
    pub fn set_address(&mut self, address: &str, services: &Services) {
        if self.address.as_deref() != Some(address) {
            self.address = Some(address.to_string());
            self.ids = None;
            self.in_flight = false;
            self.page = 0;
        }
        if self.ids.is_some() || self.in_flight {
            return;
        }
        self.in_flight = true;

        let address = address.to_string();
        let tx = self.tx.clone();
        let api = services.api.clone();
        let ctx = services.ctx.clone();
        debug!(%address, "Fetching profile assets");
        services.runtime.spawn(async move {
            match api.get_asset_ids_by_user(&address).await {
                Ok(ids) => {
                    let _ = tx.send(AssetsLoaded { address, ids });
                    ctx.request_repaint();
                }
                Err(e) => error!(error = %e, %address, "Failed to fetch profile assets"),
            }
        });
    }

    pub fn poll(&mut self) {
        while let Ok(loaded) = self.rx.try_recv() {
            if self.address.as_deref() != Some(loaded.address.as_str()) {
                continue;
            }
            debug!(address = %loaded.address, count = loaded.ids.len(), "Profile assets loaded");
            self.ids = Some(loaded.ids);
            self.in_flight = false;
        }
    }

    /// Returns the id of a clicked asset
    pub fn show(&mut self, ui: &mut egui::Ui, language: &Language) -> Option<String> {
        self.address()?;

        ui.label(
            egui::RichText::new(language.assets)
                .size(theme::FONT_HEADING)
                .strong(),
        );
        ui.add_space(theme::SPACING_SM);
        asset_grid(
            ui,
            self.ids.as_deref(),
            self.is_loading(),
            PROFILE_ASSETS_PAGE_SIZE,
            &mut self.page,
            language.no_assets,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::MarketApi;
    use std::sync::Arc;
    use std::time::Duration;

    fn services(api: Arc<MockApi>) -> Services {
        Services {
            api: api as Arc<dyn MarketApi>,
            runtime: tokio::runtime::Handle::current(),
            ctx: egui::Context::default(),
        }
    }

    async fn settle(assets: &mut ProfileAssets) {
        for _ in 0..200 {
            assets.poll();
            if !assets.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn fetches_once_per_address() {
        let api = Arc::new(MockApi::default());
        api.assets
            .lock()
            .unwrap()
            .insert("me".into(), vec!["a1".into(), "a2".into()]);
        let services = services(api.clone());

        let mut assets = ProfileAssets::default();
        assets.set_address("me", &services);
        assets.set_address("me", &services);
        settle(&mut assets).await;
        assert_eq!(assets.ids.as_deref().map(|ids| ids.len()), Some(2));

        assets.set_address("me", &services);
        assert_eq!(api.asset_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_result_is_not_refetched() {
        let api = Arc::new(MockApi::default());
        let services = services(api.clone());

        let mut assets = ProfileAssets::default();
        assets.set_address("nobody", &services);
        settle(&mut assets).await;
        assert_eq!(assets.ids.as_deref(), Some(&[][..]));

        assets.set_address("nobody", &services);
        assert_eq!(api.asset_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn new_address_resets_and_refetches() {
        let api = Arc::new(MockApi::default());
        api.assets.lock().unwrap().insert("a".into(), vec!["x".into()]);
        api.assets.lock().unwrap().insert("b".into(), vec!["y".into(), "z".into()]);
        let services = services(api.clone());

        let mut assets = ProfileAssets::default();
        assets.set_address("a", &services);
        settle(&mut assets).await;

        assets.set_address("b", &services);
        assert!(assets.is_loading());
        settle(&mut assets).await;
        assert_eq!(assets.address(), Some("b"));
        assert_eq!(assets.ids.as_deref().map(|ids| ids.len()), Some(2));
        assert_eq!(*api.asset_calls.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn failure_stays_loading() {
        let api = Arc::new(MockApi {
            fail_assets: true,
            ..Default::default()
        });
        let services = services(api);

        let mut assets = ProfileAssets::default();
        assets.set_address("me", &services);
        settle(&mut assets).await;
        assert!(assets.is_loading());
    }
}
