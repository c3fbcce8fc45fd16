//! Subject asset info shown above its activity

use super::Services;
use crate::theme;
use crate::types::AssetState;
use crate::utils::format_address;
use eframe::egui;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

pub struct AssetHeader {
    asset_id: Option<String>,
    state: Option<AssetState>,
    tx: UnboundedSender<(String, AssetState)>,
    rx: UnboundedReceiver<(String, AssetState)>,
}

impl Default for AssetHeader {
    fn default() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            asset_id: None,
            state: None,
            tx,
            rx,
        }
    }
}

impl AssetHeader {
    pub fn set_asset(&mut self, asset_id: &str, services: &Services) {
        if self.asset_id.as_deref() == Some(asset_id) {
            return;
        }
        self.asset_id = Some(asset_id.to_string());
        self.state = None;

        let asset_id = asset_id.to_string();
        let tx = self.tx.clone();
        let api = services.api.clone();
        let ctx = services.ctx.clone();
        services.runtime.spawn(async move {
            match api.get_asset_state(&asset_id).await {
                Ok(state) => {
                    debug!(%asset_id, denomination = ?state.denomination, "Asset state loaded");
                    let _ = tx.send((asset_id, state));
                    ctx.request_repaint();
                }
                Err(e) => error!(error = %e, %asset_id, "Failed to fetch asset state"),
            }
        });
    }

    pub fn poll(&mut self) {
        while let Ok((asset_id, state)) = self.rx.try_recv() {
            if self.asset_id.as_deref() == Some(asset_id.as_str()) {
                self.state = Some(state);
            }
        }
    }

    pub fn state(&self) -> Option<&AssetState> {
        self.state.as_ref()
    }

    pub fn denomination(&self) -> Option<u32> {
        self.state.as_ref().and_then(|s| s.denomination)
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(asset_id) = &self.asset_id else {
            return;
        };
        let name = self
            .state()
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| format_address(asset_id, false));

        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::CUBE)
                        .size(theme::FONT_TITLE)
                        .color(theme::ACCENT),
                );
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(name).size(theme::FONT_TITLE).strong());
                    ui.label(
                        egui::RichText::new(asset_id)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                });
                if let Some(ticker) = self.state().and_then(|s| s.ticker.as_deref()) {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(ticker).color(theme::TEXT_MUTED));
                    });
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::MarketApi;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn loads_denomination_for_current_asset() {
        let api = Arc::new(MockApi::default());
        api.asset_states.lock().unwrap().insert(
            "asset".into(),
            AssetState {
                name: Some("Atomic".into()),
                ticker: Some("ATM".into()),
                denomination: Some(6),
            },
        );
        let services = Services {
            api: api as Arc<dyn MarketApi>,
            runtime: tokio::runtime::Handle::current(),
            ctx: egui::Context::default(),
        };

        let mut header = AssetHeader::default();
        header.set_asset("asset", &services);
        for _ in 0..200 {
            header.poll();
            if header.state().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(header.denomination(), Some(6));
    }
}
