//! View rendering (top bar, route content, order detail panel)

use super::{App, Route, TableAction, TableEnv};
use crate::currency::{format_denominated, CurrencyLine};
use crate::theme;
use crate::types::Overflow;
use crate::ui::components::{empty_state, event_badge, owner_line};
use crate::utils::{format_address, format_date};
use crate::viewport::ViewportController;
use eframe::egui;

enum TopBarAction {
    Back,
    Open(Route),
}

impl App {
    pub(crate) fn render(&mut self, ctx: &egui::Context) {
        let mut action = None;

        if let Some(top) = self.render_top_bar(ctx) {
            match top {
                TopBarAction::Back => self.back(),
                TopBarAction::Open(route) => self.navigate(route),
            }
        }

        let pending = self.viewport.take_pending_scroll();
        let scrolling = self.viewport.overflow() == Overflow::Auto;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                let mut area = egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .id_salt("main_scroll")
                    .enable_scrolling(scrolling);
                if let Some(p) = &pending {
                    area = area.animated(p.smooth);
                }
                area.show(ui, |ui| {
                    if let Some(p) = pending {
                        ui.scroll_to_rect(p.target, Some(egui::Align::TOP));
                    }
                    ui.set_max_width(theme::CONTENT_MAX_WIDTH.min(ui.available_width()));
                    action = self.render_route(ui);
                });
            });

        if let Some(a) = self.render_order_panel(ctx) {
            action = Some(a);
        }
        if let Some(a) = action {
            self.handle_action(a);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) -> Option<TopBarAction> {
        let mut action = None;
        egui::TopBottomPanel::top("top_bar")
            .exact_height(theme::TOP_BAR_HEIGHT)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(16, 0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let can_back = self.routes.len() > 1;
                    if ui
                        .add_enabled(can_back, theme::icon_button(egui_phosphor::regular::ARROW_LEFT))
                        .on_hover_text(self.language.back)
                        .clicked()
                    {
                        action = Some(TopBarAction::Back);
                    }
                    if let Some(route) = self.routes.last() {
                        ui.label(
                            egui::RichText::new(route.title())
                                .size(theme::FONT_HEADING)
                                .strong(),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let input = self.search_input.trim().to_string();
                        let enabled = !input.is_empty();
                        if ui
                            .add_enabled(enabled, theme::button(self.language.open_profile))
                            .clicked()
                        {
                            action = Some(TopBarAction::Open(Route::Profile(input.clone())));
                        }
                        if ui
                            .add_enabled(enabled, theme::button_accent(self.language.open_asset))
                            .clicked()
                        {
                            action = Some(TopBarAction::Open(Route::Asset(input.clone())));
                        }

                        theme::section_frame()
                            .inner_margin(egui::Margin::symmetric(6, 4))
                            .show(ui, |ui| {
                                let response = ui.add(
                                    egui::TextEdit::singleline(&mut self.search_input)
                                        .hint_text(self.language.search_hint)
                                        .frame(false)
                                        .desired_width(320.0),
                                );
                                // Enter opens as an asset
                                if enabled
                                    && response.lost_focus()
                                    && ui.input(|i| i.key_pressed(egui::Key::Enter))
                                {
                                    action = Some(TopBarAction::Open(Route::Asset(input.clone())));
                                }
                            });
                    });
                });
            });

        if matches!(action, Some(TopBarAction::Open(_))) {
            self.search_input.clear();
        }
        action
    }

    fn render_route(&mut self, ui: &mut egui::Ui) -> Option<TableAction> {
        let Some(route) = self.current_route().cloned() else {
            empty_state(ui, self.language.search_hint);
            return None;
        };

        let mut action = None;
        let denomination = match &route {
            Route::Asset(_) => {
                self.asset_header.show(ui);
                self.asset_header.denomination()
            }
            Route::Profile(address) => {
                theme::card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::USER_CIRCLE)
                                .size(theme::FONT_TITLE)
                                .color(theme::ACCENT),
                        );
                        ui.label(
                            egui::RichText::new(format_address(address, false))
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .on_hover_text(address.as_str());
                    });
                });
                ui.add_space(theme::SPACING_LG);
                if let Some(id) = self.profile_assets.show(ui, &self.language) {
                    action = Some(TableAction::OpenAsset(id));
                }
                // Activity spans many assets; quantities stay unscaled
                None
            }
        };

        ui.add_space(theme::SPACING_XL);
        let env = TableEnv {
            registry: &self.registry,
            language: &self.language,
            asset_base_url: &self.settings.asset_base_url,
            denomination,
        };
        if let Some(a) = self
            .activity
            .show(ui, &self.services, &env, &mut self.viewport)
        {
            action = Some(a);
        }
        action
    }

    fn render_order_panel(&mut self, ctx: &egui::Context) -> Option<TableAction> {
        let (panel, order) = self.order_panel.as_mut()?;
        let registry = &self.registry;
        let asset_base_url = self.settings.asset_base_url.as_str();
        let denomination = match self.routes.last() {
            Some(Route::Asset(_)) => self.asset_header.denomination(),
            _ => None,
        };

        let response = panel.show(ctx, |ui| {
            let mut action = None;
            let event = &order.event;
            egui::Grid::new("order_detail_grid")
                .num_columns(2)
                .spacing([theme::SPACING_XL, theme::SPACING_MD])
                .show(ui, |ui| {
                    detail_label(ui, "Event");
                    event_badge(ui, event.kind);
                    ui.end_row();

                    detail_label(ui, "Order");
                    ui.label(format_address(&event.order_id, false))
                        .on_hover_text(event.order_id.as_str());
                    ui.end_row();

                    detail_label(ui, "Asset");
                    if ui
                        .link(format_address(&event.dominant_token, false))
                        .on_hover_text(event.dominant_token.as_str())
                        .clicked()
                    {
                        action = Some(TableAction::OpenAsset(event.dominant_token.clone()));
                    }
                    ui.end_row();

                    detail_label(ui, "By");
                    if owner_line(ui, event.sender.as_deref(), order.sender_profile.as_ref()) {
                        action = event.sender.clone().map(TableAction::OpenProfile);
                    }
                    ui.end_row();

                    detail_label(ui, "To");
                    if owner_line(ui, event.receiver.as_deref(), order.receiver_profile.as_ref()) {
                        action = event.receiver.clone().map(TableAction::OpenProfile);
                    }
                    ui.end_row();

                    detail_label(ui, "Quantity");
                    ui.label(format_denominated(&event.quantity, denomination));
                    ui.end_row();

                    detail_label(ui, "Price");
                    let line = CurrencyLine::new(
                        Some(&event.price),
                        Some(&event.swap_token),
                        registry,
                        asset_base_url,
                    );
                    match line {
                        Some(line) => {
                            if let Some(id) = line.show(ui, None) {
                                action = Some(TableAction::OpenAsset(id));
                            }
                        }
                        None => {
                            ui.label("-");
                        }
                    }
                    ui.end_row();

                    detail_label(ui, "Date");
                    ui.label(format_date(event.timestamp));
                    ui.end_row();
                });
            action
        });

        // Dropping the panel restores page scrolling
        if response.should_close || response.inner.is_some() {
            self.order_panel = None;
        }
        response.inner
    }
}

fn detail_label(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(theme::FONT_LABEL)
            .color(theme::TEXT_MUTED),
    );
}
