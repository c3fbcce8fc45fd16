//! Activity table: drives an `ActivityFeed` over the network and renders it

use super::Services;
use crate::activity::{fetch_activity, ActivityFeed, FeedView, ResolveRequest};
use crate::currency::{format_denominated, CurrencyLine, CurrencyRegistry};
use crate::language::Language;
use crate::theme;
use crate::types::*;
use crate::ui::components::{empty_state, event_badge, loader, owner_line};
use crate::utils::format_date;
use crate::viewport::ViewportController;
use eframe::egui;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

enum TableMessage {
    Activity {
        fetch_id: u64,
        activity: Vec<OrderEvent>,
    },
    Profiles {
        generation: u64,
        profiles: Option<Vec<Profile>>,
    },
}

/// Something the user asked for from inside the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    OpenAsset(String),
    OpenProfile(String),
    OpenOrder(ResolvedOrder),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Read-only inputs the table renders with
pub struct TableEnv<'a> {
    pub registry: &'a CurrencyRegistry,
    pub language: &'a Language,
    pub asset_base_url: &'a str,
    /// Denomination of the subject asset, for the quantity column
    pub denomination: Option<u32>,
}

pub struct ActivityTable {
    query: Option<ActivityQuery>,
    feed: ActivityFeed,
    fetch_id: u64,
    tx: UnboundedSender<TableMessage>,
    rx: UnboundedReceiver<TableMessage>,
    resolve_token: Option<CancellationToken>,
    scroll_pending: bool,
}

impl ActivityTable {
    pub fn new(sort: SortOption) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            query: None,
            feed: ActivityFeed::new(sort),
            fetch_id: 0,
            tx,
            rx,
            resolve_token: None,
            scroll_pending: false,
        }
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// Fetch activity for `query` unless it is already the current one
    pub fn set_query(&mut self, query: ActivityQuery, services: &Services) {
        if self.query.as_ref() == Some(&query) {
            return;
        }
        self.cancel_resolution();
        self.feed.begin_fetch();
        self.fetch_id += 1;
        self.query = Some(query.clone());

        let fetch_id = self.fetch_id;
        let tx = self.tx.clone();
        let api = services.api.clone();
        let ctx = services.ctx.clone();
        debug!(fetch_id, ?query, "Fetching activity");
        services.runtime.spawn(async move {
            match fetch_activity(api.as_ref(), &query).await {
                Ok(activity) => {
                    let _ = tx.send(TableMessage::Activity { fetch_id, activity });
                    ctx.request_repaint();
                }
                // The table keeps showing its loader
                Err(e) => error!(error = %e, ?query, "Failed to fetch activity"),
            }
        });
    }

    /// Apply finished network work. Call once per frame.
    pub fn poll(&mut self, services: &Services) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                TableMessage::Activity { fetch_id, activity } => {
                    if fetch_id != self.fetch_id {
                        debug!(fetch_id, current = self.fetch_id, "Discarding stale activity");
                        continue;
                    }
                    if let Some(request) = self.feed.set_activity(activity) {
                        self.spawn_resolution(request, services);
                    }
                }
                TableMessage::Profiles {
                    generation,
                    profiles,
                } => {
                    self.feed.apply_profiles(generation, profiles.as_deref());
                }
            }
        }
    }

    pub fn set_sort(&mut self, sort: SortOption, services: &Services) {
        if let Some(request) = self.feed.set_sort(sort) {
            self.spawn_resolution(request, services);
        }
    }

    pub fn paginate(&mut self, direction: PageDirection, services: &Services) {
        let request = match direction {
            PageDirection::Previous => self.feed.previous(),
            PageDirection::Next => self.feed.next(),
        };
        if let Some(request) = request {
            debug!(cursor = self.feed.cursor(), ?direction, "Page changed");
            self.spawn_resolution(request, services);
            self.scroll_pending = true;
        }
    }

    fn cancel_resolution(&mut self) {
        if let Some(token) = self.resolve_token.take() {
            token.cancel();
        }
    }

    /// Look up profiles for the visible group, superseding any earlier lookup
    fn spawn_resolution(&mut self, request: ResolveRequest, services: &Services) {
        self.cancel_resolution();
        let token = CancellationToken::new();
        self.resolve_token = Some(token.clone());

        let tx = self.tx.clone();
        let api = services.api.clone();
        let ctx = services.ctx.clone();
        let ResolveRequest {
            generation,
            addresses,
        } = request;

        services.runtime.spawn(async move {
            let profiles = tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "Profile lookup superseded");
                    return;
                }
                result = api.get_registry_profiles(&addresses) => match result {
                    Ok(profiles) => Some(profiles),
                    Err(e) => {
                        error!(error = %e, count = addresses.len(), "Failed to fetch profiles");
                        None
                    }
                },
            };
            let _ = tx.send(TableMessage::Profiles {
                generation,
                profiles,
            });
            ctx.request_repaint();
        });
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        services: &Services,
        env: &TableEnv<'_>,
        viewport: &mut dyn ViewportController,
    ) -> Option<TableAction> {
        let mut action = None;
        let mut sort_choice = None;
        let mut page = None;

        let anchor = ui.cursor();
        let updating = self.feed.is_updating();

        match self.feed.view() {
            FeedView::Loading => loader(ui),
            FeedView::Empty => empty_state(ui, env.language.no_activity),
            FeedView::Ready(group) => {
                // Header: count, sort selector, pager
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} ({})",
                            env.language.interactions,
                            self.feed.total()
                        ))
                        .size(theme::FONT_HEADING)
                        .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(dir) = self.pager(ui, env.language, updating, true) {
                            page = Some(dir);
                        }
                        ui.add_enabled_ui(!updating, |ui| {
                            let current = self.feed.sort();
                            egui::ComboBox::from_id_salt("activity_sort")
                                .selected_text(current.label())
                                .show_ui(ui, |ui| {
                                    for option in SortOption::ALL {
                                        if ui
                                            .selectable_label(option == current, option.label())
                                            .clicked()
                                        {
                                            sort_choice = Some(option);
                                        }
                                    }
                                });
                        });
                    });
                });

                // Range indicator
                let (start, end) = self.feed.range();
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{}: {}-{}", env.language.showing, start, end))
                            .size(theme::FONT_SECTION)
                            .color(theme::TEXT_MUTED),
                    );
                    if updating {
                        ui.label(
                            egui::RichText::new(format!("{}...", env.language.updating))
                                .size(theme::FONT_SECTION)
                                .color(theme::ACCENT),
                        );
                    }
                });
                ui.add_space(theme::SPACING_SM);

                if let Some(a) = Self::table(ui, group, env) {
                    action = Some(a);
                }

                // Footer pager
                ui.add_space(theme::SPACING_MD);
                ui.horizontal(|ui| {
                    if let Some(dir) = self.pager(ui, env.language, updating, false) {
                        page = Some(dir);
                    }
                });
            }
        }

        if let Some(sort) = sort_choice {
            self.set_sort(sort, services);
        }
        if let Some(direction) = page {
            self.paginate(direction, services);
        } else if self.scroll_pending {
            // One frame after the cursor moved
            self.scroll_pending = false;
            let smooth = viewport.supports_smooth_scroll();
            viewport.scroll_into_view(anchor, smooth);
        }

        action
    }

    /// Previous/next controls; icon buttons in the header, text buttons in the footer
    fn pager(
        &self,
        ui: &mut egui::Ui,
        language: &Language,
        updating: bool,
        compact: bool,
    ) -> Option<PageDirection> {
        let can_previous = self.feed.can_previous() && !updating;
        let can_next = self.feed.can_next() && !updating;
        let mut clicked = None;

        if compact {
            // right-to-left layout: next first
            if ui
                .add_enabled(can_next, theme::icon_button(egui_phosphor::regular::CARET_RIGHT))
                .on_hover_text(language.next)
                .clicked()
            {
                clicked = Some(PageDirection::Next);
            }
            if ui
                .add_enabled(can_previous, theme::icon_button(egui_phosphor::regular::CARET_LEFT))
                .on_hover_text(language.previous)
                .clicked()
            {
                clicked = Some(PageDirection::Previous);
            }
        } else {
            if ui
                .add_enabled(can_previous, theme::button(language.previous))
                .clicked()
            {
                clicked = Some(PageDirection::Previous);
            }
            if ui
                .add_enabled(can_next, theme::button_accent(language.next))
                .clicked()
            {
                clicked = Some(PageDirection::Next);
            }
        }
        clicked
    }

    fn table(ui: &mut egui::Ui, group: &[ResolvedOrder], env: &TableEnv<'_>) -> Option<TableAction> {
        use egui_extras::{Column, TableBuilder};

        let mut action = None;

        theme::section_frame().show(ui, |ui| {
            let part = ui.available_width() / 10.0;
            TableBuilder::new(ui)
                .id_salt("activity_table")
                .striped(false)
                .resizable(false)
                .vscroll(false)
                .sense(egui::Sense::click())
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(part * 1.4))
                .column(Column::exact(part * 1.8))
                .column(Column::exact(part * 1.8))
                .column(Column::exact(part * 1.3))
                .column(Column::exact(part * 1.6))
                .column(Column::remainder())
                .header(32.0, |mut header| {
                    for title in ["Event", "By", "To", "Quantity", "Price", "Date"] {
                        header.col(|ui| {
                            ui.label(
                                egui::RichText::new(title)
                                    .size(theme::FONT_LABEL)
                                    .strong()
                                    .color(theme::TEXT_MUTED),
                            );
                        });
                    }
                })
                .body(|body| {
                    body.rows(theme::ROW_HEIGHT, group.len(), |mut row| {
                        let order = &group[row.index()];
                        let event = &order.event;

                        row.col(|ui| event_badge(ui, event.kind));
                        row.col(|ui| {
                            if owner_line(ui, event.sender.as_deref(), order.sender_profile.as_ref()) {
                                action = event.sender.clone().map(TableAction::OpenProfile);
                            }
                        });
                        row.col(|ui| {
                            if owner_line(
                                ui,
                                event.receiver.as_deref(),
                                order.receiver_profile.as_ref(),
                            ) {
                                action = event.receiver.clone().map(TableAction::OpenProfile);
                            }
                        });
                        row.col(|ui| {
                            ui.label(format_denominated(&event.quantity, env.denomination));
                        });
                        row.col(|ui| {
                            let line = CurrencyLine::new(
                                Some(&event.price),
                                Some(&event.swap_token),
                                env.registry,
                                env.asset_base_url,
                            );
                            if let Some(id) = line.and_then(|l| l.show(ui, None)) {
                                action = Some(TableAction::OpenAsset(id));
                            }
                        });
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(format_date(event.timestamp))
                                    .size(theme::FONT_LABEL)
                                    .color(theme::TEXT_MUTED),
                            );
                        });

                        let response = row.response();
                        if response.hovered() {
                            response.ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if response.clicked() && action.is_none() {
                            action = Some(TableAction::OpenOrder(order.clone()));
                        }
                    });
                });
        });

        action
    }
}
