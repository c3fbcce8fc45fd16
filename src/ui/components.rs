//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use crate::types::{EventKind, Profile};
use crate::utils::format_address;
use eframe::egui;

/// Centered spinner inside a bordered section
pub fn loader(ui: &mut egui::Ui) {
    theme::section_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.add_space(theme::SPACING_LG);
            ui.spinner();
            ui.add_space(theme::SPACING_LG);
        });
    });
}

/// Bordered section with a single muted message
pub fn empty_state(ui: &mut egui::Ui, message: &str) {
    theme::section_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.add_space(theme::SPACING_MD);
            ui.label(egui::RichText::new(message).color(theme::TEXT_MUTED));
            ui.add_space(theme::SPACING_MD);
        });
    });
}

/// Colored pill with the event icon and label
pub fn event_badge(ui: &mut egui::Ui, kind: EventKind) {
    let (bg, fg) = theme::event_colors(kind);
    let icon = match kind {
        EventKind::Listed => egui_phosphor::regular::TAG,
        EventKind::Sold => egui_phosphor::regular::SHOPPING_CART,
    };
    egui::Frame::new()
        .fill(bg)
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(format!("{}  {}", icon, kind.label()))
                    .size(theme::FONT_LABEL)
                    .color(fg),
            );
        });
}

/// Counterparty cell: profile name, shortened address, or the order book
/// itself when there is no address. Returns true when clicked.
pub fn owner_line(ui: &mut egui::Ui, address: Option<&str>, profile: Option<&Profile>) -> bool {
    let Some(address) = address else {
        ui.label(
            egui::RichText::new("UCM")
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_MUTED),
        );
        return false;
    };

    let text = match profile.and_then(|p| p.name()) {
        Some(name) => format!("{}  {}", egui_phosphor::regular::USER, name),
        None => format_address(address, false),
    };
    ui.add(egui::Link::new(
        egui::RichText::new(text)
            .size(theme::FONT_LABEL)
            .color(theme::TEXT_SECONDARY),
    ))
    .on_hover_text(address)
    .clicked()
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Items of `page`, empty when out of range
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = (page * size).min(items.len());
    let end = (start + size).min(items.len());
    &items[start..end]
}

/// Paged grid of asset cards. Returns the id of a clicked card.
pub fn asset_grid(
    ui: &mut egui::Ui,
    ids: Option<&[String]>,
    loading: bool,
    page_size: usize,
    page: &mut usize,
    empty_message: &str,
) -> Option<String> {
    let ids = match ids {
        Some(ids) if !loading => ids,
        _ => {
            loader(ui);
            return None;
        }
    };
    if ids.is_empty() {
        empty_state(ui, empty_message);
        return None;
    }

    let pages = page_count(ids.len(), page_size);
    *page = (*page).min(pages - 1);

    let mut clicked = None;
    let (card_w, card_h) = theme::CARD_SIZE;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(theme::SPACING_MD, theme::SPACING_MD);
        for id in page_slice(ids, *page, page_size) {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(card_w, card_h), egui::Sense::click());
            if ui.is_rect_visible(rect) {
                let fill = theme::hover_fill(&response, theme::BG_ELEVATED);
                let painter = ui.painter();
                painter.rect_filled(rect, theme::RADIUS_LARGE, fill);
                painter.rect_stroke(
                    rect,
                    theme::RADIUS_LARGE,
                    egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE),
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    rect.left_center() + egui::vec2(theme::SPACING_LG, 0.0),
                    egui::Align2::LEFT_CENTER,
                    format!("{}  {}", egui_phosphor::regular::CUBE, format_address(id, false)),
                    egui::FontId::proportional(theme::FONT_BODY),
                    theme::TEXT_SECONDARY,
                );
            }
            if response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if response.on_hover_text(id.as_str()).clicked() {
                clicked = Some(id.clone());
            }
        }
    });

    if pages > 1 {
        ui.add_space(theme::SPACING_MD);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(*page > 0, theme::icon_button(egui_phosphor::regular::CARET_LEFT))
                .clicked()
            {
                *page -= 1;
            }
            ui.label(
                egui::RichText::new(format!("{} / {}", *page + 1, pages)).color(theme::TEXT_MUTED),
            );
            if ui
                .add_enabled(*page + 1 < pages, theme::icon_button(egui_phosphor::regular::CARET_RIGHT))
                .clicked()
            {
                *page += 1;
            }
        });
    }

    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_cover_all_items() {
        let items: Vec<u32> = (0..50).collect();
        assert_eq!(page_count(items.len(), 24), 3);
        assert_eq!(page_slice(&items, 0, 24).len(), 24);
        assert_eq!(page_slice(&items, 2, 24), &[48, 49]);
        assert!(page_slice(&items, 5, 24).is_empty());
        assert_eq!(page_count(0, 24), 0);
    }
}
