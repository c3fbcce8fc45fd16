//! Modal panel with scroll lock and Escape / click-outside closing

use crate::theme;
use crate::types::Overflow;
use crate::viewport::ViewportController;
use eframe::egui;
use std::hash::Hash;

pub struct PanelResponse<R> {
    pub inner: R,
    /// Escape, backdrop click or the close button
    pub should_close: bool,
}

/// Generic modal container. Scrolling stays locked for as long as the
/// panel value lives; dropping it restores the previous overflow.
pub struct Panel<V: ViewportController> {
    id: egui::Id,
    header: Option<String>,
    width: f32,
    viewport: V,
    previous_overflow: Overflow,
}

impl<V: ViewportController> Panel<V> {
    pub fn open(id_salt: impl Hash, header: Option<String>, mut viewport: V) -> Self {
        let previous_overflow = viewport.lock_scroll();
        Self {
            id: egui::Id::new(id_salt),
            header,
            width: 460.0,
            viewport,
            previous_overflow,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// True if Escape was pressed since the last poll
    pub fn poll_escape(&mut self) -> bool {
        let mut pressed = false;
        self.viewport.on_escape(&mut || pressed = true);
        pressed
    }

    pub fn show<R>(
        &mut self,
        ctx: &egui::Context,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> PanelResponse<R> {
        let escape = self.poll_escape();
        let header = self.header.clone();
        let width = self.width;
        let mut close_clicked = false;

        let modal = egui::Modal::new(self.id)
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let response = modal.show(ctx, |ui| {
            ui.set_width(width);

            if let Some(title) = &header {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(title).size(theme::FONT_HEADING).strong(),
                        )
                        .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close = ui
                            .add(theme::icon_button(egui_phosphor::regular::X))
                            .on_hover_text("Close");
                        if close.clicked() {
                            close_clicked = true;
                        }
                    });
                });
                ui.add_space(theme::SPACING_SM);
                ui.separator();
                ui.add_space(theme::SPACING_SM);
            }

            egui::ScrollArea::vertical()
                .max_height(ui.ctx().screen_rect().height() * 0.7)
                .show(ui, add_contents)
                .inner
        });

        let outside = response.backdrop_response.clicked();
        PanelResponse {
            inner: response.inner,
            should_close: escape || outside || close_clicked,
        }
    }
}

impl<V: ViewportController> Drop for Panel<V> {
    fn drop(&mut self) {
        self.viewport.restore_scroll(self.previous_overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mock::MockViewport;

    #[test]
    fn locks_scroll_while_open_and_restores_on_drop() {
        let viewport = MockViewport::default();
        let panel = Panel::open("p", None, viewport.clone());
        assert_eq!(viewport.overflow(), Overflow::Hidden);
        drop(panel);
        assert_eq!(viewport.overflow(), Overflow::Auto);
    }

    #[test]
    fn nested_panels_restore_previous_value() {
        let viewport = MockViewport::default();
        let outer = Panel::open("outer", None, viewport.clone());
        let inner = Panel::open("inner", None, viewport.clone());
        drop(inner);
        assert_eq!(viewport.overflow(), Overflow::Hidden);
        drop(outer);
        assert_eq!(viewport.overflow(), Overflow::Auto);
    }

    #[test]
    fn escape_requests_close() {
        let viewport = MockViewport::default();
        let mut panel = Panel::open("p", Some("Order".into()), viewport.clone());
        let ctx = egui::Context::default();

        let mut closes = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            closes.push(panel.show(ctx, |ui| ui.label("body")).should_close);
        });
        viewport.0.borrow_mut().escape_pressed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            closes.push(panel.show(ctx, |ui| ui.label("body")).should_close);
        });

        assert!(!closes[0]);
        assert!(closes.iter().any(|c| *c));
    }
}
