//! Viewport side effects behind a small capability trait
//!
//! Panels and tables never touch the window directly; they lock scrolling,
//! listen for Escape and request scroll-into-view through a
//! [`ViewportController`].

use crate::types::Overflow;
use eframe::egui;

pub trait ViewportController {
    /// Hide page scrolling. Returns the overflow value that was active before.
    fn lock_scroll(&mut self) -> Overflow;
    fn restore_scroll(&mut self, previous: Overflow);
    fn overflow(&self) -> Overflow;
    /// Run `handler` if Escape was pressed this frame
    fn on_escape(&mut self, handler: &mut dyn FnMut());
    fn scroll_into_view(&mut self, target: egui::Rect, smooth: bool);
    fn supports_smooth_scroll(&self) -> bool;
}

/// Scroll request consumed by the central scroll area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingScroll {
    pub target: egui::Rect,
    pub smooth: bool,
}

/// egui implementation; state lives in the context's temp memory
#[derive(Clone)]
pub struct EguiViewport {
    ctx: egui::Context,
    smooth_scroll: bool,
}

impl EguiViewport {
    pub fn new(ctx: &egui::Context, smooth_scroll: bool) -> Self {
        Self {
            ctx: ctx.clone(),
            smooth_scroll,
        }
    }

    fn overflow_id() -> egui::Id {
        egui::Id::new("viewport_overflow")
    }

    fn scroll_id() -> egui::Id {
        egui::Id::new("viewport_pending_scroll")
    }

    /// Take the scroll request queued by `scroll_into_view`, if any
    pub fn take_pending_scroll(&self) -> Option<PendingScroll> {
        self.ctx.data_mut(|d| {
            let pending = d.get_temp::<PendingScroll>(Self::scroll_id());
            d.remove::<PendingScroll>(Self::scroll_id());
            pending
        })
    }
}

impl ViewportController for EguiViewport {
    fn lock_scroll(&mut self) -> Overflow {
        let previous = self.overflow();
        self.ctx
            .data_mut(|d| d.insert_temp(Self::overflow_id(), Overflow::Hidden));
        previous
    }

    fn restore_scroll(&mut self, previous: Overflow) {
        self.ctx
            .data_mut(|d| d.insert_temp(Self::overflow_id(), previous));
    }

    fn overflow(&self) -> Overflow {
        self.ctx
            .data(|d| d.get_temp::<Overflow>(Self::overflow_id()))
            .unwrap_or_default()
    }

    fn on_escape(&mut self, handler: &mut dyn FnMut()) {
        if self.ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            handler();
        }
    }

    fn scroll_into_view(&mut self, target: egui::Rect, smooth: bool) {
        self.ctx.data_mut(|d| {
            d.insert_temp(Self::scroll_id(), PendingScroll { target, smooth })
        });
        self.ctx.request_repaint();
    }

    fn supports_smooth_scroll(&self) -> bool {
        self.smooth_scroll && self.ctx.style().animation_time > 0.0
    }
}

#[cfg(test)]
pub mod mock {
    //! Recording viewport for panel and table tests

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct MockState {
        pub overflow: Overflow,
        pub escape_pressed: bool,
        pub scrolls: Vec<(egui::Rect, bool)>,
        pub smooth_supported: bool,
    }

    #[derive(Clone, Default)]
    pub struct MockViewport(pub Rc<RefCell<MockState>>);

    impl ViewportController for MockViewport {
        fn lock_scroll(&mut self) -> Overflow {
            let mut s = self.0.borrow_mut();
            std::mem::replace(&mut s.overflow, Overflow::Hidden)
        }

        fn restore_scroll(&mut self, previous: Overflow) {
            self.0.borrow_mut().overflow = previous;
        }

        fn overflow(&self) -> Overflow {
            self.0.borrow().overflow
        }

        fn on_escape(&mut self, handler: &mut dyn FnMut()) {
            let pressed = std::mem::take(&mut self.0.borrow_mut().escape_pressed);
            if pressed {
                handler();
            }
        }

        fn scroll_into_view(&mut self, target: egui::Rect, smooth: bool) {
            self.0.borrow_mut().scrolls.push((target, smooth));
        }

        fn supports_smooth_scroll(&self) -> bool {
            self.0.borrow().smooth_supported
        }
    }
}
