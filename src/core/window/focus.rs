//! Seat focus state.

use crate::core::input::Modifiers;
use crate::platform::api::SurfaceId;

/// What the single seat is pointing at and typing into.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeatState {
    /// The surface that currently has keyboard focus.
    pub keyboard_focus: Option<SurfaceId>,
    /// The surface that currently has pointer focus.
    pub pointer_focus: Option<SurfaceId>,
    /// Pointer position in layout coordinates.
    pub pointer_x: f64,
    pub pointer_y: f64,
    /// Modifiers held on the keyboard.
    pub modifiers: Modifiers,
}

impl SeatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> (f64, f64) {
        (self.pointer_x, self.pointer_y)
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer_x = x;
        self.pointer_y = y;
    }

    pub fn has_keyboard_focus(&self, surface: SurfaceId) -> bool {
        self.keyboard_focus == Some(surface)
    }

    /// Whether any of `binding` is held.
    pub fn holds_any(&self, binding: Modifiers) -> bool {
        self.modifiers.intersects(binding)
    }

    /// Forget a surface that went away.
    pub fn forget_surface(&mut self, surface: SurfaceId) {
        if self.keyboard_focus == Some(surface) {
            self.keyboard_focus = None;
        }
        if self.pointer_focus == Some(surface) {
            self.pointer_focus = None;
        }
    }
}
