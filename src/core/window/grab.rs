//! Interactive move and resize.
//!
//! A grab remembers the view's box and the pointer position at the moment it
//! started. Every motion event recomputes the box from those two snapshots,
//! so coalesced or dropped motion events never accumulate error.

use crate::core::window::constraints::{constrain_size, SizeConstraints};
use crate::core::window::tree::ViewId;
use crate::util::geometry::{Edges, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabMode {
    #[default]
    None,
    Move,
    Resize,
}

/// The single move/resize session of the seat.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrabSession {
    pub mode: GrabMode,
    pub view: Option<ViewId>,
    /// Edges being dragged during a resize.
    pub edges: Edges,
    /// View box when the grab started.
    pub origin: Rect,
    /// Pointer position when the grab started.
    pub pointer_x: f64,
    pub pointer_y: f64,
}

impl GrabSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, view: ViewId, mode: GrabMode, edges: Edges, origin: Rect, pointer: (f64, f64)) {
        *self = Self {
            mode,
            view: Some(view),
            edges,
            origin,
            pointer_x: pointer.0,
            pointer_y: pointer.1,
        };
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.mode != GrabMode::None
    }

    /// The grabbed view, while a grab is in progress.
    pub fn target(&self) -> Option<ViewId> {
        if self.is_active() {
            self.view
        } else {
            None
        }
    }

    fn delta(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.pointer_x, y - self.pointer_y)
    }

    /// The box for a move grab with the pointer at `(x, y)`.
    pub fn moved(&self, x: f64, y: f64) -> Rect {
        let (dx, dy) = self.delta(x, y);
        self.origin.translate(dx, dy)
    }

    /// The box for a resize grab with the pointer at `(x, y)`, clamped to
    /// `constraints`. Only the dragged edges move.
    pub fn resized(&self, x: f64, y: f64, constraints: &SizeConstraints) -> Rect {
        let (dx, dy) = self.delta(x, y);
        let mut rect = self.origin;

        if self.edges.contains(Edges::TOP) {
            rect.top += dy;
        } else if self.edges.contains(Edges::BOTTOM) {
            rect.bottom += dy;
        }
        if self.edges.contains(Edges::LEFT) {
            rect.left += dx;
        } else if self.edges.contains(Edges::RIGHT) {
            rect.right += dx;
        }

        constrain_size(self.edges, constraints, &mut rect);
        rect
    }
}
