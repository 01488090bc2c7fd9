//! Application windows.

use crate::core::output::Output;
use crate::core::window::constraints::SizeConstraints;
use crate::core::window::view::{hit_test_box, SurfaceCommit, ViewBase, ViewKind, ViewRole};
use crate::platform::api::{Host, SubsurfaceInfo, SurfaceHit, SurfaceId};
use crate::util::geometry::{Edges, IRect, Rect};

/// State a toplevel client last committed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToplevelCommit {
    /// Window geometry: the visible part of the surface, excluding shadows.
    /// `x`/`y` are the offset of that part within the surface.
    pub geometry: IRect,
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

#[derive(Debug)]
pub struct Toplevel {
    base: ViewBase,
    committed: ToplevelCommit,
    activated: bool,
}

impl Toplevel {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            base: ViewBase::new(surface),
            committed: ToplevelCommit::default(),
            activated: false,
        }
    }

    pub fn committed(&self) -> &ToplevelCommit {
        &self.committed
    }
}

impl ViewRole for Toplevel {
    fn kind(&self) -> ViewKind {
        ViewKind::Toplevel
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    /// Store the box relative to the window geometry and ask the client for
    /// the new size if it differs from what it has.
    fn set_position(&mut self, rect: Rect, host: &mut dyn Host) {
        let geometry = self.committed.geometry;
        let (x, y) = (geometry.x as f64, geometry.y as f64);
        self.base.edges = Rect::new(rect.top - y, rect.right - x, rect.bottom - y, rect.left - x);

        let width = rect.width().round() as i32;
        let height = rect.height().round() as i32;
        if geometry.width != width || geometry.height != height {
            host.configure_toplevel(self.base.surface, width, height);
        }
    }

    /// The committed size, pinned to the anchored side on each axis.
    fn position(&self) -> Rect {
        let geometry = self.committed.geometry;
        let edges = self.base.edges;
        let (x, y) = (geometry.x as f64, geometry.y as f64);
        let (width, height) = (geometry.width as f64, geometry.height as f64);

        let (top, bottom) = if self.base.anchor.contains(Edges::TOP) {
            let top = edges.top + y;
            (top, top + height)
        } else {
            let bottom = edges.bottom + y;
            (bottom - height, bottom)
        };
        let (left, right) = if self.base.anchor.contains(Edges::LEFT) {
            let left = edges.left + x;
            (left, left + width)
        } else {
            let right = edges.right + x;
            (right - width, right)
        };
        Rect::new(top, right, bottom, left)
    }

    fn set_activated(&mut self, activated: bool, host: &mut dyn Host) {
        self.activated = activated;
        host.set_toplevel_activated(self.base.surface, activated);
    }

    fn activated(&self) -> bool {
        self.activated
    }

    fn constraints(&self) -> Option<SizeConstraints> {
        let c = &self.committed;
        Some(SizeConstraints::new(
            c.min_width as f64,
            c.max_width as f64,
            c.min_height as f64,
            c.max_height as f64,
        ))
    }

    fn surface_at(&self, x: f64, y: f64, host: &dyn Host) -> Option<SurfaceHit> {
        hit_test_box(self.position(), self.base.surface, x, y, host)
    }

    fn is_visible_on(&self, output: &Output) -> bool {
        output
            .layout_box()
            .map_or(false, |b| b.to_rect().intersects(&self.position()))
    }

    fn for_each_surface(&self, host: &dyn Host, f: &mut dyn FnMut(&SubsurfaceInfo)) {
        for info in host.surface_tree(self.base.surface) {
            f(&info);
        }
    }

    fn apply_commit(&mut self, commit: &SurfaceCommit) -> bool {
        match commit {
            SurfaceCommit::Toplevel(state) => {
                self.committed = *state;
                true
            }
            _ => false,
        }
    }
}
