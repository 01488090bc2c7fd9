//! Embedded X11 windows.

use crate::core::output::Output;
use crate::core::window::constraints::SizeConstraints;
use crate::core::window::view::{hit_test_box, SurfaceCommit, ViewBase, ViewKind, ViewRole};
use crate::platform::api::{Host, SubsurfaceInfo, SurfaceHit, SurfaceId};
use crate::util::geometry::{Edges, Rect};

/// ICCCM size hints; `0` means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeHints {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

/// State of an X11 window as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegacyCommit {
    pub width: i32,
    pub height: i32,
    pub size_hints: Option<SizeHints>,
}

#[derive(Debug)]
pub struct Legacy {
    base: ViewBase,
    committed: LegacyCommit,
    activated: bool,
}

impl Legacy {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            base: ViewBase::new(surface),
            committed: LegacyCommit::default(),
            activated: false,
        }
    }
}

impl ViewRole for Legacy {
    fn kind(&self) -> ViewKind {
        ViewKind::Legacy
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_position(&mut self, rect: Rect, host: &mut dyn Host) {
        if self.base.edges == rect {
            return;
        }
        self.base.edges = rect;
        host.configure_legacy(
            self.base.surface,
            rect.left as i32,
            rect.top as i32,
            rect.width() as i32,
            rect.height() as i32,
        );
    }

    fn position(&self) -> Rect {
        let edges = self.base.edges;
        let (width, height) = (self.committed.width as f64, self.committed.height as f64);

        let (top, bottom) = if self.base.anchor.contains(Edges::TOP) {
            (edges.top, edges.top + height)
        } else {
            (edges.bottom - height, edges.bottom)
        };
        let (left, right) = if self.base.anchor.contains(Edges::LEFT) {
            (edges.left, edges.left + width)
        } else {
            (edges.right - width, edges.right)
        };
        Rect::new(top, right, bottom, left)
    }

    fn set_activated(&mut self, activated: bool, host: &mut dyn Host) {
        self.activated = activated;
        host.activate_legacy(self.base.surface, activated);
    }

    fn activated(&self) -> bool {
        self.activated
    }

    fn constraints(&self) -> Option<SizeConstraints> {
        self.committed.size_hints.map(|hints| {
            SizeConstraints::new(
                hints.min_width as f64,
                hints.max_width as f64,
                hints.min_height as f64,
                hints.max_height as f64,
            )
        })
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
            SurfaceCommit::Legacy(state) => {
                self.committed = *state;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessHost, HostRequest};

    #[test]
    fn test_unchanged_position_is_not_reconfigured() {
        let mut host = HeadlessHost::new();
        let mut view = Legacy::new(SurfaceId(4));
        let rect = Rect::new(10.0, 110.0, 60.0, 10.0);
        view.set_position(rect, &mut host);
        view.set_position(rect, &mut host);
        assert_eq!(
            host.requests,
            vec![HostRequest::ConfigureLegacy {
                surface: SurfaceId(4),
                x: 10,
                y: 10,
                width: 100,
                height: 50,
            }]
        );
    }

    #[test]
    fn test_size_hints_become_constraints() {
        let mut view = Legacy::new(SurfaceId(4));
        assert_eq!(view.constraints(), None);
        view.apply_commit(&SurfaceCommit::Legacy(LegacyCommit {
            width: 300,
            height: 200,
            size_hints: Some(SizeHints { min_width: 120, max_width: 640, ..Default::default() }),
        }));
        let c = view.constraints().unwrap();
        assert_eq!((c.min_width, c.max_width, c.min_height, c.max_height), (120.0, 640.0, 0.0, 0.0));
    }

    #[test]
    fn test_position_uses_committed_size() {
        let mut host = HeadlessHost::new();
        let mut view = Legacy::new(SurfaceId(4));
        view.apply_commit(&SurfaceCommit::Legacy(LegacyCommit { width: 80, height: 40, size_hints: None }));
        view.set_position(Rect::new(0.0, 100.0, 100.0, 0.0), &mut host);
        view.base_mut().anchor = Edges::BOTTOM | Edges::LEFT;
        assert_eq!(view.position(), Rect::new(60.0, 80.0, 100.0, 0.0));
    }
}
