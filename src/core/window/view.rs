//! The view abstraction.
//!
//! A view is a window or a screen region backed by one host surface. The three
//! kinds of view differ in what they can do: a layer surface can't be
//! activated, a toplevel reports size constraints, and so on. Each kind
//! implements [`ViewRole`], whose methods all have neutral defaults, so asking
//! a view for something its kind doesn't support is a no-op rather than an
//! error.
//!
//! Callers never talk to a role directly. [`View`] wraps the role and refuses
//! every operation once the view has been destroyed.

use std::fmt;

use crate::core::output::Output;
use crate::core::window::constraints::SizeConstraints;
use crate::core::window::layer::LayerCommit;
use crate::core::window::legacy::LegacyCommit;
use crate::core::window::toplevel::ToplevelCommit;
use crate::platform::api::{Host, OutputId, SubsurfaceInfo, SurfaceHit, SurfaceId};
use crate::util::geometry::{Edges, Rect};

/// Which shell a view's surface belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Toplevel,
    Layer,
    Legacy,
}

impl ViewKind {
    /// Whether views of this kind take part in focus cycling.
    pub fn is_cyclable(self) -> bool {
        !matches!(self, ViewKind::Layer)
    }
}

/// Stacking band a view is drawn and hit-tested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderLayer {
    Background,
    Bottom,
    #[default]
    Normal,
    Top,
    Overlay,
}

impl RenderLayer {
    /// Every layer, bottom-most first.
    pub const ALL: [RenderLayer; 5] = [
        RenderLayer::Background,
        RenderLayer::Bottom,
        RenderLayer::Normal,
        RenderLayer::Top,
        RenderLayer::Overlay,
    ];
}

/// Committed surface state reported by the host, one variant per view kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommit {
    Toplevel(ToplevelCommit),
    Layer(LayerCommit),
    Legacy(LegacyCommit),
}

/// State every view kind has.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBase {
    pub surface: SurfaceId,
    pub valid: bool,
    pub mapped: bool,
    /// Sides of the box that stay put when the committed size changes.
    pub anchor: Edges,
    pub render_layer: RenderLayer,
    /// Requested box, in layout coordinates.
    pub edges: Rect,
}

impl ViewBase {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            valid: true,
            mapped: false,
            anchor: Edges::TOP | Edges::LEFT,
            render_layer: RenderLayer::Normal,
            edges: Rect::default(),
        }
    }
}

/// Operations a view kind may support.
///
/// Only `kind`, `base` and `base_mut` are required.
pub trait ViewRole: fmt::Debug {
    fn kind(&self) -> ViewKind;

    fn base(&self) -> &ViewBase;

    fn base_mut(&mut self) -> &mut ViewBase;

    /// Move and resize to `rect`.
    fn set_position(&mut self, _rect: Rect, _host: &mut dyn Host) {}

    /// The box the view currently covers.
    fn position(&self) -> Rect {
        self.base().edges
    }

    fn set_activated(&mut self, _activated: bool, _host: &mut dyn Host) {}

    fn activated(&self) -> bool {
        false
    }

    /// The client's own size limits, `None` if this kind has none.
    fn constraints(&self) -> Option<SizeConstraints> {
        None
    }

    /// Find the surface under a layout-coordinate point.
    fn surface_at(&self, _x: f64, _y: f64, _host: &dyn Host) -> Option<SurfaceHit> {
        None
    }

    fn is_visible_on(&self, _output: &Output) -> bool {
        false
    }

    /// Lay the view out relative to `output`. Only layer surfaces do this.
    fn arrange(&mut self, _output: &Output, _host: &mut dyn Host) {}

    /// The output this view is bound to, if its kind binds to one.
    fn output(&self) -> Option<OutputId> {
        None
    }

    /// Whether mapping this view should give it keyboard focus.
    fn wants_focus_on_map(&self) -> bool {
        true
    }

    fn for_each_surface(&self, _host: &dyn Host, _f: &mut dyn FnMut(&SubsurfaceInfo)) {}

    /// Take in committed client state. Returns `false` if the commit is for a
    /// different kind of view.
    fn apply_commit(&mut self, _commit: &SurfaceCommit) -> bool {
        false
    }

    fn destroy(&mut self) {
        self.base_mut().valid = false;
    }
}

/// Shared hit test: check the view box, then ask the host which surface of
/// the tree is at the point.
pub(crate) fn hit_test_box(
    position: Rect,
    surface: SurfaceId,
    x: f64,
    y: f64,
    host: &dyn Host,
) -> Option<SurfaceHit> {
    if !position.contains(x, y) {
        return None;
    }
    host.surface_at(surface, x - position.left, y - position.top)
}

/// A view in the registry.
#[derive(Debug)]
pub struct View {
    role: Box<dyn ViewRole>,
}

impl View {
    pub fn new(role: Box<dyn ViewRole>) -> Self {
        Self { role }
    }

    pub fn is_valid(&self) -> bool {
        self.role.base().valid
    }

    pub fn kind(&self) -> ViewKind {
        self.role.kind()
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.is_valid().then(|| self.role.base().surface)
    }

    pub fn is_mapped(&self) -> bool {
        self.is_valid() && self.role.base().mapped
    }

    pub fn set_mapped(&mut self, mapped: bool) {
        if self.is_valid() {
            self.role.base_mut().mapped = mapped;
        }
    }

    pub fn anchor(&self) -> Edges {
        if !self.is_valid() {
            return Edges::empty();
        }
        self.role.base().anchor
    }

    pub fn set_anchor(&mut self, anchor: Edges) {
        if self.is_valid() {
            self.role.base_mut().anchor = anchor;
        }
    }

    pub fn render_layer(&self) -> RenderLayer {
        if !self.is_valid() {
            return RenderLayer::default();
        }
        self.role.base().render_layer
    }

    /// The box last asked for, before the client has had a chance to commit
    /// a matching size.
    pub fn requested_position(&self) -> Option<Rect> {
        self.is_valid().then(|| self.role.base().edges)
    }

    pub fn position(&self) -> Option<Rect> {
        self.is_valid().then(|| self.role.position())
    }

    /// Move and resize the view. Inverted boxes are collapsed first.
    pub fn set_position(&mut self, rect: Rect, host: &mut dyn Host) {
        if self.is_valid() {
            self.role.set_position(rect.normalized(), host);
        }
    }

    pub fn activated(&self) -> bool {
        self.is_valid() && self.role.activated()
    }

    pub fn set_activated(&mut self, activated: bool, host: &mut dyn Host) {
        if self.is_valid() {
            self.role.set_activated(activated, host);
        }
    }

    /// Size limits with both minimums raised to at least `floor`.
    ///
    /// A kind without limits of its own still gets the floor.
    pub fn constraints(&self, floor: f64) -> Option<SizeConstraints> {
        if !self.is_valid() {
            return None;
        }
        let own = self.role.constraints().unwrap_or(SizeConstraints::UNCONSTRAINED);
        Some(own.with_floor(floor))
    }

    pub fn surface_at(&self, x: f64, y: f64, host: &dyn Host) -> Option<SurfaceHit> {
        if !self.is_valid() {
            return None;
        }
        self.role.surface_at(x, y, host)
    }

    pub fn is_visible_on(&self, output: &Output) -> bool {
        self.is_valid() && self.role.is_visible_on(output)
    }

    pub fn arrange(&mut self, output: &Output, host: &mut dyn Host) {
        if self.is_valid() {
            self.role.arrange(output, host);
        }
    }

    pub fn output(&self) -> Option<OutputId> {
        if !self.is_valid() {
            return None;
        }
        self.role.output()
    }

    pub fn wants_focus_on_map(&self) -> bool {
        self.is_valid() && self.role.wants_focus_on_map()
    }

    pub fn for_each_surface(&self, host: &dyn Host, f: &mut dyn FnMut(&SubsurfaceInfo)) {
        if self.is_valid() {
            self.role.for_each_surface(host, f);
        }
    }

    pub fn apply_commit(&mut self, commit: &SurfaceCommit) -> bool {
        self.is_valid() && self.role.apply_commit(commit)
    }

    pub fn destroy(&mut self) {
        if self.is_valid() {
            self.role.destroy();
        }
    }
}
