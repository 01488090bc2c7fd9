//! View lifecycle and focus methods.
//!
//! Contains `CompositorState` methods for creating, mapping, unmapping and
//! destroying views, moving keyboard focus between them, and starting grabs
//! on behalf of clients.

use super::*;
use crate::core::errors::{CoreError, Result};
use crate::core::window::{GrabMode, Order, RenderLayer, SurfaceCommit, View, ViewId, ViewKind};
use crate::platform::api::{Host, OutputId, SurfaceHit, SurfaceId};
use crate::util::geometry::Edges;
use crate::util::logging::{FOCUS, VIEWS};

impl CompositorState {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Register a view for a new surface.
    pub fn add_view(&mut self, view: View) -> ViewId {
        let kind = view.kind();
        let surface = view.surface();
        let id = self.views.insert(view);
        tracing::debug!("New {:?} view {:?} for {:?}", kind, id, surface);
        id
    }

    /// Register a layer surface, bound to the requested output or else the
    /// first one, and lay it out right away.
    pub fn add_layer_view(
        &mut self,
        surface: SurfaceId,
        output: Option<OutputId>,
        host: &mut dyn Host,
    ) -> ViewId {
        let bound = self.outputs.find(output).map(|output| output.id);
        if bound.is_none() {
            tracing::warn!("Layer surface {:?} has no output to live on", surface);
        }
        let id = self.add_view(View::layer(surface, bound));
        self.arrange_view(id, host);
        id
    }

    /// Take in committed client state for the view of `surface`.
    pub fn commit_surface(&mut self, surface: SurfaceId, commit: &SurfaceCommit, host: &mut dyn Host) {
        let Some(id) = self.views.find_by_surface(surface) else {
            tracing::trace!("Commit for unmanaged surface {:?}", surface);
            return;
        };
        let applied = self
            .views
            .get_mut(id)
            .map_or(false, |view| view.apply_commit(commit));
        if !applied {
            tracing::trace!("Ignoring commit of the wrong kind for {:?}", surface);
            return;
        }
        if self.views.get(id).map(View::kind) == Some(ViewKind::Layer) {
            self.arrange_view(id, host);
        }
    }

    /// Lay a layer view out on the output it is bound to.
    fn arrange_view(&mut self, id: ViewId, host: &mut dyn Host) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let Some(output) = view.output().and_then(|output| self.outputs.find(Some(output))) else {
            return;
        };
        view.arrange(output, host);
    }

    /// The surface was mapped: it gets focus and goes on top.
    ///
    /// Layer surfaces that don't take keyboard input are only raised.
    pub fn map_surface(&mut self, surface: SurfaceId, host: &mut dyn Host) -> Result<()> {
        let id = self.view_for_surface(surface)?;
        let wants_focus = match self.views.get_mut(id) {
            Some(view) => {
                view.set_mapped(true);
                view.wants_focus_on_map()
            }
            None => return Err(CoreError::InvalidViewId(id)),
        };
        crate::wlog!(VIEWS, "Mapped view {:?}", id);

        if wants_focus {
            self.focus_view(Some(id), true, host);
        } else {
            self.views.raise(id);
        }
        Ok(())
    }

    /// The surface was unmapped. If it had keyboard focus, focus moves to the
    /// next older mapped view in cycle order, or is cleared if there is none.
    pub fn unmap_surface(&mut self, surface: SurfaceId, host: &mut dyn Host) -> Result<()> {
        let id = self.view_for_surface(surface)?;

        if self.seat.has_keyboard_focus(surface) {
            let fallback = match self.views.get(id).map(View::kind) {
                Some(kind) if kind.is_cyclable() => self.next_mapped(id, Direction::Prev),
                _ => self
                    .views
                    .ids(Order::User)
                    .into_iter()
                    .find(|other| *other != id && self.is_mapped(*other)),
            };

            match fallback {
                Some(next) => self.focus_view(Some(next), true, host),
                None => {
                    if let Some(view) = self.views.get_mut(id) {
                        view.set_activated(false, host);
                    }
                    self.seat.keyboard_focus = None;
                    host.keyboard_clear_focus();
                    self.pending_compositor_events
                        .push(CompositorEvent::FocusChanged { surface: None });
                    tracing::debug!("Last view unmapped, keyboard focus cleared");
                }
            }
        }

        if let Some(view) = self.views.get_mut(id) {
            view.set_mapped(false);
        }
        crate::wlog!(VIEWS, "Unmapped view {:?}", id);
        Ok(())
    }

    /// The surface is gone: drop its view and everything that refers to it.
    pub fn destroy_surface(&mut self, surface: SurfaceId) -> Result<()> {
        let id = self.view_for_surface(surface)?;

        if self.grab.view == Some(id) {
            tracing::debug!("Grabbed view destroyed, ending grab");
            self.grab.end();
        }
        let had_focus = self.seat.has_keyboard_focus(surface);
        self.seat.forget_surface(surface);
        if had_focus {
            self.pending_compositor_events
                .push(CompositorEvent::FocusChanged { surface: None });
        }

        let mut view = self.views.remove(id).ok_or(CoreError::InvalidViewId(id))?;
        view.destroy();
        self.pending_compositor_events
            .push(CompositorEvent::ViewDestroyed { surface });
        tracing::debug!("Destroyed view {:?}", id);
        Ok(())
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Give keyboard focus to a view, raising it first if asked to.
    ///
    /// Raising happens even when the view already has focus, since it may
    /// have been focused without being raised.
    pub fn focus_view(&mut self, id: Option<ViewId>, raise: bool, host: &mut dyn Host) {
        let Some(id) = id else {
            return;
        };
        if raise {
            self.views.raise(id);
        }
        let Some(surface) = self.views.get(id).and_then(View::surface) else {
            return;
        };

        if let Some(previous) = self.seat.keyboard_focus {
            if previous == surface {
                return;
            }
            if let Some(old) = self.views.find_by_surface(previous) {
                if let Some(view) = self.views.get_mut(old) {
                    view.set_activated(false, host);
                }
            }
        }

        if let Some(view) = self.views.get_mut(id) {
            view.set_activated(true, host);
        }
        self.seat.keyboard_focus = Some(surface);
        host.keyboard_enter(surface);
        host.keyboard_modifiers(self.seat.modifiers);
        self.pending_compositor_events
            .push(CompositorEvent::FocusChanged { surface: Some(surface) });
        crate::wlog!(FOCUS, "Keyboard focus -> {:?}", surface);
    }

    /// The view that has keyboard focus.
    pub fn focused_view(&self) -> Option<ViewId> {
        self.seat
            .keyboard_focus
            .and_then(|surface| self.views.find_by_surface(surface))
    }

    /// Focus and raise the next mapped view in cycle order.
    pub fn focus_next(&mut self, host: &mut dyn Host) {
        let next = self.focused_view().and_then(|id| self.next_mapped(id, Direction::Next));
        self.focus_view(next, true, host);
    }

    /// Focus and raise the previous (older) mapped view in cycle order.
    pub fn focus_prev(&mut self, host: &mut dyn Host) {
        let prev = self.focused_view().and_then(|id| self.next_mapped(id, Direction::Prev));
        self.focus_view(prev, true, host);
    }

    /// Walk user order from `from`, returning the first other view that is
    /// mapped.
    fn next_mapped(&self, from: ViewId, direction: Direction) -> Option<ViewId> {
        let step = |id| match direction {
            Direction::Next => self.views.cycle_next(id),
            Direction::Prev => self.views.cycle_prev(id),
        };
        let mut current = step(from)?;
        while current != from {
            if self.is_mapped(current) {
                return Some(current);
            }
            current = step(current)?;
        }
        None
    }

    // =========================================================================
    // Grabs
    // =========================================================================

    /// Start a move or resize grab on `id` at the current pointer position.
    pub fn begin_grab(&mut self, id: ViewId, mode: GrabMode, edges: Edges) {
        let Some(origin) = self.views.get(id).and_then(View::position) else {
            return;
        };
        self.grab.begin(id, mode, edges, origin, self.seat.pointer());
        tracing::debug!("Started {:?} grab of {:?} on {:?}", mode, id, edges);
    }

    /// A client asked to be moved. Only the focused view may do that.
    pub fn request_move(&mut self, surface: SurfaceId) {
        if !self.seat.has_keyboard_focus(surface) {
            tracing::debug!("Denying move request from unfocused {:?}", surface);
            return;
        }
        if let Some(id) = self.views.find_by_surface(surface) {
            let anchor = self.views.get(id).map(View::anchor).unwrap_or_default();
            self.begin_grab(id, GrabMode::Move, anchor);
        }
    }

    /// A client asked to be resized. Only the focused view may do that.
    pub fn request_resize(&mut self, surface: SurfaceId, edges: Edges) {
        if !self.seat.has_keyboard_focus(surface) {
            tracing::debug!("Denying resize request from unfocused {:?}", surface);
            return;
        }
        if let Some(id) = self.views.find_by_surface(surface) {
            self.begin_grab(id, GrabMode::Resize, edges);
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The topmost mapped view under a layout point and the surface hit.
    ///
    /// Higher render layers win; within a layer, draw order decides.
    pub fn view_at(&self, x: f64, y: f64, host: &dyn Host) -> Option<(ViewId, SurfaceHit)> {
        let front_to_back = self.views.ids(Order::Draw);
        RenderLayer::ALL.iter().rev().find_map(|layer| {
            front_to_back.iter().find_map(|id| {
                let view = self.views.get(*id)?;
                if !view.is_mapped() || view.render_layer() != *layer {
                    return None;
                }
                view.surface_at(x, y, host).map(|hit| (*id, hit))
            })
        })
    }

    fn view_for_surface(&self, surface: SurfaceId) -> Result<ViewId> {
        self.views
            .find_by_surface(surface)
            .ok_or_else(|| CoreError::state_error(format!("no view for {:?}", surface)))
    }

    fn is_mapped(&self, id: ViewId) -> bool {
        self.views.get(id).map_or(false, View::is_mapped)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Prev,
}
