//! Input handling methods.
//!
//! Pointer motion either drives the active grab or is passed through to the
//! surface under the pointer. Key presses and clicks made while holding the
//! compositor modifiers are bindings and never reach clients.

use super::*;
use crate::core::input::{buttons, keysyms, ButtonState, KeyState, Modifiers};
use crate::core::window::{GrabMode, View};
use crate::platform::api::Host;
use crate::util::geometry::Edges;
use crate::util::logging::INPUT;

impl CompositorState {
    // =========================================================================
    // Pointer
    // =========================================================================

    /// Relative motion. The pointer stays within the output layout.
    pub fn pointer_motion(&mut self, time_ms: u32, dx: f64, dy: f64, host: &mut dyn Host) {
        let (x, y) = self.seat.pointer();
        let (x, y) = self.clamp_to_layout(x + dx, y + dy);
        self.seat.set_pointer(x, y);
        self.handle_pointer_motion(time_ms, host);
    }

    /// Absolute motion, `x` and `y` normalized to `[0, 1]` over the layout.
    pub fn pointer_motion_absolute(&mut self, time_ms: u32, x: f64, y: f64, host: &mut dyn Host) {
        let Some(extents) = self.outputs.layout_extents() else {
            return;
        };
        let x = extents.x as f64 + x.clamp(0.0, 1.0) * extents.width as f64;
        let y = extents.y as f64 + y.clamp(0.0, 1.0) * extents.height as f64;
        let (x, y) = self.clamp_to_layout(x, y);
        self.seat.set_pointer(x, y);
        self.handle_pointer_motion(time_ms, host);
    }

    fn clamp_to_layout(&self, x: f64, y: f64) -> (f64, f64) {
        self.outputs.closest_point(x, y).unwrap_or((x, y))
    }

    /// Dispatch the current pointer position to the grab or to clients.
    pub fn handle_pointer_motion(&mut self, time_ms: u32, host: &mut dyn Host) {
        match self.grab.mode {
            GrabMode::Move => self.grab_move(host),
            GrabMode::Resize => self.grab_resize(host),
            GrabMode::None => self.pointer_passthrough(time_ms, host),
        }
    }

    fn grab_move(&mut self, host: &mut dyn Host) {
        let (x, y) = self.seat.pointer();
        let rect = self.grab.moved(x, y);
        let Some(view) = self.grab.target().and_then(|id| self.views.get_mut(id)) else {
            tracing::debug!("Grabbed view is gone, ending grab");
            self.grab.end();
            return;
        };
        view.set_position(rect, host);
    }

    fn grab_resize(&mut self, host: &mut dyn Host) {
        let (x, y) = self.seat.pointer();
        let floor = self.config.min_view_size;
        let Some(view) = self.grab.target().and_then(|id| self.views.get_mut(id)) else {
            tracing::debug!("Grabbed view is gone, ending grab");
            self.grab.end();
            return;
        };
        let Some(constraints) = view.constraints(floor) else {
            return;
        };
        let rect = self.grab.resized(x, y, &constraints);
        view.set_position(rect, host);
        // Keep the corner opposite the drag still while the client catches up.
        view.set_anchor(self.grab.edges.opposite());
    }

    /// Route pointer focus to whatever is under the pointer.
    fn pointer_passthrough(&mut self, time_ms: u32, host: &mut dyn Host) {
        let (x, y) = self.seat.pointer();
        let hit = self.view_at(x, y, &*host);

        if hit.is_none() {
            host.set_cursor_image(&self.config.cursor_image);
        }

        match hit {
            None => {
                if self.seat.pointer_focus.take().is_some() {
                    host.pointer_clear_focus();
                }
            }
            Some((id, hit)) if self.seat.pointer_focus != Some(hit.surface) => {
                host.pointer_enter(hit.surface, hit.sx, hit.sy);
                self.seat.pointer_focus = Some(hit.surface);
                if self.config.focus_follows_pointer {
                    self.focus_view(Some(id), false, host);
                }
            }
            Some((_, hit)) => host.pointer_motion(time_ms, hit.sx, hit.sy),
        }
    }

    /// Any release ends a grab. A press focuses and raises the view under the
    /// pointer and, with the compositor modifiers held, may start a grab.
    pub fn pointer_button(&mut self, time_ms: u32, button: u32, state: ButtonState, host: &mut dyn Host) {
        if state.is_released() {
            if self.grab.is_active() {
                tracing::debug!("Button released, ending {:?} grab", self.grab.mode);
            }
            self.grab.end();
        } else {
            let (x, y) = self.seat.pointer();
            if let Some((id, _)) = self.view_at(x, y, &*host) {
                self.focus_view(Some(id), true, host);

                if self.seat.holds_any(self.config.compositor_modifiers) {
                    match button {
                        buttons::BTN_LEFT => {
                            let anchor = self.views.get(id).map(View::anchor).unwrap_or_default();
                            self.begin_grab(id, GrabMode::Move, anchor);
                            return;
                        }
                        buttons::BTN_RIGHT => {
                            self.begin_grab(id, GrabMode::Resize, Edges::BOTTOM | Edges::RIGHT);
                            return;
                        }
                        _ => {}
                    }
                }
            }
        }
        host.pointer_button(time_ms, button, state);
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key. With the compositor modifiers held, a press may trigger
    /// a binding and a release cancels any grab.
    pub fn keyboard_key(
        &mut self,
        time_ms: u32,
        keycode: u32,
        syms: &[u32],
        state: KeyState,
        host: &mut dyn Host,
    ) {
        if self.seat.holds_any(self.config.compositor_modifiers) {
            match state {
                KeyState::Pressed => {
                    for sym in syms {
                        match *sym {
                            keysyms::KEY_ESCAPE => {
                                crate::wlog!(INPUT, "Exit binding pressed, terminating");
                                self.running = false;
                                host.terminate();
                                return;
                            }
                            keysyms::KEY_J => {
                                self.focus_next(host);
                                return;
                            }
                            keysyms::KEY_K => {
                                self.focus_prev(host);
                                return;
                            }
                            _ => {}
                        }
                    }
                }
                KeyState::Released => self.grab.end(),
            }
        }
        host.keyboard_key(time_ms, keycode, state);
    }

    pub fn keyboard_modifiers(&mut self, modifiers: Modifiers, host: &mut dyn Host) {
        self.seat.modifiers = modifiers;
        host.keyboard_modifiers(modifiers);
    }
}
