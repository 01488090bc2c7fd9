//! Host API traits
//!
//! The window-management core never talks to clients or the GPU directly.
//! Everything it needs from the display-server runtime goes through the
//! [`Host`] trait, and drawing goes through [`Renderer`].
//!
//! # Implementation Guide
//!
//! ## Event Loop
//! 1. Translate runtime notifications into [`HostEvent`](crate::core::HostEvent)s
//!    and send them to the [`Runtime`](crate::core::Runtime) channel
//! 2. Let the runtime dispatch them and fire timers
//! 3. On each output frame, call `Compositor::render_output()` with a [`Renderer`]
//! 4. Drain `Compositor::take_events()` and deliver results to clients

use std::time::Instant;

use crate::core::input::{AxisEvent, ButtonState, KeyState, Modifiers};
use crate::core::output::{HeadState, Output};
use crate::util::geometry::{IRect, Transform};

/// Non-owning handle to a host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Handle to a physical output known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u32);

/// Result of a hit test: the surface under a point, in its local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub surface: SurfaceId,
    pub sx: f64,
    pub sy: f64,
}

/// One surface of a view's surface tree, positioned relative to the view's
/// primary surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsurfaceInfo {
    pub surface: SurfaceId,
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
    pub transform: Transform,
}

impl SubsurfaceInfo {
    /// The primary surface itself, at the origin of the tree.
    pub fn root(surface: SurfaceId) -> Self {
        Self {
            surface,
            offset_x: 0,
            offset_y: 0,
            width: 0,
            height: 0,
            transform: Transform::Normal,
        }
    }
}

/// Primitive operations provided by the display-server runtime.
pub trait Host {
    // =========================================================================
    // Seat routing
    // =========================================================================

    /// Route keyboard focus to `surface`.
    fn keyboard_enter(&mut self, surface: SurfaceId);

    fn keyboard_clear_focus(&mut self);

    /// Forward a key event to the keyboard-focused client.
    fn keyboard_key(&mut self, time_ms: u32, keycode: u32, state: KeyState);

    fn keyboard_modifiers(&mut self, modifiers: Modifiers);

    /// Route pointer focus to `surface` at surface-local coordinates.
    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64);

    fn pointer_clear_focus(&mut self);

    fn pointer_motion(&mut self, time_ms: u32, sx: f64, sy: f64);

    fn pointer_button(&mut self, time_ms: u32, button: u32, state: ButtonState);

    fn pointer_axis(&mut self, time_ms: u32, axis: &AxisEvent);

    fn pointer_frame(&mut self);

    /// Show a named cursor image from the cursor theme.
    fn set_cursor_image(&mut self, name: &str);

    // =========================================================================
    // Surface negotiation
    // =========================================================================

    /// Ask a toplevel client to resize to `width`x`height`.
    fn configure_toplevel(&mut self, surface: SurfaceId, width: i32, height: i32);

    fn set_toplevel_activated(&mut self, surface: SurfaceId, activated: bool);

    /// Tell a layer client the size it was given.
    fn configure_layer(&mut self, surface: SurfaceId, width: u32, height: u32);

    /// Move and resize a legacy (X11) window.
    fn configure_legacy(&mut self, surface: SurfaceId, x: i32, y: i32, width: i32, height: i32);

    fn activate_legacy(&mut self, surface: SurfaceId, activated: bool);

    /// Find the surface of `root`'s tree under a point given in `root`-local
    /// coordinates.
    ///
    /// The caller has already checked the point against the view's box. Hosts
    /// without sub-surface knowledge can keep the default, which answers with
    /// the root surface itself.
    fn surface_at(&self, root: SurfaceId, sx: f64, sy: f64) -> Option<SurfaceHit> {
        Some(SurfaceHit { surface: root, sx, sy })
    }

    /// All surfaces of `root`'s tree, the root first.
    fn surface_tree(&self, root: SurfaceId) -> Vec<SubsurfaceInfo> {
        vec![SubsurfaceInfo::root(root)]
    }

    // =========================================================================
    // Output devices
    // =========================================================================

    /// Check whether `head` could be applied to `output` without applying it.
    fn test_output(&self, output: &Output, head: &HeadState) -> bool;

    /// Apply `head` to the device behind `output`. Returns `false` when the
    /// device refused the state.
    fn commit_output(&mut self, output: &Output, head: &HeadState) -> bool;

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Ask the runtime to shut the display down.
    fn terminate(&mut self);
}

/// Drawing primitives for one output frame.
pub trait Renderer {
    /// Start a frame on `output`. Returns `false` if the output cannot be drawn
    /// to right now, in which case the frame is skipped.
    fn begin(&mut self, output: OutputId, width: i32, height: i32) -> bool;

    fn clear(&mut self, color: [f32; 4]);

    /// Draw the current buffer of `surface` into `target` (output pixels).
    fn draw_surface(
        &mut self,
        surface: SurfaceId,
        target: IRect,
        surface_transform: Transform,
        output_transform: Transform,
    );

    /// Let the client know its frame was displayed.
    fn send_frame_done(&mut self, surface: SurfaceId, when: Instant);

    fn end(&mut self);
}
