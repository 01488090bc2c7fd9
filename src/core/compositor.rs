//! Central compositor state machine.
//!
//! The `Compositor` ties the window-management state to a [`Host`]. It:
//! - translates [`HostEvent`]s into state changes
//! - fires timers handed to it by the runtime
//! - composes output frames through a [`Renderer`]
//! - collects [`CompositorEvent`]s for the host to deliver to clients

use std::time::{Duration, Instant};

use crate::core::input::{AxisEvent, ButtonState, KeyState, Modifiers};
use crate::core::output::{ConfigRequestId, OutputConfiguration, OutputInfo, TEST_TIMEOUT_SECS};
use crate::core::runtime::TimerKind;
use crate::core::state::CompositorState;
use crate::core::window::{SurfaceCommit, View, MIN_VIEW_SIZE};
use crate::platform::api::{Host, OutputId, Renderer, SurfaceId};
use crate::util::geometry::Edges;

// ============================================================================
// Compositor Configuration
// ============================================================================

/// Configuration for the compositor
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorConfig {
    /// Smallest width/height interactive resizing may produce
    pub min_view_size: f64,
    /// How long a tested output configuration stays live unconfirmed
    pub test_timeout: Duration,
    /// Modifiers that turn key presses and clicks into compositor bindings
    pub compositor_modifiers: Modifiers,
    /// Give keyboard focus to whatever the pointer enters (without raising)
    pub focus_follows_pointer: bool,
    /// Colour outputs are cleared to before drawing
    pub background: [f32; 4],
    /// Cursor image shown over the background
    pub cursor_image: String,
    /// Shell command run once the compositor is up
    pub startup_command: Option<String>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            min_view_size: MIN_VIEW_SIZE,
            test_timeout: Duration::from_secs(TEST_TIMEOUT_SECS),
            compositor_modifiers: Modifiers::ALT | Modifiers::LOGO,
            focus_follows_pointer: false,
            background: [0.3, 0.3, 0.3, 1.0],
            cursor_image: "left_ptr".to_string(),
            startup_command: None,
        }
    }
}

// ============================================================================
// Host Events
// ============================================================================

/// Notifications from the display-server runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A client created an application window
    NewToplevel { surface: SurfaceId },
    /// A client created a layer surface, optionally for a specific output
    NewLayerSurface { surface: SurfaceId, output: Option<OutputId> },
    /// An X11 window appeared
    NewLegacySurface { surface: SurfaceId },
    /// A surface committed new state
    Commit { surface: SurfaceId, state: SurfaceCommit },
    Map { surface: SurfaceId },
    Unmap { surface: SurfaceId },
    Destroy { surface: SurfaceId },
    /// Client-side decorations asked for an interactive move
    RequestMove { surface: SurfaceId },
    /// Client-side decorations asked for an interactive resize
    RequestResize { surface: SurfaceId, edges: Edges },

    /// Relative pointer motion
    PointerMotion { time_ms: u32, dx: f64, dy: f64 },
    /// Absolute pointer motion, normalized to `[0, 1]` over the layout
    PointerMotionAbsolute { time_ms: u32, x: f64, y: f64 },
    PointerButton { time_ms: u32, button: u32, state: ButtonState },
    PointerAxis { time_ms: u32, axis: AxisEvent },
    PointerFrame,
    /// A key, with the keysyms it produces under the current keymap
    Key { time_ms: u32, keycode: u32, keysyms: Vec<u32>, state: KeyState },
    Modifiers { modifiers: Modifiers },

    OutputAdded { info: OutputInfo },
    OutputRemoved { output: OutputId },
    /// Permanently apply an output configuration
    OutputApply { request: ConfigRequestId, config: OutputConfiguration },
    /// Apply an output configuration as a preview
    OutputTest { request: ConfigRequestId, config: OutputConfiguration },
    OutputTestConfirm,
    OutputTestCancel,
    /// An output is ready for a new frame
    Frame { output: OutputId },
}

// ============================================================================
// Compositor Events
// ============================================================================

/// Events emitted by the compositor for the host to handle
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorEvent {
    /// An output configuration request succeeded
    OutputConfigurationSucceeded { request: ConfigRequestId },
    /// An output configuration request failed or was reverted
    OutputConfigurationFailed { request: ConfigRequestId },
    /// The output layout changed; listeners get the new configuration
    OutputConfigurationChanged { configuration: OutputConfiguration },
    /// A view was removed from the registry
    ViewDestroyed { surface: SurfaceId },
    /// Keyboard focus moved
    FocusChanged { surface: Option<SurfaceId> },
}

// ============================================================================
// Main Compositor
// ============================================================================

/// The main compositor object.
pub struct Compositor<H: Host> {
    state: CompositorState,
    host: H,
    renderer: Option<Box<dyn Renderer>>,
}

impl<H: Host> Compositor<H> {
    pub fn new(host: H, config: CompositorConfig) -> Self {
        tracing::info!("Creating compositor");
        Self {
            state: CompositorState::new(config),
            host,
            renderer: None,
        }
    }

    /// Use `renderer` for [`HostEvent::Frame`].
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn state(&self) -> &CompositorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CompositorState {
        &mut self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.timers.next_deadline()
    }

    /// Fire every timer due at `now`.
    pub fn advance(&mut self, now: Instant) {
        for (id, kind) in self.state.timers.take_expired(now) {
            match kind {
                TimerKind::OutputTestTimeout => {
                    let state = &mut self.state;
                    state.outputs.handle_test_timeout(id, &mut self.host, &mut state.timers);
                }
            }
        }
    }

    /// Handle one host event to completion.
    pub fn dispatch(&mut self, event: HostEvent) {
        tracing::trace!("Dispatching {:?}", event);
        let host = &mut self.host;
        let state = &mut self.state;

        match event {
            HostEvent::NewToplevel { surface } => {
                state.add_view(View::toplevel(surface));
            }
            HostEvent::NewLayerSurface { surface, output } => {
                state.add_layer_view(surface, output, host);
            }
            HostEvent::NewLegacySurface { surface } => {
                state.add_view(View::legacy(surface));
            }
            HostEvent::Commit { surface, state: commit } => {
                state.commit_surface(surface, &commit, host);
            }
            HostEvent::Map { surface } => {
                if let Err(err) = state.map_surface(surface, host) {
                    tracing::warn!("Map of {:?} failed: {}", surface, err);
                }
            }
            HostEvent::Unmap { surface } => {
                if let Err(err) = state.unmap_surface(surface, host) {
                    tracing::warn!("Unmap of {:?} failed: {}", surface, err);
                }
            }
            HostEvent::Destroy { surface } => {
                if let Err(err) = state.destroy_surface(surface) {
                    tracing::warn!("Destroy of {:?} failed: {}", surface, err);
                }
            }
            HostEvent::RequestMove { surface } => state.request_move(surface),
            HostEvent::RequestResize { surface, edges } => state.request_resize(surface, edges),

            HostEvent::PointerMotion { time_ms, dx, dy } => {
                state.pointer_motion(time_ms, dx, dy, host);
            }
            HostEvent::PointerMotionAbsolute { time_ms, x, y } => {
                state.pointer_motion_absolute(time_ms, x, y, host);
            }
            HostEvent::PointerButton { time_ms, button, state: button_state } => {
                state.pointer_button(time_ms, button, button_state, host);
            }
            HostEvent::PointerAxis { time_ms, axis } => host.pointer_axis(time_ms, &axis),
            HostEvent::PointerFrame => host.pointer_frame(),
            HostEvent::Key { time_ms, keycode, keysyms, state: key_state } => {
                state.keyboard_key(time_ms, keycode, &keysyms, key_state, host);
            }
            HostEvent::Modifiers { modifiers } => state.keyboard_modifiers(modifiers, host),

            HostEvent::OutputAdded { info } => {
                let name = info.name.clone();
                if let Err(err) = state.outputs.add_output(info, host) {
                    tracing::warn!("Ignoring output {}: {}", name, err);
                }
            }
            HostEvent::OutputRemoved { output } => {
                if let Err(err) = state.outputs.remove_output(output) {
                    tracing::warn!("Removing output failed: {}", err);
                }
            }
            HostEvent::OutputApply { request, config } => {
                if let Err(err) = state.outputs.apply_configuration(request, &config, host) {
                    tracing::warn!("Output configuration {:?} failed: {}", request, err);
                }
            }
            HostEvent::OutputTest { request, config } => {
                if let Err(err) =
                    state
                        .outputs
                        .test_configuration(request, &config, host, &mut state.timers)
                {
                    tracing::warn!("Output test {:?} failed: {}", request, err);
                }
            }
            HostEvent::OutputTestConfirm => {
                if let Err(err) = state.outputs.confirm_test(&mut state.timers) {
                    tracing::warn!("Confirm ignored: {}", err);
                }
            }
            HostEvent::OutputTestCancel => {
                if let Err(err) = state.outputs.cancel_test(host, &mut state.timers) {
                    tracing::warn!("Cancel ignored: {}", err);
                }
            }
            HostEvent::Frame { output } => match self.renderer.as_mut() {
                Some(renderer) => state.render_output(output, renderer.as_mut(), host, Instant::now()),
                None => tracing::debug!("Frame for {:?} with no renderer attached", output),
            },
        }
    }

    /// Draw one frame of `output` with a caller-supplied renderer.
    pub fn render_output(&mut self, output: OutputId, renderer: &mut dyn Renderer, now: Instant) {
        self.state.render_output(output, renderer, &mut self.host, now);
    }

    /// Drain everything the host should forward to clients.
    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        self.state.take_events()
    }
}
