//! Outputs, their layout, and staged output configuration.
//!
//! `OutputManager` owns every output the host announced. Its methods are
//! split the same way `CompositorState`'s are:
//! - `layout.rs`: output lifecycle and automatic placement
//! - `management.rs`: apply/test configuration requests and rollback

mod layout;
mod management;

pub use management::OutputConfigTransaction;

use crate::core::compositor::CompositorEvent;
use crate::platform::api::OutputId;
use crate::util::geometry::{IRect, Transform};

/// Seconds a tested configuration stays live before it is reverted.
pub const TEST_TIMEOUT_SECS: u64 = 15;

/// A display mode as advertised by the device. `refresh` is in mHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub width: i32,
    pub height: i32,
    pub refresh: i32,
    pub preferred: bool,
}

impl Mode {
    pub fn new(width: i32, height: i32, refresh: i32) -> Self {
        Self { width, height, refresh, preferred: false }
    }

    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }
}

/// The mode requested for a head: one of the advertised modes, or an
/// arbitrary resolution and refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSetting {
    Preset(Mode),
    Custom { width: i32, height: i32, refresh: i32 },
}

impl ModeSetting {
    pub fn size(&self) -> (i32, i32) {
        match *self {
            ModeSetting::Preset(mode) => (mode.width, mode.height),
            ModeSetting::Custom { width, height, .. } => (width, height),
        }
    }
}

/// Desired state of one output in a configuration request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadState {
    pub output: OutputId,
    pub enabled: bool,
    pub mode: Option<ModeSetting>,
    pub x: i32,
    pub y: i32,
    pub scale: f32,
    pub transform: Transform,
}

impl HeadState {
    /// An enabled head at the given position with the given mode, unscaled.
    pub fn enabled(output: OutputId, mode: ModeSetting, x: i32, y: i32) -> Self {
        Self {
            output,
            enabled: true,
            mode: Some(mode),
            x,
            y,
            scale: 1.0,
            transform: Transform::Normal,
        }
    }

    pub fn disabled(output: OutputId) -> Self {
        Self {
            output,
            enabled: false,
            mode: None,
            x: 0,
            y: 0,
            scale: 1.0,
            transform: Transform::Normal,
        }
    }
}

/// A full or partial set of head states.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputConfiguration {
    pub heads: Vec<HeadState>,
}

impl OutputConfiguration {
    pub fn new(heads: Vec<HeadState>) -> Self {
        Self { heads }
    }

    pub fn head(&self, output: OutputId) -> Option<&HeadState> {
        self.heads.iter().find(|head| head.output == output)
    }
}

/// Identifies the client request a configuration result is reported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigRequestId(pub u32);

/// What the host reports about a newly connected output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputInfo {
    pub id: OutputId,
    pub name: String,
    pub description: String,
    pub modes: Vec<Mode>,
}

/// An output known to the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub id: OutputId,
    pub name: String,
    pub description: String,
    pub modes: Vec<Mode>,
    pub current_mode: Option<ModeSetting>,
    pub enabled: bool,
    pub scale: f32,
    pub transform: Transform,
    /// Top-left corner in layout coordinates; `None` when not in the layout.
    pub position: Option<(i32, i32)>,
}

impl Output {
    pub fn new(info: OutputInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            description: info.description,
            modes: info.modes,
            current_mode: None,
            enabled: false,
            scale: 1.0,
            transform: Transform::Normal,
            position: None,
        }
    }

    /// The preferred mode, falling back to the first advertised one.
    pub fn preferred_mode(&self) -> Option<Mode> {
        self.modes
            .iter()
            .find(|mode| mode.preferred)
            .or_else(|| self.modes.first())
            .copied()
    }

    /// Pixel size of the current mode, `(0, 0)` without one.
    pub fn resolution(&self) -> (i32, i32) {
        self.current_mode.map(|mode| mode.size()).unwrap_or((0, 0))
    }

    /// Size in layout units: transformed, then divided by the scale.
    pub fn effective_resolution(&self) -> (i32, i32) {
        let (mut width, mut height) = self.resolution();
        if self.transform.swaps_axes() {
            std::mem::swap(&mut width, &mut height);
        }
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        (
            (width as f32 / scale).round() as i32,
            (height as f32 / scale).round() as i32,
        )
    }

    /// The box this output covers in the layout.
    pub fn layout_box(&self) -> Option<IRect> {
        let (x, y) = self.position?;
        let (width, height) = self.effective_resolution();
        Some(IRect::new(x, y, width, height))
    }

    /// The output's current state as a head, for snapshots.
    pub fn head_state(&self) -> HeadState {
        let (x, y) = self.position.unwrap_or((0, 0));
        HeadState {
            output: self.id,
            enabled: self.enabled,
            mode: self.current_mode,
            x,
            y,
            scale: self.scale,
            transform: self.transform,
        }
    }
}

/// All outputs, their layout, and the output-configuration transaction.
#[derive(Debug)]
pub struct OutputManager {
    /// Outputs in the order they were announced.
    pub outputs: Vec<Output>,
    /// Set while a configuration is being written to the devices; layout
    /// change notifications are held back while it is set.
    pub applying: bool,
    /// The live test configuration, if any.
    pub pending_test: Option<OutputConfigTransaction>,
    /// Results and notifications for clients, drained by the compositor.
    pub events: Vec<CompositorEvent>,
    test_timeout: std::time::Duration,
}

impl OutputManager {
    pub fn new(test_timeout: std::time::Duration) -> Self {
        Self {
            outputs: Vec::new(),
            applying: false,
            pending_test: None,
            events: Vec::new(),
            test_timeout,
        }
    }

    /// Find an output; with `None`, the first one.
    pub fn find(&self, id: Option<OutputId>) -> Option<&Output> {
        match id {
            Some(id) => self.outputs.iter().find(|output| output.id == id),
            None => self.outputs.first(),
        }
    }

    pub fn find_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|output| output.id == id)
    }

    /// Snapshot of every output's current state.
    pub fn current_configuration(&self) -> OutputConfiguration {
        OutputConfiguration::new(self.outputs.iter().map(Output::head_state).collect())
    }

    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(std::time::Duration::from_secs(TEST_TIMEOUT_SECS))
    }
}
