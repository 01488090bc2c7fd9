//! Headless host.
//!
//! Records every request the core makes instead of acting on it. The binary
//! runs on it when no display backend is attached, and the tests use it to
//! observe what the core asked for.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::core::input::{AxisEvent, ButtonState, KeyState, Modifiers};
use crate::core::output::{HeadState, Output};
use crate::platform::api::{Host, OutputId, Renderer, SubsurfaceInfo, SurfaceHit, SurfaceId};
use crate::util::geometry::{IRect, Transform};

/// A request the core made to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    KeyboardEnter { surface: SurfaceId },
    KeyboardClearFocus,
    KeyboardKey { keycode: u32, state: KeyState },
    KeyboardModifiers { modifiers: Modifiers },
    PointerEnter { surface: SurfaceId, sx: f64, sy: f64 },
    PointerClearFocus,
    PointerMotion { sx: f64, sy: f64 },
    PointerButton { button: u32, state: ButtonState },
    PointerAxis { axis: AxisEvent },
    PointerFrame,
    SetCursorImage { name: String },
    ConfigureToplevel { surface: SurfaceId, width: i32, height: i32 },
    SetToplevelActivated { surface: SurfaceId, activated: bool },
    ConfigureLayer { surface: SurfaceId, width: u32, height: u32 },
    ConfigureLegacy { surface: SurfaceId, x: i32, y: i32, width: i32, height: i32 },
    ActivateLegacy { surface: SurfaceId, activated: bool },
    CommitOutput { output: OutputId, head: HeadState },
    Terminate,
}

/// A host that accepts everything unless told otherwise.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub requests: Vec<HostRequest>,
    /// Outputs whose heads fail validation
    pub rejected_outputs: HashSet<OutputId>,
    /// Outputs whose commits fail
    pub failing_commits: HashSet<OutputId>,
    /// Sub-surfaces per root surface
    pub subsurfaces: HashMap<SurfaceId, Vec<SubsurfaceInfo>>,
    pub terminated: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_output(&mut self, output: OutputId) {
        self.rejected_outputs.insert(output);
    }

    pub fn fail_commits_for(&mut self, output: OutputId) {
        self.failing_commits.insert(output);
    }

    pub fn add_subsurface(&mut self, root: SurfaceId, info: SubsurfaceInfo) {
        self.subsurfaces.entry(root).or_default().push(info);
    }

    /// Drain recorded requests.
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    fn record(&mut self, request: HostRequest) {
        tracing::trace!("Host request: {:?}", request);
        self.requests.push(request);
    }
}

impl Host for HeadlessHost {
    fn keyboard_enter(&mut self, surface: SurfaceId) {
        self.record(HostRequest::KeyboardEnter { surface });
    }

    fn keyboard_clear_focus(&mut self) {
        self.record(HostRequest::KeyboardClearFocus);
    }

    fn keyboard_key(&mut self, _time_ms: u32, keycode: u32, state: KeyState) {
        self.record(HostRequest::KeyboardKey { keycode, state });
    }

    fn keyboard_modifiers(&mut self, modifiers: Modifiers) {
        self.record(HostRequest::KeyboardModifiers { modifiers });
    }

    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64) {
        self.record(HostRequest::PointerEnter { surface, sx, sy });
    }

    fn pointer_clear_focus(&mut self) {
        self.record(HostRequest::PointerClearFocus);
    }

    fn pointer_motion(&mut self, _time_ms: u32, sx: f64, sy: f64) {
        self.record(HostRequest::PointerMotion { sx, sy });
    }

    fn pointer_button(&mut self, _time_ms: u32, button: u32, state: ButtonState) {
        self.record(HostRequest::PointerButton { button, state });
    }

    fn pointer_axis(&mut self, _time_ms: u32, axis: &AxisEvent) {
        self.record(HostRequest::PointerAxis { axis: *axis });
    }

    fn pointer_frame(&mut self) {
        self.record(HostRequest::PointerFrame);
    }

    fn set_cursor_image(&mut self, name: &str) {
        self.record(HostRequest::SetCursorImage { name: name.to_string() });
    }

    fn configure_toplevel(&mut self, surface: SurfaceId, width: i32, height: i32) {
        self.record(HostRequest::ConfigureToplevel { surface, width, height });
    }

    fn set_toplevel_activated(&mut self, surface: SurfaceId, activated: bool) {
        self.record(HostRequest::SetToplevelActivated { surface, activated });
    }

    fn configure_layer(&mut self, surface: SurfaceId, width: u32, height: u32) {
        self.record(HostRequest::ConfigureLayer { surface, width, height });
    }

    fn configure_legacy(&mut self, surface: SurfaceId, x: i32, y: i32, width: i32, height: i32) {
        self.record(HostRequest::ConfigureLegacy { surface, x, y, width, height });
    }

    fn activate_legacy(&mut self, surface: SurfaceId, activated: bool) {
        self.record(HostRequest::ActivateLegacy { surface, activated });
    }

    fn surface_at(&self, root: SurfaceId, sx: f64, sy: f64) -> Option<SurfaceHit> {
        let inside = |info: &&SubsurfaceInfo| {
            let b = IRect::new(info.offset_x, info.offset_y, info.width, info.height).to_rect();
            b.contains(sx, sy)
        };
        // Sub-surfaces sit above their parent; the last one is topmost.
        match self.subsurfaces.get(&root).and_then(|subs| subs.iter().rev().find(inside)) {
            Some(info) => Some(SurfaceHit {
                surface: info.surface,
                sx: sx - info.offset_x as f64,
                sy: sy - info.offset_y as f64,
            }),
            None => Some(SurfaceHit { surface: root, sx, sy }),
        }
    }

    fn surface_tree(&self, root: SurfaceId) -> Vec<SubsurfaceInfo> {
        let mut tree = vec![SubsurfaceInfo::root(root)];
        if let Some(subs) = self.subsurfaces.get(&root) {
            tree.extend(subs.iter().copied());
        }
        tree
    }

    fn test_output(&self, _output: &Output, head: &HeadState) -> bool {
        !self.rejected_outputs.contains(&head.output)
    }

    fn commit_output(&mut self, output: &Output, head: &HeadState) -> bool {
        if self.failing_commits.contains(&output.id) {
            return false;
        }
        self.record(HostRequest::CommitOutput { output: output.id, head: *head });
        true
    }

    fn terminate(&mut self) {
        self.terminated = true;
        self.record(HostRequest::Terminate);
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub surface: SurfaceId,
    pub target: IRect,
    pub surface_transform: Transform,
    pub output_transform: Transform,
}

/// A renderer that records frames instead of drawing them.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: usize,
    pub clear_color: Option<[f32; 4]>,
    pub draws: Vec<DrawCall>,
    pub frame_done: Vec<SurfaceId>,
    /// Outputs that refuse to start a frame
    pub unavailable: HashSet<OutputId>,
    in_frame: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for HeadlessRenderer {
    fn begin(&mut self, output: OutputId, _width: i32, _height: i32) -> bool {
        if self.unavailable.contains(&output) {
            return false;
        }
        self.in_frame = true;
        true
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = Some(color);
    }

    fn draw_surface(
        &mut self,
        surface: SurfaceId,
        target: IRect,
        surface_transform: Transform,
        output_transform: Transform,
    ) {
        debug_assert!(self.in_frame, "draw outside of a frame");
        self.draws.push(DrawCall { surface, target, surface_transform, output_transform });
    }

    fn send_frame_done(&mut self, surface: SurfaceId, _when: Instant) {
        self.frame_done.push(surface);
    }

    fn end(&mut self) {
        self.in_frame = false;
        self.frames += 1;
    }
}
