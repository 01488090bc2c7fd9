//! Scenario tests driving `CompositorState` through the headless host.

mod render;

use crate::core::output::{Mode, OutputInfo};
use crate::core::state::CompositorState;
use crate::core::window::toplevel::ToplevelCommit;
use crate::core::window::{SurfaceCommit, View, ViewId};
use crate::platform::api::{OutputId, SurfaceId};
use crate::platform::headless::HeadlessHost;
use crate::util::geometry::{IRect, Rect};

fn output_info(id: u32, width: i32, height: i32) -> OutputInfo {
    OutputInfo {
        id: OutputId(id),
        name: format!("OUT-{}", id),
        description: "scenario output".to_string(),
        modes: vec![Mode::new(width, height, 60_000).preferred()],
    }
}

/// State with a single 1920x1080 output at the origin.
fn setup() -> (CompositorState, HeadlessHost) {
    let mut state = CompositorState::default();
    let mut host = HeadlessHost::new();
    state.outputs.add_output(output_info(1, 1920, 1080), &mut host).unwrap();
    state.take_events();
    host.take_requests();
    (state, host)
}

/// Create, size, place and map a toplevel.
fn map_toplevel(state: &mut CompositorState, host: &mut HeadlessHost, surface: u32, rect: Rect) -> ViewId {
    let surface = SurfaceId(surface);
    let id = state.add_view(View::toplevel(surface));
    let commit = SurfaceCommit::Toplevel(ToplevelCommit {
        geometry: IRect::new(0, 0, rect.width() as i32, rect.height() as i32),
        ..Default::default()
    });
    state.commit_surface(surface, &commit, host);
    state.views.get_mut(id).unwrap().set_position(rect, host);
    state.map_surface(surface, host).unwrap();
    id
}
