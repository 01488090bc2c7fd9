use std::time::Instant;

use super::*;
use crate::core::output::{ConfigRequestId, HeadState, Mode, ModeSetting, OutputConfiguration};
use crate::core::window::layer::{LayerCommit, ShellLayer};
use crate::platform::api::SubsurfaceInfo;
use crate::platform::headless::HeadlessRenderer;
use crate::util::geometry::Transform;

fn map_layer(state: &mut CompositorState, host: &mut HeadlessHost, surface: u32, layer: ShellLayer) {
    let surface = SurfaceId(surface);
    state.add_layer_view(surface, None, host);
    let commit = SurfaceCommit::Layer(LayerCommit { layer, ..Default::default() });
    state.commit_surface(surface, &commit, host);
    state.map_surface(surface, host).unwrap();
}

fn render(state: &mut CompositorState, host: &mut HeadlessHost, output: u32) -> HeadlessRenderer {
    let mut renderer = HeadlessRenderer::new();
    state.render_output(OutputId(output), &mut renderer, host, Instant::now());
    renderer
}

fn drawn(renderer: &HeadlessRenderer) -> Vec<SurfaceId> {
    renderer.draws.iter().map(|draw| draw.surface).collect()
}

#[test]
fn test_frame_clears_to_background() {
    let (mut state, mut host) = setup();
    let renderer = render(&mut state, &mut host, 1);
    assert_eq!(renderer.frames, 1);
    assert_eq!(renderer.clear_color, Some(state.config.background));
    assert!(renderer.draws.is_empty());
}

#[test]
fn test_layers_draw_in_band_order() {
    let (mut state, mut host) = setup();
    map_layer(&mut state, &mut host, 10, ShellLayer::Overlay);
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(10.0, 20.0, 100.0, 100.0));
    let _b = map_toplevel(&mut state, &mut host, 2, Rect::from_xywh(40.0, 40.0, 100.0, 100.0));
    map_layer(&mut state, &mut host, 11, ShellLayer::Background);

    let renderer = render(&mut state, &mut host, 1);
    assert_eq!(
        drawn(&renderer),
        vec![SurfaceId(11), SurfaceId(1), SurfaceId(2), SurfaceId(10)]
    );
    assert_eq!(renderer.draws[1].target, IRect::new(10, 20, 100, 100));
    assert_eq!(renderer.draws[0].target, IRect::new(0, 0, 1920, 1080));
    assert_eq!(renderer.frame_done, drawn(&renderer));
}

#[test]
fn test_raise_changes_draw_order() {
    let (mut state, mut host) = setup();
    let a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let _b = map_toplevel(&mut state, &mut host, 2, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    state.focus_view(Some(a), true, &mut host);

    let renderer = render(&mut state, &mut host, 1);
    assert_eq!(drawn(&renderer), vec![SurfaceId(2), SurfaceId(1)]);
}

#[test]
fn test_unmapped_and_offscreen_views_are_skipped() {
    let (mut state, mut host) = setup();
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let _b = map_toplevel(&mut state, &mut host, 2, Rect::from_xywh(3000.0, 0.0, 100.0, 100.0));
    let _c = map_toplevel(&mut state, &mut host, 3, Rect::from_xywh(50.0, 50.0, 100.0, 100.0));
    state.unmap_surface(SurfaceId(3), &mut host).unwrap();

    let renderer = render(&mut state, &mut host, 1);
    assert_eq!(drawn(&renderer), vec![SurfaceId(1)]);
}

#[test]
fn test_subsurfaces_follow_their_parent() {
    let (mut state, mut host) = setup();
    host.add_subsurface(
        SurfaceId(1),
        SubsurfaceInfo {
            surface: SurfaceId(5),
            offset_x: 8,
            offset_y: 4,
            width: 20,
            height: 10,
            transform: Transform::Rotated90,
        },
    );
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(100.0, 200.0, 300.0, 150.0));

    let renderer = render(&mut state, &mut host, 1);
    assert_eq!(drawn(&renderer), vec![SurfaceId(1), SurfaceId(5)]);
    assert_eq!(renderer.draws[1].target, IRect::new(108, 204, 20, 10));
    assert_eq!(renderer.draws[1].surface_transform, Transform::Rotated270);
    assert_eq!(renderer.frame_done, vec![SurfaceId(1), SurfaceId(5)]);
}

#[test]
fn test_scaled_output_draws_in_pixels() {
    let (mut state, mut host) = setup();
    let head = HeadState {
        scale: 2.0,
        ..HeadState::enabled(OutputId(1), ModeSetting::Preset(Mode::new(1920, 1080, 60_000)), 0, 0)
    };
    state
        .outputs
        .apply_configuration(ConfigRequestId(1), &OutputConfiguration::new(vec![head]), &mut host)
        .unwrap();
    map_layer(&mut state, &mut host, 10, ShellLayer::Background);
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(10.0, 20.0, 100.0, 50.0));

    let renderer = render(&mut state, &mut host, 1);
    // The background covers the 960x540 layout box, which is the whole panel.
    assert_eq!(renderer.draws[0].target, IRect::new(0, 0, 1920, 1080));
    assert_eq!(renderer.draws[1].target, IRect::new(20, 40, 200, 100));
}

#[test]
fn test_second_output_draws_relative_to_its_origin() {
    let (mut state, mut host) = setup();
    state.outputs.add_output(output_info(2, 1280, 1024), &mut host).unwrap();
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(1900.0, 10.0, 100.0, 100.0));

    let first = render(&mut state, &mut host, 1);
    let second = render(&mut state, &mut host, 2);
    assert_eq!(first.draws[0].target, IRect::new(1900, 10, 100, 100));
    assert_eq!(second.draws[0].target, IRect::new(-20, 10, 100, 100));
}

#[test]
fn test_unavailable_output_draws_nothing() {
    let (mut state, mut host) = setup();
    let _a = map_toplevel(&mut state, &mut host, 1, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let mut renderer = HeadlessRenderer::new();
    renderer.unavailable.insert(OutputId(1));
    state.render_output(OutputId(1), &mut renderer, &mut host, Instant::now());

    assert_eq!(renderer.frames, 0);
    assert!(renderer.draws.is_empty());
    assert!(renderer.frame_done.is_empty());
}
