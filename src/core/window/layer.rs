//! Layer surfaces: panels, backgrounds, lock screens and other shell chrome
//! that is positioned relative to an output rather than by the user.

use crate::core::output::Output;
use crate::core::window::view::{
    hit_test_box, RenderLayer, SurfaceCommit, ViewBase, ViewKind, ViewRole,
};
use crate::platform::api::{Host, OutputId, SubsurfaceInfo, SurfaceHit, SurfaceId};
use crate::util::geometry::{Edges, Rect};

/// The layer a client asked for. Layer surfaces can't be placed in the normal
/// window band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellLayer {
    #[default]
    Background,
    Bottom,
    Top,
    Overlay,
}

impl From<ShellLayer> for RenderLayer {
    fn from(layer: ShellLayer) -> Self {
        match layer {
            ShellLayer::Background => RenderLayer::Background,
            ShellLayer::Bottom => RenderLayer::Bottom,
            ShellLayer::Top => RenderLayer::Top,
            ShellLayer::Overlay => RenderLayer::Overlay,
        }
    }
}

/// State a layer client last committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCommit {
    pub layer: ShellLayer,
    pub anchor: Edges,
    /// `0` asks for the full extent of the output on that axis.
    pub desired_width: u32,
    pub desired_height: u32,
    pub keyboard_interactive: bool,
}

#[derive(Debug)]
pub struct Layer {
    base: ViewBase,
    committed: LayerCommit,
    output: Option<OutputId>,
}

impl Layer {
    /// A layer surface bound to `output`.
    pub fn new(surface: SurfaceId, output: Option<OutputId>) -> Self {
        Self {
            base: ViewBase::new(surface),
            committed: LayerCommit::default(),
            output,
        }
    }
}

/// Span of one axis: pinned to the anchored side(s), centred when neither
/// side is anchored.
fn place_axis(start_anchored: bool, end_anchored: bool, extent: i64, desired: i64) -> (i64, i64) {
    match (start_anchored, end_anchored) {
        (true, true) => (0, extent),
        (true, false) => (0, desired),
        (false, true) => (extent - desired, extent),
        (false, false) => (extent / 2 - desired / 2, extent / 2 + desired / 2),
    }
}

impl ViewRole for Layer {
    fn kind(&self) -> ViewKind {
        ViewKind::Layer
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
        host.configure_layer(self.base.surface, rect.width() as u32, rect.height() as u32);
    }

    fn surface_at(&self, x: f64, y: f64, host: &dyn Host) -> Option<SurfaceHit> {
        hit_test_box(self.base.edges, self.base.surface, x, y, host)
    }

    fn is_visible_on(&self, output: &Output) -> bool {
        self.output == Some(output.id)
    }

    fn arrange(&mut self, output: &Output, host: &mut dyn Host) {
        let state = self.committed;
        self.base.render_layer = state.layer.into();

        let (width, height) = output.effective_resolution();
        let (width, height) = (width as i64, height as i64);
        let desired_width = match state.desired_width {
            0 => width,
            w => w as i64,
        };
        let desired_height = match state.desired_height {
            0 => height,
            h => h as i64,
        };

        let (left, right) = place_axis(
            state.anchor.contains(Edges::LEFT),
            state.anchor.contains(Edges::RIGHT),
            width,
            desired_width,
        );
        let (top, bottom) = place_axis(
            state.anchor.contains(Edges::TOP),
            state.anchor.contains(Edges::BOTTOM),
            height,
            desired_height,
        );

        let (ox, oy) = output.position.unwrap_or((0, 0));
        let rect = Rect::new(top as f64, right as f64, bottom as f64, left as f64)
            .translate(ox as f64, oy as f64);
        self.set_position(rect, host);
    }

    fn output(&self) -> Option<OutputId> {
        self.output
    }

    fn wants_focus_on_map(&self) -> bool {
        self.committed.keyboard_interactive
    }

    fn for_each_surface(&self, host: &dyn Host, f: &mut dyn FnMut(&SubsurfaceInfo)) {
        for info in host.surface_tree(self.base.surface) {
            f(&info);
        }
    }

    fn apply_commit(&mut self, commit: &SurfaceCommit) -> bool {
        match commit {
            SurfaceCommit::Layer(state) => {
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
    use crate::core::output::{Mode, ModeSetting, OutputInfo};
    use crate::platform::headless::{HeadlessHost, HostRequest};

    fn output_at(x: i32) -> Output {
        let mut output = Output::new(OutputInfo {
            id: OutputId(1),
            name: "OUT-1".into(),
            description: String::new(),
            modes: vec![],
        });
        output.current_mode = Some(ModeSetting::Preset(Mode::new(1920, 1080, 60_000)));
        output.enabled = true;
        output.position = Some((x, 0));
        output
    }

    fn arranged(commit: LayerCommit, output: &Output) -> (Layer, HeadlessHost) {
        let mut host = HeadlessHost::new();
        let mut layer = Layer::new(SurfaceId(9), Some(output.id));
        layer.apply_commit(&SurfaceCommit::Layer(commit));
        layer.arrange(output, &mut host);
        (layer, host)
    }

    #[test]
    fn test_top_panel_stretches_horizontally() {
        let commit = LayerCommit {
            layer: ShellLayer::Top,
            anchor: Edges::TOP | Edges::LEFT | Edges::RIGHT,
            desired_height: 30,
            ..Default::default()
        };
        let (layer, host) = arranged(commit, &output_at(0));
        assert_eq!(layer.base().edges, Rect::new(0.0, 1920.0, 30.0, 0.0));
        assert_eq!(layer.base().render_layer, RenderLayer::Top);
        assert_eq!(
            host.requests,
            vec![HostRequest::ConfigureLayer { surface: SurfaceId(9), width: 1920, height: 30 }]
        );
    }

    #[test]
    fn test_unanchored_is_centred_on_output() {
        let commit = LayerCommit {
            layer: ShellLayer::Overlay,
            desired_width: 400,
            desired_height: 200,
            ..Default::default()
        };
        let (layer, _) = arranged(commit, &output_at(1920));
        assert_eq!(layer.base().edges, Rect::new(440.0, 3080.0, 640.0, 2680.0));
    }

    #[test]
    fn test_zero_size_means_full_output() {
        let (layer, _) = arranged(LayerCommit::default(), &output_at(0));
        assert_eq!(layer.base().edges, Rect::new(0.0, 1920.0, 1080.0, 0.0));
        assert_eq!(layer.base().render_layer, RenderLayer::Background);
    }

    #[test]
    fn test_bottom_right_anchor() {
        let commit = LayerCommit {
            anchor: Edges::BOTTOM | Edges::RIGHT,
            desired_width: 100,
            desired_height: 50,
            ..Default::default()
        };
        let (layer, _) = arranged(commit, &output_at(0));
        assert_eq!(layer.base().edges, Rect::new(1030.0, 1920.0, 1080.0, 1820.0));
    }

    #[test]
    fn test_visible_only_on_bound_output() {
        let output = output_at(0);
        let layer = Layer::new(SurfaceId(9), Some(OutputId(2)));
        assert!(!layer.is_visible_on(&output));
        let layer = Layer::new(SurfaceId(9), Some(OutputId(1)));
        assert!(layer.is_visible_on(&output));
    }
}
