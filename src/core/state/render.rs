//! Frame composition.

use std::time::Instant;

use super::*;
use crate::core::output::Output;
use crate::core::window::{Order, RenderLayer, View, ViewKind};
use crate::platform::api::{Host, OutputId, Renderer, SubsurfaceInfo};
use crate::util::geometry::IRect;

impl CompositorState {
    /// Draw one frame of `output`: background first, then every visible view
    /// band by band from Background to Overlay, back to front within a band.
    pub fn render_output(
        &mut self,
        output: OutputId,
        renderer: &mut dyn Renderer,
        host: &mut dyn Host,
        now: Instant,
    ) {
        let Some(output) = self.outputs.find(Some(output)).filter(|o| o.enabled).cloned() else {
            tracing::trace!("Skipping frame for disabled or unknown {:?}", output);
            return;
        };
        let (width, height) = output.resolution();
        if !renderer.begin(output.id, width, height) {
            return;
        }
        renderer.clear(self.config.background);

        // Layer surfaces follow their output's current size and position.
        for id in self.views.ids(Order::Draw) {
            if let Some(view) = self.views.get_mut(id) {
                if view.kind() == ViewKind::Layer && view.output() == Some(output.id) {
                    view.arrange(&output, host);
                }
            }
        }

        let back_to_front = self.views.ids_back_to_front(Order::Draw);
        for layer in RenderLayer::ALL {
            for id in &back_to_front {
                let Some(view) = self.views.get(*id) else {
                    continue;
                };
                if view.render_layer() == layer && view.is_mapped() && view.is_visible_on(&output) {
                    render_view(view, &output, renderer, &*host, now);
                }
            }
        }

        renderer.end();
    }
}

/// Draw every surface of a view's tree at its place on `output`.
fn render_view(view: &View, output: &Output, renderer: &mut dyn Renderer, host: &dyn Host, now: Instant) {
    let (Some(position), Some(root)) = (view.position(), view.surface()) else {
        return;
    };
    let (ox, oy) = output.position.unwrap_or((0, 0));
    let scale = output.scale as f64;

    let mut surfaces: Vec<SubsurfaceInfo> = Vec::new();
    view.for_each_surface(host, &mut |info| surfaces.push(*info));

    for info in surfaces {
        let (width, height) = if info.surface == root {
            (position.width(), position.height())
        } else {
            (info.width as f64, info.height as f64)
        };
        let x = position.left - ox as f64 + info.offset_x as f64;
        let y = position.top - oy as f64 + info.offset_y as f64;
        let target = IRect::new(
            (x * scale).round() as i32,
            (y * scale).round() as i32,
            (width * scale).round() as i32,
            (height * scale).round() as i32,
        );

        renderer.draw_surface(info.surface, target, info.transform.invert(), output.transform);
        renderer.send_frame_done(info.surface, now);
    }
}
