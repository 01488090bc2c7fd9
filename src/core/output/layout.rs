//! Output lifecycle and layout placement.

use super::*;
use crate::core::errors::{CoreError, Result};
use crate::platform::api::Host;
use crate::util::logging::OUTPUT;

impl OutputManager {
    /// Take over a newly connected output.
    ///
    /// When the device advertises modes, the preferred one is enabled and
    /// committed first; an output whose commit fails is not added. The output
    /// is then placed to the right of the existing ones.
    pub fn add_output(&mut self, info: OutputInfo, host: &mut dyn Host) -> Result<()> {
        if self.find(Some(info.id)).is_some() {
            tracing::warn!("Output {:?} announced twice, ignoring", info.id);
            return Ok(());
        }

        let mut output = Output::new(info);

        if let Some(mode) = output.preferred_mode() {
            let head = HeadState::enabled(output.id, ModeSetting::Preset(mode), 0, 0);
            if !host.commit_output(&output, &head) {
                tracing::warn!(
                    "Output {} refused its preferred mode {}x{}, not adding it",
                    output.name, mode.width, mode.height
                );
                return Err(CoreError::OutputCommitFailed(output.id));
            }
            output.current_mode = Some(ModeSetting::Preset(mode));
        }
        output.enabled = true;

        crate::wlog!(OUTPUT, "Added output {} ({})", output.name, output.description);
        let id = output.id;
        self.outputs.push(output);
        self.layout_add_auto(id);
        Ok(())
    }

    /// Forget an output that was disconnected.
    pub fn remove_output(&mut self, id: OutputId) -> Result<()> {
        let index = self
            .outputs
            .iter()
            .position(|output| output.id == id)
            .ok_or(CoreError::UnknownOutput(id))?;
        let output = self.outputs.remove(index);
        crate::wlog!(OUTPUT, "Removed output {}", output.name);

        if output.position.is_some() {
            self.layout_changed();
        }
        Ok(())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Place an output to the right of everything already in the layout.
    pub(crate) fn layout_add_auto(&mut self, id: OutputId) {
        let x = self
            .outputs
            .iter()
            .filter(|output| output.id != id)
            .filter_map(Output::layout_box)
            .map(|b| b.x + b.width)
            .max()
            .unwrap_or(0);

        if let Some(output) = self.find_mut(id) {
            output.position = Some((x, 0));
            tracing::debug!("Placed output {} at ({}, 0)", output.name, x);
        }
        self.layout_changed();
    }

    pub(crate) fn layout_remove(&mut self, id: OutputId) {
        if let Some(output) = self.find_mut(id) {
            output.position = None;
        }
        self.layout_changed();
    }

    pub(crate) fn layout_move(&mut self, id: OutputId, x: i32, y: i32) {
        if let Some(output) = self.find_mut(id) {
            if output.position == Some((x, y)) {
                return;
            }
            output.position = Some((x, y));
        }
        self.layout_changed();
    }

    /// Publish the new configuration to listeners, unless we are in the middle
    /// of writing one ourselves.
    pub(crate) fn layout_changed(&mut self) {
        if self.applying {
            tracing::trace!("Layout change notification held back while applying");
            return;
        }
        let configuration = self.current_configuration();
        self.events
            .push(CompositorEvent::OutputConfigurationChanged { configuration });
    }

    /// Union of the boxes of every enabled output in the layout.
    pub fn layout_extents(&self) -> Option<IRect> {
        self.outputs
            .iter()
            .filter(|output| output.enabled)
            .filter_map(Output::layout_box)
            .fold(None, |acc: Option<IRect>, b| {
                Some(acc.map_or(b, |acc| acc.union(&b)))
            })
    }

    /// The point on an enabled output closest to `(x, y)`; the point itself
    /// when an output covers it. Gaps between outputs of different sizes are
    /// never returned.
    pub fn closest_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.outputs
            .iter()
            .filter(|output| output.enabled)
            .filter_map(Output::layout_box)
            .filter(|b| !b.is_empty())
            .map(|b| {
                let right = (b.x + b.width) as f64 - 1.0;
                let bottom = (b.y + b.height) as f64 - 1.0;
                (x.clamp(b.x as f64, right), y.clamp(b.y as f64, bottom))
            })
            .min_by(|a, b| {
                let da = (a.0 - x).powi(2) + (a.1 - y).powi(2);
                let db = (b.0 - x).powi(2) + (b.1 - y).powi(2);
                da.total_cmp(&db)
            })
    }

    /// The enabled output whose box contains a layout point.
    pub fn output_at(&self, x: f64, y: f64) -> Option<&Output> {
        self.outputs
            .iter()
            .filter(|output| output.enabled)
            .find(|output| {
                output
                    .layout_box()
                    .map_or(false, |b| b.to_rect().contains(x, y))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessHost;

    fn info(id: u32, width: i32, height: i32) -> OutputInfo {
        OutputInfo {
            id: OutputId(id),
            name: format!("OUT-{}", id),
            description: "test output".to_string(),
            modes: vec![Mode::new(width, height, 60_000).preferred()],
        }
    }

    #[test]
    fn test_outputs_are_placed_left_to_right() {
        let mut host = HeadlessHost::new();
        let mut outputs = OutputManager::default();
        outputs.add_output(info(1, 1920, 1080), &mut host).unwrap();
        outputs.add_output(info(2, 1280, 1024), &mut host).unwrap();

        assert_eq!(outputs.find(Some(OutputId(1))).unwrap().position, Some((0, 0)));
        assert_eq!(outputs.find(Some(OutputId(2))).unwrap().position, Some((1920, 0)));
        assert_eq!(outputs.layout_extents(), Some(IRect::new(0, 0, 3200, 1080)));
        assert_eq!(outputs.output_at(2000.0, 10.0).map(|o| o.id), Some(OutputId(2)));
    }

    #[test]
    fn test_closest_point_avoids_gaps_between_outputs() {
        let mut host = HeadlessHost::new();
        let mut outputs = OutputManager::default();
        assert_eq!(outputs.closest_point(5.0, 5.0), None);
        outputs.add_output(info(1, 1920, 1080), &mut host).unwrap();
        outputs.add_output(info(2, 1280, 1024), &mut host).unwrap();

        assert_eq!(outputs.closest_point(100.0, 1050.0), Some((100.0, 1050.0)));
        // Below the shorter output, inside the bounding box of both.
        assert_eq!(outputs.closest_point(2000.0, 1050.0), Some((2000.0, 1023.0)));
        assert_eq!(outputs.closest_point(5000.0, 2000.0), Some((3199.0, 1023.0)));
        assert_eq!(outputs.closest_point(-10.0, -10.0), Some((0.0, 0.0)));
    }

    #[test]
    fn test_find_none_returns_first_output() {
        let mut host = HeadlessHost::new();
        let mut outputs = OutputManager::default();
        assert!(outputs.find(None).is_none());
        outputs.add_output(info(7, 800, 600), &mut host).unwrap();
        outputs.add_output(info(8, 800, 600), &mut host).unwrap();
        assert_eq!(outputs.find(None).map(|o| o.id), Some(OutputId(7)));
    }

    #[test]
    fn test_output_refusing_preferred_mode_is_ignored() {
        let mut host = HeadlessHost::new();
        host.fail_commits_for(OutputId(3));
        let mut outputs = OutputManager::default();
        assert!(outputs.add_output(info(3, 800, 600), &mut host).is_err());
        assert!(outputs.outputs.is_empty());
    }

    #[test]
    fn test_layout_changes_are_published() {
        let mut host = HeadlessHost::new();
        let mut outputs = OutputManager::default();
        outputs.add_output(info(1, 800, 600), &mut host).unwrap();
        let events = outputs.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CompositorEvent::OutputConfigurationChanged { .. }));

        outputs.remove_output(OutputId(1)).unwrap();
        assert_eq!(outputs.take_events().len(), 1);
        assert!(outputs.remove_output(OutputId(1)).is_err());
    }

    #[test]
    fn test_effective_resolution_applies_transform_and_scale() {
        let mut output = Output::new(info(1, 3840, 2160));
        output.current_mode = Some(ModeSetting::Preset(Mode::new(3840, 2160, 60_000)));
        output.scale = 2.0;
        assert_eq!(output.effective_resolution(), (1920, 1080));
        output.transform = Transform::Rotated90;
        assert_eq!(output.effective_resolution(), (1080, 1920));
    }
}
