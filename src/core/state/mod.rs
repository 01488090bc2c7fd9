//! Global compositor state.
//!
//! This module contains the `CompositorState` struct which holds all the
//! window-management state of the compositor, separate from the host runtime
//! that talks to clients and hardware.
//!
//! Methods are split across submodules:
//! - `views.rs`: view lifecycle, focus, grabs started by clients
//! - `input.rs`: pointer and keyboard handling
//! - `render.rs`: frame composition

use crate::core::compositor::{CompositorConfig, CompositorEvent};
use crate::core::output::OutputManager;
use crate::core::runtime::TimerQueue;
use crate::core::window::{GrabSession, SeatState, ViewTree};

// Sub-modules containing extracted CompositorState impl blocks
mod input;
mod render;
mod views;

/// Everything the compositor knows, passed explicitly to every handler.
#[derive(Debug)]
pub struct CompositorState {
    pub config: CompositorConfig,
    /// Views in draw and user order
    pub views: ViewTree,
    pub seat: SeatState,
    pub grab: GrabSession,
    pub outputs: OutputManager,
    pub timers: TimerQueue,
    /// Events produced by handlers, drained by the host
    pub pending_compositor_events: Vec<CompositorEvent>,
    /// Cleared when a binding asks the compositor to exit
    pub running: bool,
}

impl CompositorState {
    pub fn new(config: CompositorConfig) -> Self {
        let outputs = OutputManager::new(config.test_timeout);
        Self {
            config,
            views: ViewTree::new(),
            seat: SeatState::new(),
            grab: GrabSession::new(),
            outputs,
            timers: TimerQueue::new(),
            pending_compositor_events: Vec::new(),
            running: true,
        }
    }

    /// Drain events from the state and from the output manager.
    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        let mut events = std::mem::take(&mut self.pending_compositor_events);
        events.append(&mut self.outputs.take_events());
        events
    }
}

impl Default for CompositorState {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}
