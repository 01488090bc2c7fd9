pub mod errors;
pub mod state;
pub mod compositor;
pub mod runtime;
pub mod window;
pub mod input;
pub mod output;

// Re-export key types
pub use compositor::{Compositor, CompositorConfig, CompositorEvent, HostEvent};
pub use runtime::{ExitReason, Runtime, TimerId, TimerQueue};
pub use state::CompositorState;
