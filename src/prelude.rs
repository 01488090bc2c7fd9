//! Common imports and types used throughout mwd.

pub use crate::core::compositor::{Compositor, CompositorConfig, CompositorEvent, HostEvent};
pub use crate::core::window::{View, ViewId};
pub use crate::platform::api::{Host, OutputId, Renderer, SurfaceId};
pub use crate::util::geometry::{Edges, Rect};

pub type Result<T> = std::result::Result<T, crate::core::errors::CoreError>;
