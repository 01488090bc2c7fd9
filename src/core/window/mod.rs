pub mod constraints;
pub mod focus;
pub mod grab;
pub mod layer;
pub mod legacy;
pub mod toplevel;
pub mod tree;
pub mod view;

pub use constraints::{constrain_size, SizeConstraints, MIN_VIEW_SIZE};
pub use focus::SeatState;
pub use grab::{GrabMode, GrabSession};
pub use tree::{Order, ViewId, ViewTree};
pub use view::{RenderLayer, SurfaceCommit, View, ViewKind, ViewRole};

use crate::platform::api::{OutputId, SurfaceId};

impl View {
    pub fn toplevel(surface: SurfaceId) -> Self {
        View::new(Box::new(toplevel::Toplevel::new(surface)))
    }

    pub fn layer(surface: SurfaceId, output: Option<OutputId>) -> Self {
        View::new(Box::new(layer::Layer::new(surface, output)))
    }

    pub fn legacy(surface: SurfaceId) -> Self {
        View::new(Box::new(legacy::Legacy::new(surface)))
    }
}
