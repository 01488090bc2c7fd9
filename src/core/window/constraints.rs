//! Size constraint solving for interactive resizes.

use crate::util::geometry::{Edges, Rect};

/// Smallest width or height the compositor lets any view be resized to.
pub const MIN_VIEW_SIZE: f64 = 50.0;

/// Min/max size bounds for a view. A bound of `0` means "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeConstraints {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl SizeConstraints {
    pub const UNCONSTRAINED: SizeConstraints = SizeConstraints {
        min_width: 0.0,
        max_width: 0.0,
        min_height: 0.0,
        max_height: 0.0,
    };

    pub fn new(min_width: f64, max_width: f64, min_height: f64, max_height: f64) -> Self {
        Self { min_width, max_width, min_height, max_height }
    }

    /// Raise both minimums to at least `floor`. The floor always wins over a
    /// smaller client value.
    pub fn with_floor(self, floor: f64) -> Self {
        Self {
            min_width: self.min_width.max(floor),
            min_height: self.min_height.max(floor),
            ..self
        }
    }
}

/// Clamp `rect` into `constraints` by moving only the dragged edges.
///
/// On each axis the edge opposite the drag stays fixed. When a dimension is
/// out of bounds and neither edge of that axis is in `edges`, the axis is left
/// alone: there is no sensible side to move.
///
/// A maximum smaller than the minimum is raised to the minimum.
pub fn constrain_size(edges: Edges, constraints: &SizeConstraints, rect: &mut Rect) {
    let width = rect.width();
    let height = rect.height();

    let min_width = constraints.min_width;
    let min_height = constraints.min_height;
    let max_width = effective_max(constraints.max_width, min_width);
    let max_height = effective_max(constraints.max_height, min_height);

    if min_width != 0.0 && width < min_width {
        if edges.contains(Edges::LEFT) {
            rect.left = rect.right - min_width;
        } else if edges.contains(Edges::RIGHT) {
            rect.right = rect.left + min_width;
        }
    }

    if max_width != 0.0 && width > max_width {
        if edges.contains(Edges::LEFT) {
            rect.left = rect.right - max_width;
        } else if edges.contains(Edges::RIGHT) {
            rect.right = rect.left + max_width;
        }
    }

    if min_height != 0.0 && height < min_height {
        if edges.contains(Edges::TOP) {
            rect.top = rect.bottom - min_height;
        } else if edges.contains(Edges::BOTTOM) {
            rect.bottom = rect.top + min_height;
        }
    }

    if max_height != 0.0 && height > max_height {
        if edges.contains(Edges::TOP) {
            rect.top = rect.bottom - max_height;
        } else if edges.contains(Edges::BOTTOM) {
            rect.bottom = rect.top + max_height;
        }
    }
}

fn effective_max(max: f64, min: f64) -> f64 {
    if max != 0.0 && max < min {
        min
    } else {
        max
    }
}
