//! Geometry primitives shared by views, grabs and outputs.
//!
//! Views are described by four independent edge coordinates rather than an
//! origin and a size, so that resizing can pin whichever side is not being
//! dragged.

use bitflags::bitflags;

bitflags! {
    /// Sides of a box.
    ///
    /// Used both for the edges dragged during a resize and for the edges a
    /// view's position is anchored to. Values match the wlroots edge enum.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::empty()
    }
}

impl Edges {
    /// The edges that are not part of `self`.
    pub fn opposite(self) -> Self {
        self.complement() & Self::all()
    }
}

/// A box expressed by its four edges in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Rect {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Shift all four edges by the same displacement.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
            left: self.left + dx,
        }
    }

    /// Collapse inverted axes so that `right >= left` and `bottom >= top`.
    ///
    /// The far edge is moved onto the near one, which leaves a zero-sized
    /// axis rather than swapping sides.
    pub fn normalized(&self) -> Self {
        Self {
            top: self.top,
            right: self.right.max(self.left),
            bottom: self.bottom.max(self.top),
            left: self.left,
        }
    }

    /// Half-open containment test: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Integer box used for output layout and committed surface geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_xywh(self.x as f64, self.y as f64, self.width as f64, self.height as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Smallest box containing both, ignoring empty boxes.
    pub fn union(&self, other: &IRect) -> IRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        IRect::new(x, y, right - x, bottom - y)
    }
}

/// Output and surface transforms, numbered as in `wl_output.transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
    Flipped,
    Flipped90,
    Flipped180,
    Flipped270,
}

impl Transform {
    /// The transform that undoes `self`.
    ///
    /// Only the plain quarter turns differ from their inverse; every flipped
    /// variant and the half turn are involutions.
    pub fn invert(self) -> Self {
        match self {
            Transform::Rotated90 => Transform::Rotated270,
            Transform::Rotated270 => Transform::Rotated90,
            other => other,
        }
    }

    /// Whether width and height trade places under this transform.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Transform::Rotated90 | Transform::Rotated270 | Transform::Flipped90 | Transform::Flipped270
        )
    }
}
