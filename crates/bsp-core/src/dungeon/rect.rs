//! Rectangle geometry for partition regions and rooms

use std::ops::Range;

use serde::{Deserialize, Serialize};
use strum::Display;

/// One of the two grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Axis {
    /// The x axis (columns). Dividing its extent is a vertical cut with
    /// left/right halves.
    Horizontal,
    /// The y axis (rows). Dividing its extent is a horizontal cut with
    /// top/bottom halves.
    Vertical,
}

impl Axis {
    /// The other axis
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Build an `(x, y)` point from a coordinate along this axis and one across it.
    pub const fn point(self, along: i32, across: i32) -> (i32, i32) {
        match self {
            Axis::Horizontal => (along, across),
            Axis::Vertical => (across, along),
        }
    }
}

/// How two partition regions touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Adjacency {
    /// Left region's right edge is the right region's left edge
    Side,
    /// Upper region's bottom edge is the lower region's top edge
    Stacked,
}

impl Adjacency {
    /// Axis a corridor between the two regions runs along
    pub const fn axis(self) -> Axis {
        match self {
            Adjacency::Side => Axis::Horizontal,
            Adjacency::Stacked => Axis::Vertical,
        }
    }
}

/// Integer rectangle, half-open: covers `x..x+width` by `y..y+height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Half-open spans `[a0, a1)` and `[b0, b1)` share at least one cell.
const fn spans_overlap(a0: i32, a1: i32, b0: i32, b1: i32) -> bool {
    a0 < b1 && b0 < a1
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last row
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub const fn area(&self) -> i32 {
        self.width * self.height
    }

    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub const fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// One past the last cell along `axis`
    pub const fn end(&self, axis: Axis) -> i32 {
        self.start(axis) + self.extent(axis)
    }

    /// Cells covered along `axis`
    pub const fn span(&self, axis: Axis) -> Range<i32> {
        self.start(axis)..self.end(axis)
    }

    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub const fn intersects(&self, other: &Rect) -> bool {
        spans_overlap(self.x, self.right(), other.x, other.right())
            && spans_overlap(self.y, self.bottom(), other.y, other.bottom())
    }

    /// `other` lies inside `self` with at least `margin` free cells on every side.
    pub const fn contains_inset(&self, other: &Rect, margin: i32) -> bool {
        other.x >= self.x + margin
            && other.y >= self.y + margin
            && other.right() <= self.right() - margin
            && other.bottom() <= self.bottom() - margin
    }

    /// Split into two rectangles, cutting across `axis` at `offset` cells
    /// from the start. `Horizontal` yields a left/right pair.
    pub const fn split_at(&self, axis: Axis, offset: i32) -> (Rect, Rect) {
        match axis {
            Axis::Horizontal => (
                Rect::new(self.x, self.y, offset, self.height),
                Rect::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
            Axis::Vertical => (
                Rect::new(self.x, self.y, self.width, offset),
                Rect::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
        }
    }

    /// Edge adjacency of `self` (the left/upper region) to `other`.
    ///
    /// Regions are adjacent when `self`'s right edge is `other`'s left edge
    /// and their row spans overlap, or `self`'s bottom edge is `other`'s top
    /// edge and their column spans overlap. Touching only at a corner does
    /// not count. The check is directional: `other` must lie to the right of
    /// or below `self`.
    pub const fn adjacency(&self, other: &Rect) -> Option<Adjacency> {
        if self.right() == other.x && spans_overlap(self.y, self.bottom(), other.y, other.bottom())
        {
            Some(Adjacency::Side)
        } else if self.bottom() == other.y
            && spans_overlap(self.x, self.right(), other.x, other.right())
        {
            Some(Adjacency::Stacked)
        } else {
            None
        }
    }
}
