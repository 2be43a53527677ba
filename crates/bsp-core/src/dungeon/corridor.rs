//! Corridor rasterization
//!
//! A corridor is one `Floor` cell wide with a `Wall` cell on each side. It
//! runs along the axis on which the two partition regions touch: left to
//! right for [`Adjacency::Side`], top to bottom for [`Adjacency::Stacked`].
//! Everything below is written in terms of "along" (the corridor axis) and
//! "across" (the other one), so both cases share one code path.
//!
//! When the rooms' spans across the corridor overlap by at least
//! [`MIN_CORRIDOR_OVERLAP`] cells the corridor is straight. Otherwise it
//! leaves the first room on its own lane, jogs across at a turn point in the
//! gap, and enters the second room on that room's lane.
//!
//! Wall writes never downgrade an existing `Floor` cell. The centre line is
//! always written as `Floor`, punching doorways through room walls.

use bsp_rng::Mwc;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::trace;

use crate::consts::MIN_CORRIDOR_OVERLAP;

use super::connect::Connection;
use super::rect::{Axis, Rect};
use super::tile::{Tile, TileGrid};

/// Corridor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CorridorKind {
    Straight,
    ZShaped,
}

/// A rasterized corridor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub kind: CorridorKind,
    /// Axis the corridor runs along
    pub axis: Axis,
    /// Every cell written, in write order; may repeat
    pub cells: Vec<(i32, i32)>,
}

/// Writes in along/across coordinates and records the footprint.
struct Pen<'g> {
    grid: &'g mut TileGrid,
    axis: Axis,
    cells: Vec<(i32, i32)>,
}

impl Pen<'_> {
    fn floor(&mut self, along: i32, across: i32) {
        let (x, y) = self.axis.point(along, across);
        self.grid.set(x, y, Tile::Floor);
        self.cells.push((x, y));
    }

    fn wall(&mut self, along: i32, across: i32) {
        let (x, y) = self.axis.point(along, across);
        self.grid.paint(x, y, Tile::Wall);
        self.cells.push((x, y));
    }

    /// Three-wide run on lane `across`, from `from` to `to` inclusive.
    fn run(&mut self, from: i32, to: i32, across: i32) {
        for along in from..=to {
            self.wall(along, across - 1);
            self.floor(along, across);
            self.wall(along, across + 1);
        }
    }

    /// Three-wide jog at `along`, spanning lanes `a` to `b`.
    fn jog(&mut self, along: i32, a: i32, b: i32) {
        let lo = a.min(b) - 1;
        let hi = a.max(b) + 1;
        for across in lo..=hi {
            self.wall(along - 1, across);
            if across != lo && across != hi {
                self.floor(along, across);
            } else {
                self.wall(along, across);
            }
            self.wall(along + 1, across);
        }
    }
}

/// Cells shared by the spans of `a` and `b` along `axis`; negative when apart.
fn span_overlap(a: &Rect, b: &Rect, axis: Axis) -> i32 {
    let (a, b) = (a.span(axis), b.span(axis));
    a.end.min(b.end) - a.start.max(b.start)
}

/// Draw the corridor for `connection` onto `grid`.
///
/// Rooms must already be carved. Draw order: for a straight corridor, the
/// lane; for a Z-shaped one, the left lane up to the turn point, the jog,
/// then the right lane.
pub fn rasterize(connection: &Connection, rng: &mut Mwc, grid: &mut TileGrid) -> Corridor {
    let axis = connection.adjacency.axis();
    let across = axis.cross();
    let (l, r) = (&connection.left, &connection.right);

    let mut pen = Pen {
        grid,
        axis,
        cells: Vec::new(),
    };

    // First and last cells along the corridor: the two facing room walls
    let start = l.room.end(axis) - 1;
    let finish = r.room.start(axis);

    let kind = if span_overlap(&l.room, &r.room, across) >= MIN_CORRIDOR_OVERLAP {
        let top = l.room.start(across).max(r.room.start(across));
        let bottom = l.room.end(across).min(r.room.end(across));
        let lane = top + rng.scaled(bottom - 1 - (top + 1)) + 1;

        pen.run(start, finish, lane);
        CorridorKind::Straight
    } else {
        let lane_l = l.room.start(across) + 1 + rng.scaled(l.room.extent(across) - 2);
        let lane_r = r.room.start(across) + 1 + rng.scaled(r.room.extent(across) - 2);

        // Turn inside the gap of whichever region is wider across the corridor
        let mid = if l.bounds.extent(across) >= r.bounds.extent(across) {
            let room_end = l.room.end(axis);
            rng.scaled(l.bounds.end(axis) - 1 - room_end) + room_end - 1
        } else {
            let region_start = r.bounds.start(axis);
            rng.scaled(r.room.start(axis) - 1 - (region_start + 1)) + region_start
        };

        pen.run(start, mid, lane_l);
        let turn = start.max(mid + 1);
        pen.jog(turn, lane_l, lane_r);
        pen.run(turn, finish, lane_r);
        CorridorKind::ZShaped
    };

    trace!(
        left = l.room_id,
        right = r.room_id,
        %kind,
        %axis,
        cells = pen.cells.len(),
        "rasterize corridor"
    );

    Corridor {
        kind,
        axis,
        cells: pen.cells,
    }
}
