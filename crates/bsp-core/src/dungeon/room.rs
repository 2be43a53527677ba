//! Room carving
//!
//! Every leaf of the partition tree gets one walled room, inscribed with at
//! least one free cell between the room and the leaf's bounds on every side.
//! Rooms of sibling leaves therefore never touch unless a corridor joins them.

use bsp_rng::Mwc;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::consts::ROOM_MARGIN;

use super::partition::PartitionNode;
use super::rect::Rect;
use super::tile::{Tile, TileGrid};

/// A carved room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Position among the leaves, left to right
    pub id: usize,
    /// Outer rectangle, wall ring included
    pub rect: Rect,
}

impl Room {
    pub fn new(id: usize, rect: Rect) -> Self {
        Self { id, rect }
    }

    pub fn center(&self) -> (i32, i32) {
        self.rect.center()
    }

    /// Floor area inside the wall ring
    pub fn interior(&self) -> Rect {
        Rect::new(
            self.rect.x + 1,
            self.rect.y + 1,
            self.rect.width - 2,
            self.rect.height - 2,
        )
    }
}

/// Pick a room rectangle inside `bounds`.
///
/// Draw order: width, height, x offset, y offset. Sides are drawn from
/// `[min_room_size, side - 2]`; leaves too small for `min_room_size` get a
/// room of `side - 2`.
pub fn sample_room(bounds: Rect, min_room_size: i32, rng: &mut Mwc) -> Rect {
    let max_w = bounds.width - 2 * ROOM_MARGIN;
    let max_h = bounds.height - 2 * ROOM_MARGIN;
    let w = rng.int_between(min_room_size.min(max_w), max_w);
    let h = rng.int_between(min_room_size.min(max_h), max_h);
    let x = bounds.x + ROOM_MARGIN + rng.scaled(bounds.width - w - ROOM_MARGIN);
    let y = bounds.y + ROOM_MARGIN + rng.scaled(bounds.height - h - ROOM_MARGIN);
    Rect::new(x, y, w, h)
}

/// Write a room onto the grid: outer ring `Wall`, inside `Floor`.
pub fn draw_room(grid: &mut TileGrid, rect: Rect) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let edge = x == rect.x || x == rect.right() - 1 || y == rect.y || y == rect.bottom() - 1;
            grid.set(x, y, if edge { Tile::Wall } else { Tile::Floor });
        }
    }
}

/// Carve a room in every leaf of `tree`, left to right, and return them in
/// that order.
pub fn carve_rooms(
    tree: &mut PartitionNode,
    min_room_size: i32,
    rng: &mut Mwc,
    grid: &mut TileGrid,
) -> Vec<Room> {
    let mut rooms = Vec::new();
    for (id, leaf) in tree.leaves_mut().into_iter().enumerate() {
        let rect = sample_room(leaf.bounds, min_room_size, rng);
        trace!(id, bounds = ?leaf.bounds, room = ?rect, "carve room");
        draw_room(grid, rect);

        let room = Room::new(id, rect);
        leaf.room = Some(room);
        rooms.push(room);
    }
    rooms
}
