//! Dungeon system
//!
//! Contains map geometry, the tile grid, the partition tree, and the phases
//! that turn a configuration into a connected map.

mod connect;
mod corridor;
mod generation;
mod partition;
mod rect;
mod room;
mod tile;

pub use connect::{Connection, LeafRef, connect, find_link};
pub use corridor::{Corridor, CorridorKind, rasterize};
pub use generation::{Dungeon, GenerationContext, generate};
pub use partition::{
    PartitionNode, Split, build_tree, effective_split_chance, split_bias, split_offset,
};
pub use rect::{Adjacency, Axis, Rect};
pub use room::{Room, carve_rooms, draw_room, sample_room};
pub use tile::{Tile, TileGrid};
