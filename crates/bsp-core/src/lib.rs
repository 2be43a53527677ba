//! bsp-core: binary-space-partition dungeon generation
//!
//! Recursively partitions a rectangle into a binary tree of regions, carves a
//! walled room inside every leaf, links the two subtrees of every internal
//! node through one pair of edge-adjacent leaves, and rasterizes a corridor
//! for each link onto a row-major tile grid.
//!
//! The crate performs no I/O and no drawing. A generation run is a pure
//! function of its [`GenerationConfig`], seed included.
//!
//! ```
//! use bsp_core::{generate, GenerationConfig, Tile};
//!
//! let config = GenerationConfig::new(40, 30, 6, 2, 1.0).with_seed(1);
//! let dungeon = generate(&config).unwrap();
//! assert!(dungeon.rooms.len() >= 3);
//! assert!(dungeon.grid.count(Tile::Floor) > 0);
//! ```

mod config;
mod consts;
mod error;

pub mod dungeon;

pub use bsp_rng::Mwc;
pub use config::GenerationConfig;
pub use consts::*;
pub use dungeon::{
    Adjacency, Axis, Connection, Corridor, CorridorKind, Dungeon, GenerationContext, LeafRef,
    PartitionNode, Rect, Room, Split, Tile, TileGrid, generate,
};
pub use error::{DungeonError, DungeonResult};
