//! Generation pipeline
//!
//! One run threads a [`GenerationContext`] through four phases: partition,
//! room carving, connection, corridor rasterization. The context owns the
//! random stream and the grid for the duration of the run; nothing outlives
//! it except the finished [`Dungeon`].

use bsp_rng::Mwc;
use serde::Serialize;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::DungeonResult;

use super::connect::{Connection, connect};
use super::corridor::{Corridor, rasterize};
use super::partition::{PartitionNode, build_tree};
use super::rect::Rect;
use super::room::{Room, carve_rooms};
use super::tile::TileGrid;

/// State of a single generation run
#[derive(Debug)]
pub struct GenerationContext {
    pub rng: Mwc,
    pub grid: TileGrid,
    pub config: GenerationConfig,
}

impl GenerationContext {
    /// Validate `config` and set up an empty grid and a seeded stream.
    pub fn new(config: &GenerationConfig) -> DungeonResult<Self> {
        config.validate()?;
        let seed = config.resolve_seed();
        Ok(Self {
            rng: Mwc::new(seed),
            grid: TileGrid::new(config.width, config.height),
            config: config.with_seed(seed),
        })
    }

    /// Seed the stream was started from
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// The whole map
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.config.width, self.config.height)
    }

    /// Partition the map.
    pub fn partition(&mut self) -> PartitionNode {
        let tree = build_tree(self.bounds(), &self.config, &mut self.rng);
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.max_depth(),
            draws = self.rng.call_count(),
            "partition built"
        );
        tree
    }

    /// Carve a room in every leaf of `tree`.
    pub fn carve(&mut self, tree: &mut PartitionNode) -> Vec<Room> {
        let rooms = carve_rooms(tree, self.config.min_room_size, &mut self.rng, &mut self.grid);
        debug!(rooms = rooms.len(), "rooms carved");
        rooms
    }

    /// Draw a corridor for every connection, in order.
    pub fn dig(&mut self, connections: &[Connection]) -> Vec<Corridor> {
        let corridors: Vec<_> = connections
            .iter()
            .map(|c| rasterize(c, &mut self.rng, &mut self.grid))
            .collect();
        debug!(
            corridors = corridors.len(),
            draws = self.rng.call_count(),
            "corridors dug"
        );
        corridors
    }
}

/// A generated map and its geometry
#[derive(Debug, Clone, Serialize)]
pub struct Dungeon {
    /// Seed that reproduces this map
    pub seed: u32,
    pub grid: TileGrid,
    /// Carved rooms, left to right through the tree
    pub rooms: Vec<Room>,
    /// Links between the halves of every split, root first
    pub connections: Vec<Connection>,
    /// One corridor per connection, same order
    pub corridors: Vec<Corridor>,
    #[serde(skip)]
    pub tree: PartitionNode,
}

impl Dungeon {
    /// Bounds of every partition region, parents first
    pub fn regions(&self) -> Vec<Rect> {
        self.tree.regions()
    }

    /// Room centre pairs, one per connection
    pub fn connection_lines(&self) -> Vec<((i32, i32), (i32, i32))> {
        self.connections.iter().map(Connection::centers).collect()
    }

    /// Room whose rectangle covers `(x, y)`, walls included
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.rect.contains_point(x, y))
    }
}

/// Generate a dungeon.
///
/// Fails only on an invalid configuration. With `config.seed` set the
/// result is a pure function of `config`.
pub fn generate(config: &GenerationConfig) -> DungeonResult<Dungeon> {
    let mut ctx = GenerationContext::new(config)?;
    debug!(
        seed = ctx.seed(),
        width = config.width,
        height = config.height,
        "generating dungeon"
    );

    let mut tree = ctx.partition();
    let rooms = ctx.carve(&mut tree);
    let connections = connect(&tree);
    debug!(connections = connections.len(), "leaves connected");
    let corridors = ctx.dig(&connections);

    Ok(Dungeon {
        seed: ctx.seed(),
        grid: ctx.grid,
        rooms,
        connections,
        corridors,
        tree,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DungeonError;
    use crate::dungeon::tile::Tile;

    fn example() -> GenerationConfig {
        GenerationConfig::new(40, 30, 6, 2, 1.0).with_seed(1)
    }

    #[test]
    fn test_context_resolves_seed() {
        let ctx = GenerationContext::new(&example()).unwrap();
        assert_eq!(ctx.seed(), 1);
        assert_eq!(ctx.config.seed, Some(1));
        assert_eq!(ctx.bounds(), Rect::new(0, 0, 40, 30));
        assert_eq!(ctx.grid.count(Tile::Empty), 1200);
    }

    #[test]
    fn test_context_rejects_invalid() {
        let config = GenerationConfig::new(0, 30, 6, 2, 1.0);
        assert!(matches!(
            GenerationContext::new(&config),
            Err(DungeonError::InvalidConfig { field: "width", .. })
        ));
    }

    #[test]
    fn test_unseeded_run_reports_its_seed() {
        let config = GenerationConfig::new(40, 30, 6, 2, 1.0);
        let first = generate(&config).unwrap();
        let replay = generate(&config.with_seed(first.seed)).unwrap();
        assert_eq!(first.grid, replay.grid);
        assert_eq!(first.rooms, replay.rooms);
    }

    #[test]
    fn test_example_counts() {
        let dungeon = generate(&example()).unwrap();
        assert_eq!(dungeon.seed, 1);
        assert_eq!(dungeon.rooms.len(), 19);
        assert_eq!(dungeon.connections.len(), 18);
        assert_eq!(dungeon.corridors.len(), 18);
        assert_eq!(dungeon.tree.leaf_count(), 19);
        assert_eq!(dungeon.regions().len(), 37);
        assert_eq!(dungeon.connection_lines().len(), 18);
    }

    #[test]
    fn test_room_at() {
        let dungeon = generate(&example()).unwrap();
        let room = dungeon.rooms[3];
        let (cx, cy) = room.center();
        assert_eq!(dungeon.room_at(cx, cy), Some(&room));
        assert_eq!(dungeon.room_at(-1, -1), None);
    }

    #[test]
    fn test_serialize_omits_tree() {
        let dungeon = generate(&example()).unwrap();
        let json = serde_json::to_value(&dungeon).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["rooms"].as_array().map(Vec::len), Some(19));
        assert_eq!(json["grid"]["rows"].as_array().map(Vec::len), Some(30));
        assert!(json.get("tree").is_none());
    }
}
