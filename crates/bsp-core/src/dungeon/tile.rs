//! Map tiles and the row-major tile grid

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Tile kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Empty = 0,
    Wall = 1,
    Floor = 2,
}

impl Tile {
    /// Check if this tile can be walked on
    pub const fn is_passable(&self) -> bool {
        matches!(self, Tile::Floor)
    }

    /// Get the display character for this tile
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Floor => '.',
        }
    }

    /// Inverse of [`Tile::symbol`]
    pub const fn from_symbol(c: char) -> Option<Tile> {
        match c {
            ' ' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Floor),
            _ => None,
        }
    }
}

/// Row-major grid of tiles; cell `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "GridRows")]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

/// Compact serialized form: one symbol string per row.
#[derive(Serialize)]
struct GridRows {
    width: i32,
    height: i32,
    rows: Vec<String>,
}

impl From<TileGrid> for GridRows {
    fn from(grid: TileGrid) -> Self {
        GridRows {
            width: grid.width,
            height: grid.height,
            rows: grid.rows().collect(),
        }
    }
}

impl TileGrid {
    /// Create an all-`Empty` grid. Negative dimensions yield an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Flat index of `(x, y)`, or `None` outside the grid
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Unconditional write. Out-of-range writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Write that never downgrades `Floor` to `Wall`.
    pub fn paint(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            if tile == Tile::Wall && self.tiles[i] == Tile::Floor {
                return;
            }
            self.tiles[i] = tile;
        }
    }

    /// Raw tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every cell with its coordinates, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| ((i % width) as i32, (i / width) as i32, t))
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// One string of tile symbols per row
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(Tile::symbol).collect())
    }
}
