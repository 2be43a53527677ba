//! Text and JSON rendering of a generated dungeon
//!
//! Supports both classic ASCII and Unicode box-drawing glyphs.

use std::fmt::Write as _;

use bsp_core::{Dungeon, Rect, Tile, TileGrid};
use serde::Serialize;
use strum::{Display, EnumString, VariantNames};

/// Output format for the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames, Default)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One line of glyphs per map row
    #[default]
    Text,
    /// The dungeon as a JSON document
    Json,
}

/// Glyph style for text output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames, Default)]
#[strum(serialize_all = "lowercase")]
pub enum GlyphMode {
    /// `#` walls, `.` floor
    #[default]
    Classic,
    /// Box-drawing walls joined to their neighbours
    Box,
}

/// Set of glyphs used for rendering map cells.
pub trait GlyphSet {
    /// Character for the cell at `(x, y)`
    fn cell_char(&self, grid: &TileGrid, x: i32, y: i32) -> char;

    /// Character for an empty cell on a partition border
    fn border_char(&self) -> char;
}

/// Plain ASCII glyphs.
pub struct ClassicGlyphs;

impl GlyphSet for ClassicGlyphs {
    fn cell_char(&self, grid: &TileGrid, x: i32, y: i32) -> char {
        grid.get(x, y).unwrap_or_default().symbol()
    }

    fn border_char(&self) -> char {
        ':'
    }
}

/// Unicode box-drawing glyphs.
pub struct BoxGlyphs;

impl BoxGlyphs {
    fn wall_char(grid: &TileGrid, x: i32, y: i32) -> char {
        let wall = |dx: i32, dy: i32| grid.get(x + dx, y + dy) == Some(Tile::Wall);
        match (wall(0, -1), wall(1, 0), wall(0, 1), wall(-1, 0)) {
            // (north, east, south, west)
            (true, true, true, true) => '┼',
            (true, true, true, false) => '├',
            (true, false, true, true) => '┤',
            (false, true, true, true) => '┬',
            (true, true, false, true) => '┴',
            (false, true, true, false) => '┌',
            (false, false, true, true) => '┐',
            (true, true, false, false) => '└',
            (true, false, false, true) => '┘',
            (true, false, _, false) | (false, false, true, false) => '│',
            _ => '─',
        }
    }
}

impl GlyphSet for BoxGlyphs {
    fn cell_char(&self, grid: &TileGrid, x: i32, y: i32) -> char {
        match grid.get(x, y) {
            Some(Tile::Wall) => Self::wall_char(grid, x, y),
            Some(Tile::Floor) => '·',
            _ => ' ',
        }
    }

    fn border_char(&self) -> char {
        '░'
    }
}

/// Glyph set for `mode`
pub fn glyph_set(mode: GlyphMode) -> Box<dyn GlyphSet> {
    match mode {
        GlyphMode::Classic => Box::new(ClassicGlyphs),
        GlyphMode::Box => Box::new(BoxGlyphs),
    }
}

/// Cells lying on the outline of any region
fn border_mask(grid: &TileGrid, regions: &[Rect]) -> Vec<bool> {
    let mut mask = vec![false; grid.tiles().len()];
    let mut mark = |x: i32, y: i32| {
        if let Some(i) = grid.index(x, y) {
            mask[i] = true;
        }
    };
    for r in regions.iter().filter(|r| r.is_valid()) {
        for x in r.x..r.right() {
            mark(x, r.y);
            mark(x, r.bottom() - 1);
        }
        for y in r.y..r.bottom() {
            mark(r.x, y);
            mark(r.right() - 1, y);
        }
    }
    mask
}

/// Render the map as text, one line per row.
///
/// With `regions`, empty cells on partition borders are marked so the tree
/// can be read off the map.
pub fn text(dungeon: &Dungeon, glyphs: &dyn GlyphSet, regions: bool) -> String {
    let grid = &dungeon.grid;
    let mask = if regions {
        border_mask(grid, &dungeon.regions())
    } else {
        Vec::new()
    };

    let mut out = String::with_capacity(grid.tiles().len() * 2);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let border = grid
                .index(x, y)
                .is_some_and(|i| mask.get(i).copied().unwrap_or(false));
            let c = if border && grid.get(x, y) == Some(Tile::Empty) {
                glyphs.border_char()
            } else {
                glyphs.cell_char(grid, x, y)
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// One line per connection: rooms, centres, adjacency and corridor shape.
pub fn links(dungeon: &Dungeon) -> String {
    let mut out = String::new();
    for (c, corridor) in dungeon.connections.iter().zip(&dungeon.corridors) {
        let ((lx, ly), (rx, ry)) = c.centers();
        let _ = writeln!(
            out,
            "room {} ({lx},{ly}) -> room {} ({rx},{ry}) {} {}",
            c.left.room_id, c.right.room_id, c.adjacency, corridor.kind
        );
    }
    out
}

/// Summary line for text output
pub fn summary(dungeon: &Dungeon) -> String {
    format!(
        "seed {} | {}x{} | {} rooms | {} connections",
        dungeon.seed,
        dungeon.grid.width(),
        dungeon.grid.height(),
        dungeon.rooms.len(),
        dungeon.connections.len()
    )
}

/// JSON document: the dungeon, plus partition regions when requested
#[derive(Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub dungeon: &'a Dungeon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Rect>>,
}

impl<'a> Report<'a> {
    pub fn new(dungeon: &'a Dungeon, regions: bool) -> Self {
        Self {
            dungeon,
            regions: regions.then(|| dungeon.regions()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_core::{GenerationConfig, generate};
    use std::str::FromStr;

    fn single_room() -> Dungeon {
        generate(&GenerationConfig::new(20, 15, 11, 3, 1.0).with_seed(7)).unwrap()
    }

    fn example() -> Dungeon {
        generate(&GenerationConfig::new(40, 30, 6, 2, 1.0).with_seed(1)).unwrap()
    }

    #[test]
    fn test_modes_parse() {
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(GlyphMode::from_str("box").unwrap(), GlyphMode::Box);
        assert!(GlyphMode::from_str("fancy").is_err());
        assert_eq!(GlyphMode::VARIANTS, &["classic", "box"]);
    }

    #[test]
    fn test_classic_text_matches_rows() {
        let dungeon = example();
        let rendered = text(&dungeon, &ClassicGlyphs, false);
        let rows: Vec<_> = dungeon.grid.rows().collect();
        assert_eq!(rendered.lines().collect::<Vec<_>>(), rows);
    }

    #[test]
    fn test_box_room_corners() {
        // Room (5, 1, 12, 13) on a 20x15 map
        let dungeon = single_room();
        let lines: Vec<Vec<char>> = text(&dungeon, &BoxGlyphs, false)
            .lines()
            .map(|l| l.chars().collect())
            .collect();
        assert_eq!(lines[1][5], '┌');
        assert_eq!(lines[1][16], '┐');
        assert_eq!(lines[13][5], '└');
        assert_eq!(lines[13][16], '┘');
        assert_eq!(lines[1][10], '─');
        assert_eq!(lines[7][5], '│');
        assert_eq!(lines[7][10], '·');
        assert_eq!(lines[0][0], ' ');
    }

    #[test]
    fn test_regions_mark_only_empty_border_cells() {
        let dungeon = single_room();
        let rendered = text(&dungeon, &ClassicGlyphs, true);
        let lines: Vec<Vec<char>> = rendered.lines().map(|l| l.chars().collect()).collect();
        // Map outline is the root region
        assert_eq!(lines[0][0], ':');
        assert_eq!(lines[14][19], ':');
        // Interior empty cell untouched, room wall untouched
        assert_eq!(lines[7][2], ' ');
        assert_eq!(lines[1][5], '#');
    }

    #[test]
    fn test_border_mask_outlines_each_region() {
        let grid = TileGrid::new(10, 8);
        let regions = [Rect::new(0, 0, 10, 8), Rect::new(0, 0, 4, 8), Rect::new(4, 0, 6, 8)];
        let mask = border_mask(&grid, &regions);

        for (x, y, _) in grid.cells() {
            let expected = regions.iter().any(|r| {
                r.contains_point(x, y)
                    && (x == r.x || x == r.right() - 1 || y == r.y || y == r.bottom() - 1)
            });
            let i = grid.index(x, y).unwrap();
            assert_eq!(mask[i], expected, "({x}, {y})");
        }
        // Split line between the two halves
        assert!(mask[grid.index(3, 4).unwrap()]);
        assert!(mask[grid.index(4, 4).unwrap()]);
        assert!(!mask[grid.index(2, 4).unwrap()]);
    }

    #[test]
    fn test_border_mask_clips_to_grid() {
        let grid = TileGrid::new(5, 5);
        let mask = border_mask(&grid, &[Rect::new(3, 3, 10, 10), Rect::new(1, 1, 0, 3)]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 3);
        assert!(mask[grid.index(3, 3).unwrap()]);
        assert!(mask[grid.index(4, 3).unwrap()]);
        assert!(mask[grid.index(3, 4).unwrap()]);
    }

    #[test]
    fn test_links_listing() {
        let dungeon = example();
        let listing = links(&dungeon);
        assert_eq!(listing.lines().count(), 18);
        let c = dungeon.connections[0];
        let ((lx, ly), _) = c.centers();
        let first = listing.lines().next().unwrap();
        assert!(first.starts_with(&format!("room {} ({lx},{ly}) -> room {}", c.left.room_id, c.right.room_id)));
        assert!(links(&single_room()).is_empty());
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            summary(&single_room()),
            "seed 7 | 20x15 | 1 rooms | 0 connections"
        );
    }

    #[test]
    fn test_report_regions_optional() {
        let dungeon = example();
        let plain = serde_json::to_value(Report::new(&dungeon, false)).unwrap();
        assert!(plain.get("regions").is_none());
        assert_eq!(plain["seed"], 1);

        let with = serde_json::to_value(Report::new(&dungeon, true)).unwrap();
        assert_eq!(with["regions"].as_array().map(Vec::len), Some(37));
        assert_eq!(with["regions"][0]["width"], 40);
    }
}
