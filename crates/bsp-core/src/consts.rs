//! Generator constants
//!
//! Tuning values shared by the partition builder, the room carver and the
//! corridor rasterizer.

/// Default map dimensions
pub const DEFAULT_WIDTH: i32 = 220;
pub const DEFAULT_HEIGHT: i32 = 180;

/// Default minimum room size (also the minimum split extent)
pub const DEFAULT_MIN_ROOM_SIZE: i32 = 10;

/// Default depth below which regions are always split
pub const DEFAULT_MIN_DEPTH: u32 = 4;

/// Default base probability of splitting a region past `min_depth`
pub const DEFAULT_SPLIT_CHANCE: f64 = 0.35;

/// Regions whose smaller side is below this are never split.
/// Also the smallest accepted `min_room_size`: a room needs a wall ring
/// around at least one floor cell, plus a one-cell margin on each side.
pub const HARD_FLOOR: i32 = 5;

/// A side longer than this multiple of the other counts as stretched
pub const ASPECT_LIMIT: f64 = 2.5;

/// Split chance multiplier for stretched regions
pub const ASPECT_SPLIT_BOOST: f64 = 1.7;

/// Axis bias meaning "split vertically"
pub const BIAS_VERTICAL: f64 = 0.75;

/// Axis bias meaning "split horizontally"
pub const BIAS_HORIZONTAL: f64 = 0.25;

/// Cells of span overlap needed for a straight corridor
pub const MIN_CORRIDOR_OVERLAP: i32 = 3;

/// Largest accepted map area, in cells
pub const MAX_CELLS: i64 = 1 << 26;

/// Margin between a room and its partition bounds
pub const ROOM_MARGIN: i32 = 1;
