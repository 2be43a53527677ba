//! Generation configuration

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HEIGHT, DEFAULT_MIN_DEPTH, DEFAULT_MIN_ROOM_SIZE, DEFAULT_SPLIT_CHANCE, DEFAULT_WIDTH,
    HARD_FLOOR, MAX_CELLS, ROOM_MARGIN,
};
use crate::error::{DungeonError, DungeonResult};

/// Parameters of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Map width in cells
    pub width: i32,
    /// Map height in cells
    pub height: i32,
    /// Smallest room side; also the smallest extent a split may leave
    pub min_room_size: i32,
    /// Regions shallower than this are always split (size permitting)
    pub min_depth: u32,
    /// Base probability of splitting a region at or past `min_depth`
    pub split_chance: f64,
    /// Seed; a time-derived one is used when absent
    pub seed: Option<u32>,
}

impl GenerationConfig {
    /// Create a configuration without a seed
    pub fn new(
        width: i32,
        height: i32,
        min_room_size: i32,
        min_depth: u32,
        split_chance: f64,
    ) -> Self {
        Self {
            width,
            height,
            min_room_size,
            min_depth,
            split_chance,
            seed: None,
        }
    }

    /// Pin the seed, making the run reproducible
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the generator cannot honour.
    pub fn validate(&self) -> DungeonResult<()> {
        if self.width <= 0 {
            return Err(DungeonError::invalid(
                "width",
                format!("must be positive (got {})", self.width),
            ));
        }
        if self.height <= 0 {
            return Err(DungeonError::invalid(
                "height",
                format!("must be positive (got {})", self.height),
            ));
        }
        if self.min_room_size <= 0 {
            return Err(DungeonError::invalid(
                "min_room_size",
                format!("must be positive (got {})", self.min_room_size),
            ));
        }
        if self.min_room_size < HARD_FLOOR {
            return Err(DungeonError::invalid(
                "min_room_size",
                format!(
                    "must be at least {HARD_FLOOR} (got {})",
                    self.min_room_size
                ),
            ));
        }

        let cells = i64::from(self.width) * i64::from(self.height);
        if cells > MAX_CELLS {
            return Err(DungeonError::invalid(
                "width",
                format!(
                    "{}x{} exceeds the {MAX_CELLS}-cell map limit",
                    self.width, self.height
                ),
            ));
        }

        // Both sides are positive here, so the subtraction cannot overflow
        if self.min_room_size > self.width.min(self.height) - 2 * ROOM_MARGIN {
            let needed = i64::from(self.min_room_size) + 2 * i64::from(ROOM_MARGIN);
            return Err(DungeonError::invalid(
                "min_room_size",
                format!(
                    "{} needs a map of at least {needed}x{needed} (got {}x{})",
                    self.min_room_size, self.width, self.height
                ),
            ));
        }

        if !self.split_chance.is_finite() || self.split_chance < 0.0 {
            return Err(DungeonError::invalid(
                "split_chance",
                format!("must be a non-negative number (got {})", self.split_chance),
            ));
        }

        Ok(())
    }

    /// The explicit seed, or the low 32 bits of the current epoch milliseconds.
    pub fn resolve_seed(&self) -> u32 {
        self.seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u32)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            DEFAULT_MIN_ROOM_SIZE,
            DEFAULT_MIN_DEPTH,
            DEFAULT_SPLIT_CHANCE,
        )
    }
}
