//! Driver configuration.

use std::fmt;
use std::str::FromStr;

/// Errors from building or validating a [`GameConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The tick rate must be a positive, finite number of frames per second.
    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f64),

    /// A tile grid needs at least one row and one column.
    #[error("tile grid {0} is empty")]
    EmptyGrid(GridSize),

    /// The tile count of a grid does not fit in a `u32`.
    #[error("tile grid {0} has too many tiles")]
    GridTooLarge(GridSize),

    /// A grid argument that is not of the form `<cols>x<rows>`.
    #[error("invalid grid `{0}`, expected <cols>x<rows>")]
    MalformedGrid(String),
}

/// Tile-map dimensions in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridSize {
    /// Create a grid size.
    #[must_use]
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Number of tiles in the grid, or `None` if it overflows a `u32`.
    #[must_use]
    pub const fn tile_count(&self) -> Option<u32> {
        self.cols.checked_mul(self.rows)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedGrid(s.to_string());
        let (cols, rows) = s.split_once(['x', 'X']).ok_or_else(malformed)?;
        let cols = cols.trim().parse().map_err(|_| malformed())?;
        let rows = rows.trim().parse().map_err(|_| malformed())?;
        Ok(Self { cols, rows })
    }
}

/// Settings for the game loop.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Target frames per second.
    pub tick_rate: f64,
    /// Frames to run before stopping (0 = unlimited).
    pub max_frames: u64,
    /// Tile-map size of the level.
    pub grid: GridSize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_frames: 0,
            grid: GridSize::new(25, 20),
        }
    }
}

impl GameConfig {
    /// Set the target frames per second.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Stop after `max_frames` frames (0 = unlimited).
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the tile-map size.
    #[must_use]
    pub fn with_grid(mut self, grid: GridSize) -> Self {
        self.grid = grid;
        self
    }

    /// Check that the settings describe a runnable game.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`], [`ConfigError::EmptyGrid`]
    /// or [`ConfigError::GridTooLarge`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        match self.grid.tile_count() {
            None => Err(ConfigError::GridTooLarge(self.grid)),
            Some(0) => Err(ConfigError::EmptyGrid(self.grid)),
            Some(_) => Ok(()),
        }
    }

    /// The fixed time step in seconds.
    #[must_use]
    pub fn frame_time(&self) -> f64 {
        1.0 / self.tick_rate
    }
}
