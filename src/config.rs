use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use crate::arena::Arena;
use crate::engine::MIN_PERIOD_MS;
use crate::theme::Theme;

pub const DEFAULT_GRID_SIZE: u32 = 20;
pub const DEFAULT_CANVAS_SIZE: u32 = 400;
pub const DEFAULT_PERIOD_MS: u64 = 150;
pub const DEFAULT_WALL_COUNT: u32 = 5;
pub const MAX_WALL_COUNT: u32 = 10_000;

/// Cells the snake and the first food need before any wall goes down.
const RESERVED_CELLS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the canvas must be at least one cell wide and tall")]
    EmptyCanvas,
    #[error("grid size {grid} does not evenly divide the {width}x{height} canvas")]
    GridMisaligned { grid: i32, width: i32, height: i32 },
    #[error("a tick period of {period_ms}ms is below the {}ms floor", MIN_PERIOD_MS)]
    PeriodTooShort { period_ms: u64 },
    #[error("{count} walls do not fit: only {capacity} cells are free for walls")]
    TooManyWalls { count: usize, capacity: usize },
}

/// Everything chosen before a game starts. Stays fixed for the session and
/// is read again on every restart.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub arena: Arena,
    pub initial_period_ms: u64,
    pub theme: Theme,
    pub wall_mode: bool,
    pub wall_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            arena: Arena::default(),
            initial_period_ms: DEFAULT_PERIOD_MS,
            theme: Theme::default(),
            wall_mode: false,
            wall_count: DEFAULT_WALL_COUNT as usize,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Arena {
            width,
            height,
            grid,
        } = self.arena;

        if grid <= 0 || width < grid || height < grid {
            return Err(ConfigError::EmptyCanvas);
        }
        if width % grid != 0 || height % grid != 0 {
            return Err(ConfigError::GridMisaligned {
                grid,
                width,
                height,
            });
        }
        if self.initial_period_ms < MIN_PERIOD_MS {
            return Err(ConfigError::PeriodTooShort {
                period_ms: self.initial_period_ms,
            });
        }

        let capacity = self.arena.cell_count().saturating_sub(RESERVED_CELLS);
        if self.wall_mode && self.wall_count > capacity {
            return Err(ConfigError::TooManyWalls {
                count: self.wall_count,
                capacity,
            });
        }
        Ok(())
    }
}

/// Play Snake in the terminal, optionally with wall obstacles.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Pixels per grid cell. Must evenly divide the canvas width and height.
    #[arg(
        short = 'g',
        long = "grid",
        value_name = "PIXELS",
        default_value_t = DEFAULT_GRID_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=4096)
    )]
    pub grid_size: u32,
    /// Canvas width in pixels.
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = DEFAULT_CANVAS_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=65536)
    )]
    pub width: u32,
    /// Canvas height in pixels.
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = DEFAULT_CANVAS_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=65536)
    )]
    pub height: u32,
    /// Milliseconds between moves at the start of a game. Smaller is faster.
    #[arg(
        short = 's',
        long = "speed",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_PERIOD_MS,
        value_parser = clap::value_parser!(u64).range(MIN_PERIOD_MS..=60_000)
    )]
    pub speed_ms: u64,
    /// Color theme.
    #[arg(short = 't', long, value_enum, default_value_t = Theme::Classic)]
    pub theme: Theme,
    /// Scatter wall blocks over the arena.
    #[arg(short = 'w', long)]
    pub walls: bool,
    /// Number of wall blocks placed when walls are on.
    #[arg(
        long = "wall-count",
        value_name = "COUNT",
        default_value_t = DEFAULT_WALL_COUNT,
        value_parser = clap::value_parser!(u32).range(1..=MAX_WALL_COUNT as i64)
    )]
    pub wall_count: u32,
    /// File holding the high score.
    #[arg(long, value_name = "PATH", default_value = ".snek_high_score.txt")]
    pub high_score_file: PathBuf,
    /// Keep the high score in memory only.
    #[arg(long = "no-persist")]
    pub no_persist: bool,
    /// File the log is written to.
    #[arg(long, value_name = "PATH", default_value = "snek.log")]
    pub log_file: PathBuf,
    /// Log verbosity: off, error, warn, info, debug or trace.
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
    /// Seed for food and wall placement, for reproducible games.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
    /// Do not ring the terminal bell.
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            arena: Arena {
                width: self.width as i32,
                height: self.height as i32,
                grid: self.grid_size as i32,
            },
            initial_period_ms: self.speed_ms,
            theme: self.theme,
            wall_mode: self.walls,
            wall_count: self.wall_count as usize,
        };
        config.validate()?;
        Ok(config)
    }
}
