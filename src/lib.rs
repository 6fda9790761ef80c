//! Productivity Arcade - arcade game cores behind a productivity tracker
//!
//! Core modules:
//! - `sim`: Deterministic game cores (side-scroller physics, block-stacker grid)
//! - `session`: Run sessions owning their tick intervals
//! - `tracker`: Task board, points, levels and game achievements
//! - `settings`: Engine and session configuration
//! - `web`: Browser bindings (wasm32 only)

pub mod session;
pub mod settings;
pub mod sim;
pub mod tracker;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::{Interval, ScrollerSession, StackerSession};
pub use settings::{Settings, SettingsError};
pub use tracker::{TaskBoard, TrackerError};

/// Game configuration constants
pub mod consts {
    /// Side-scroller physics tick (ms)
    pub const PHYSICS_TICK_MS: u32 = 20;
    /// Elapsed-time clock tick (ms)
    pub const CLOCK_TICK_MS: u32 = 1000;
    /// Maximum ticks one `advance` call may fire per interval
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Side-scroller playfield (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Actor box and its fixed horizontal lane
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;
    pub const ACTOR_LANE_X: f32 = 50.0;

    /// Downward acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -10.0;
    /// Velocity added by a fast drop
    pub const DROP_INCREMENT: f32 = 5.0;

    /// Obstacle pairs
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const SCROLL_SPEED: f32 = 3.0;
    pub const SPAWN_DISTANCE: f32 = 200.0;
    pub const GAP_MIN: f32 = 120.0;
    pub const GAP_MAX: f32 = 200.0;
    /// Minimum pipe length above and below a gap
    pub const GAP_MARGIN: f32 = 50.0;

    /// Block-stacker grid
    pub const GRID_WIDTH: usize = 10;
    pub const GRID_HEIGHT: usize = 20;
    /// Fixed spawn origin (column, row) of new pieces
    pub const SPAWN_X: i32 = 3;
    pub const SPAWN_Y: i32 = 0;

    /// Points per cleared line (multiplied by level)
    pub const POINTS_PER_LINE: u32 = 10;
    /// Progress needed for a level-up
    pub const LEVEL_PROGRESS_TARGET: u32 = 100;

    /// Descent interval bounds (ms)
    pub const BASE_DESCENT_MS: u32 = 1000;
    pub const MIN_DESCENT_MS: u32 = 100;
    pub const DESCENT_STEP_MS: u32 = 100;
}

/// Descent interval for a level: `max(100, 1000 - (level - 1) * 100)` ms
#[inline]
pub fn descent_interval_ms(level: u32) -> u32 {
    use consts::*;
    let speedup = level.saturating_sub(1).saturating_mul(DESCENT_STEP_MS);
    BASE_DESCENT_MS.saturating_sub(speedup).max(MIN_DESCENT_MS)
}
