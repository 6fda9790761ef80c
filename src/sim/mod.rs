//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Ticks are driven from outside, one call per fixed step
//! - Randomness only through a `RandomSource`
//! - No rendering, timers or platform dependencies

pub mod collision;
pub mod rng;
pub mod scroller;
pub mod stacker;

pub use collision::Rect;
pub use rng::{RandomSource, RngState, ScriptedSource, SeededRng};
pub use scroller::{Actor, EndCause, Obstacle, ScrollerConfig, ScrollerSnapshot, ScrollerState};
pub use stacker::{
    Cell, Grid, Piece, Shape, ShapeKind, StackerConfig, StackerSnapshot, StackerState, StepOutcome,
};

use serde::{Deserialize, Serialize};

/// Lifecycle of a single run, shared by both games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Nothing started yet, inputs are ignored
    #[default]
    Ready,
    /// Active gameplay
    Running,
    /// Run ended
    GameOver,
}
