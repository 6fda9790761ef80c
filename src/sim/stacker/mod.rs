//! Block-stacker core: falling pieces on a fixed grid with line clears and levels

pub mod grid;
pub mod piece;
pub mod state;
pub mod tick;

pub use grid::{Cell, Grid};
pub use piece::{Piece, Shape, ShapeKind};
pub use state::{StackerConfig, StackerSnapshot, StackerState};
pub use tick::{StepOutcome, move_down, tick};
