//! Side-scroller core: one actor under gravity threading a queue of pipe pairs

pub mod state;
pub mod tick;

pub use state::{Actor, EndCause, Obstacle, ScrollerConfig, ScrollerSnapshot, ScrollerState};
pub use tick::{clock_tick, tick};
