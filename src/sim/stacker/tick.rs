//! Gravity step for the block-stacker
//!
//! Runs at the level-dependent descent cadence and on every soft-drop input.

use super::state::StackerState;
use crate::sim::RunPhase;
use crate::sim::rng::RandomSource;

/// What a single descent step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running; nothing changed
    Idle,
    /// Piece moved down one row
    Fell,
    /// Piece locked, `lines` rows cleared, next piece spawned
    Locked { lines: u32, leveled_up: bool },
    /// Piece locked and the next spawn was blocked
    ToppedOut { lines: u32 },
}

/// Move the piece down one row, or lock it and spawn the next
pub fn tick(state: &mut StackerState, rng: &mut dyn RandomSource) -> StepOutcome {
    if state.phase != RunPhase::Running {
        return StepOutcome::Idle;
    }
    let Some(piece) = state.piece.take() else {
        return StepOutcome::Idle;
    };

    let candidate = piece.shifted(0, 1);
    if !state.grid.collides(&candidate) {
        state.piece = Some(candidate);
        return StepOutcome::Fell;
    }

    state.grid.merge(&piece);
    let lines = state.grid.clear_full_rows();
    let leveled_up = award_lines(state, lines);

    if state.spawn_piece(rng) {
        StepOutcome::Locked { lines, leveled_up }
    } else {
        StepOutcome::ToppedOut { lines }
    }
}

/// Soft drop: one descent step on demand
pub fn move_down(state: &mut StackerState, rng: &mut dyn RandomSource) -> StepOutcome {
    tick(state, rng)
}

/// Score `lines × points × level`, feed progress, and level up at the target
fn award_lines(state: &mut StackerState, lines: u32) -> bool {
    if lines == 0 {
        return false;
    }
    // Large configured point values pin at u32::MAX instead of wrapping
    let gained = lines
        .saturating_mul(state.config.points_per_line)
        .saturating_mul(state.level);
    state.score = state.score.saturating_add(gained);
    state.lines_cleared = state.lines_cleared.saturating_add(lines);
    state.progress = state.progress.saturating_add(gained);

    if state.progress >= state.config.level_progress_target {
        state.level = state.level.saturating_add(1);
        state.progress = 0;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rng::{ScriptedSource, SeededRng};
    use crate::sim::stacker::{Cell, Grid, Piece, ShapeKind, StackerConfig};

    fn started(rng: &mut dyn RandomSource) -> StackerState {
        let mut state = StackerState::new(StackerConfig::default());
        state.start(rng);
        state
    }

    /// Bottom row full except columns 4..=5, O piece resting right above the gap
    fn one_line_setup() -> (StackerState, ScriptedSource) {
        // 1/7 picks the O piece for every spawn
        let mut rng = ScriptedSource::constant(1.5 / 7.0);
        let mut state = started(&mut rng);
        let bottom = GRID_HEIGHT - 1;
        for x in 0..GRID_WIDTH {
            if x != 4 && x != 5 {
                state.grid.set(x, bottom, Cell::Filled(ShapeKind::I));
            }
        }
        state.piece = Some(Piece::new(ShapeKind::O, 4, GRID_HEIGHT as i32 - 2));
        (state, rng)
    }

    #[test]
    fn test_tick_moves_piece_down() {
        let mut rng = ScriptedSource::constant(0.0);
        let mut state = started(&mut rng);
        assert_eq!(tick(&mut state, &mut rng), StepOutcome::Fell);
        assert_eq!(state.piece().map(|p| p.y), Some(SPAWN_Y + 1));
    }

    #[test]
    fn test_lock_clears_line_and_scores() {
        let (mut state, mut rng) = one_line_setup();
        let rows_before = state.grid().rows().len();

        let outcome = tick(&mut state, &mut rng);
        assert_eq!(outcome, StepOutcome::Locked { lines: 1, leveled_up: false });
        assert_eq!(state.grid().rows().len(), rows_before);
        assert_eq!(state.grid().full_row_count(), 0);
        assert_eq!(state.score(), 10);
        assert_eq!(state.lines_cleared(), 1);
        assert_eq!(state.progress(), 10);
        // Upper half of the O dropped into the bottom row
        let bottom = GRID_HEIGHT as i32 - 1;
        assert_eq!(state.grid().get(4, bottom), Some(Cell::Filled(ShapeKind::O)));
        assert_eq!(state.grid().get(0, bottom), Some(Cell::Empty));
        // Fresh piece back at the spawn origin
        assert_eq!(state.piece().map(|p| (p.x, p.y)), Some((SPAWN_X, SPAWN_Y)));
    }

    #[test]
    fn test_pre_filled_row_is_cleared_on_lock() {
        let mut rng = ScriptedSource::constant(1.5 / 7.0);
        let mut state = started(&mut rng);
        state.grid.fill_row(GRID_HEIGHT - 1, ShapeKind::L);
        state.piece = Some(Piece::new(ShapeKind::O, 0, GRID_HEIGHT as i32 - 3));

        let level = state.level();
        let outcome = tick(&mut state, &mut rng);
        assert_eq!(outcome, StepOutcome::Locked { lines: 1, leveled_up: false });
        assert_eq!(state.grid().full_row_count(), 0);
        assert_eq!(state.grid().rows().len(), GRID_HEIGHT);
        assert_eq!(state.score(), 10 * level);
    }

    #[test]
    fn test_score_scales_with_level() {
        let (mut state, mut rng) = one_line_setup();
        state.level = 3;
        tick(&mut state, &mut rng);
        assert_eq!(state.score(), 30);
    }

    #[test]
    fn test_level_up_resets_progress() {
        let (mut state, mut rng) = one_line_setup();
        state.progress = 95;
        let outcome = tick(&mut state, &mut rng);
        assert_eq!(outcome, StepOutcome::Locked { lines: 1, leveled_up: true });
        assert_eq!(state.level(), 2);
        assert_eq!(state.progress(), 0);
        assert_eq!(state.descent_interval_ms(), 900);
    }

    #[test]
    fn test_huge_line_points_saturate_score() {
        let (mut state, mut rng) = one_line_setup();
        state.config.points_per_line = 2_000_000_000;

        let first = tick(&mut state, &mut rng);
        assert_eq!(first, StepOutcome::Locked { lines: 1, leveled_up: true });
        assert_eq!(state.score(), 2_000_000_000);
        assert_eq!(state.level(), 2);

        // Second clear at level 2 would overflow both the gain and the score
        let bottom = GRID_HEIGHT - 1;
        state.grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
        for x in 0..GRID_WIDTH {
            if x != 4 && x != 5 {
                state.grid.set(x, bottom, Cell::Filled(ShapeKind::I));
            }
        }
        state.piece = Some(Piece::new(ShapeKind::O, 4, GRID_HEIGHT as i32 - 2));
        let second = tick(&mut state, &mut rng);
        assert_eq!(second, StepOutcome::Locked { lines: 1, leveled_up: true });
        assert_eq!(state.score(), u32::MAX);
        assert_eq!(state.level(), 3);
        assert_eq!(state.progress(), 0);
        assert_eq!(state.lines_cleared(), 2);
    }

    #[test]
    fn test_lock_without_lines_keeps_counters() {
        let mut rng = ScriptedSource::constant(1.5 / 7.0);
        let mut state = started(&mut rng);
        state.piece = Some(Piece::new(ShapeKind::O, 0, GRID_HEIGHT as i32 - 2));
        let outcome = tick(&mut state, &mut rng);
        assert_eq!(outcome, StepOutcome::Locked { lines: 0, leveled_up: false });
        assert_eq!(state.score(), 0);
        assert_eq!(state.progress(), 0);
        assert_eq!(state.grid().get(0, GRID_HEIGHT as i32 - 1), Some(Cell::Filled(ShapeKind::O)));
    }

    #[test]
    fn test_blocked_spawn_after_lock_tops_out() {
        let mut rng = ScriptedSource::constant(1.5 / 7.0);
        let mut state = started(&mut rng);
        // Column under the spawn origin filled to row 2
        for y in 2..GRID_HEIGHT {
            state.grid.set(SPAWN_X as usize, y, Cell::Filled(ShapeKind::I));
            state.grid.set(SPAWN_X as usize + 1, y, Cell::Filled(ShapeKind::I));
        }
        // O lands on top of the column and fills the spawn rows
        let outcome = tick(&mut state, &mut rng);
        assert_eq!(outcome, StepOutcome::ToppedOut { lines: 0 });
        assert!(state.is_game_over());
        assert!(state.piece().is_none());
        assert_eq!(tick(&mut state, &mut rng), StepOutcome::Idle);
    }

    #[test]
    fn test_move_down_matches_tick() {
        let mut a_rng = SeededRng::new(11);
        let mut b_rng = SeededRng::new(11);
        let mut a = started(&mut a_rng);
        let mut b = started(&mut b_rng);
        for _ in 0..200 {
            let x = tick(&mut a, &mut a_rng);
            let y = move_down(&mut b, &mut b_rng);
            assert_eq!(x, y);
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_settled_and_active_never_overlap() {
        let mut rng = SeededRng::new(2024);
        let mut state = started(&mut rng);
        for i in 0..3000 {
            if state.is_game_over() {
                break;
            }
            match i % 5 {
                0 => {
                    state.move_left();
                }
                1 => {
                    state.rotate();
                }
                2 => {
                    state.move_right();
                }
                _ => {}
            }
            tick(&mut state, &mut rng);
            if let Some(piece) = state.piece() {
                assert!(!state.grid().collides(piece));
            }
        }
        assert!(state.is_game_over());
    }

    #[test]
    fn test_restart_clears_grid() {
        let (mut state, mut rng) = one_line_setup();
        tick(&mut state, &mut rng);
        state.restart(&mut rng);
        assert_eq!(state.grid(), &Grid::new(GRID_WIDTH, GRID_HEIGHT));
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.progress(), 0);
    }
}
