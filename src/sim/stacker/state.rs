//! Block-stacker run state, configuration and player moves

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::piece::{Piece, ShapeKind};
use crate::consts::*;
use crate::descent_interval_ms;
use crate::settings::SettingsError;
use crate::sim::RunPhase;
use crate::sim::rng::RandomSource;

/// Tunables for the block-stacker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackerConfig {
    pub width: usize,
    pub height: usize,
    /// Origin of every freshly spawned piece
    pub spawn_x: i32,
    pub spawn_y: i32,
    /// Points per cleared line before the level multiplier
    pub points_per_line: u32,
    /// Progress needed for one level-up
    pub level_progress_target: u32,
}

impl Default for StackerConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            points_per_line: POINTS_PER_LINE,
            level_progress_target: LEVEL_PROGRESS_TARGET,
        }
    }
}

impl StackerConfig {
    /// Every kind must fit at the spawn origin of an empty grid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!("grid {}x{} has no cells", self.width, self.height)));
        }
        if self.points_per_line == 0 || self.level_progress_target == 0 {
            return Err(invalid("points_per_line and level_progress_target must be non-zero"));
        }
        let empty = Grid::new(self.width, self.height);
        for kind in ShapeKind::ALL {
            if empty.collides(&Piece::new(kind, self.spawn_x, self.spawn_y)) {
                return Err(invalid(format!(
                    "{:?} piece does not fit at spawn ({}, {}) on a {}x{} grid",
                    kind, self.spawn_x, self.spawn_y, self.width, self.height
                )));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> SettingsError {
    SettingsError::Invalid(format!("stacker: {}", msg))
}

/// Read-only view handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackerSnapshot {
    pub phase: RunPhase,
    /// Settled cells with the active piece drawn in
    pub cells: Vec<Vec<Cell>>,
    pub score: u32,
    pub level: u32,
    /// Progress toward the next level, 0-100
    pub progress_percent: f32,
    pub lines_cleared: u32,
    pub descent_interval_ms: u32,
    pub game_over: bool,
}

/// Complete block-stacker run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackerState {
    pub(crate) config: StackerConfig,
    pub(crate) grid: Grid,
    /// Falling piece; absent before start and after a blocked spawn
    pub(crate) piece: Option<Piece>,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) progress: u32,
    pub(crate) lines_cleared: u32,
    pub(crate) phase: RunPhase,
}

impl StackerState {
    /// Create an idle state; nothing falls until `start`
    pub fn new(config: StackerConfig) -> Self {
        let grid = Grid::new(config.width, config.height);
        Self {
            config,
            grid,
            piece: None,
            score: 0,
            level: 1,
            progress: 0,
            lines_cleared: 0,
            phase: RunPhase::Ready,
        }
    }

    /// Empty the grid, reset counters and drop in the first piece
    pub fn start(&mut self, rng: &mut dyn RandomSource) {
        let config = self.config.clone();
        *self = Self::new(config);
        self.phase = RunPhase::Running;
        self.spawn_piece(rng);
    }

    pub fn restart(&mut self, rng: &mut dyn RandomSource) {
        self.start(rng);
    }

    /// Place a random piece at the spawn origin; a blocked spawn ends the run
    pub(crate) fn spawn_piece(&mut self, rng: &mut dyn RandomSource) -> bool {
        let kind = ShapeKind::random(rng);
        let piece = Piece::new(kind, self.config.spawn_x, self.config.spawn_y);
        if self.grid.collides(&piece) {
            self.piece = None;
            self.phase = RunPhase::GameOver;
            return false;
        }
        self.piece = Some(piece);
        true
    }

    /// Commit `candidate` when it fits; returns whether it was applied
    fn try_replace(&mut self, candidate: Piece) -> bool {
        if self.phase != RunPhase::Running || self.grid.collides(&candidate) {
            return false;
        }
        self.piece = Some(candidate);
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.piece.as_ref().map(|p| p.shifted(-1, 0)) {
            Some(candidate) => self.try_replace(candidate),
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.piece.as_ref().map(|p| p.shifted(1, 0)) {
            Some(candidate) => self.try_replace(candidate),
            None => false,
        }
    }

    pub fn rotate(&mut self) -> bool {
        match self.piece.as_ref().map(Piece::rotated) {
            Some(candidate) => self.try_replace(candidate),
            None => false,
        }
    }

    pub fn config(&self) -> &StackerConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    pub fn progress_percent(&self) -> f32 {
        self.progress as f32 * 100.0 / self.config.level_progress_target as f32
    }

    /// Current descent cadence for this level
    pub fn descent_interval_ms(&self) -> u32 {
        descent_interval_ms(self.level)
    }

    pub fn snapshot(&self) -> StackerSnapshot {
        StackerSnapshot {
            phase: self.phase,
            cells: self.grid.with_overlay(self.piece.as_ref()),
            score: self.score,
            level: self.level,
            progress_percent: self.progress_percent(),
            lines_cleared: self.lines_cleared,
            descent_interval_ms: self.descent_interval_ms(),
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedSource;

    /// Index 0 of `ShapeKind::ALL` is the I piece
    fn i_piece_rng() -> ScriptedSource {
        ScriptedSource::constant(0.0)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(StackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_spawn_outside_grid() {
        let config = StackerConfig {
            spawn_x: 8,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(&err, SettingsError::Invalid(msg) if msg.starts_with("stacker:")));
    }

    #[test]
    fn test_moves_before_start_are_noops() {
        let mut state = StackerState::new(StackerConfig::default());
        assert!(!state.move_left());
        assert!(!state.move_right());
        assert!(!state.rotate());
        assert!(state.piece().is_none());
    }

    #[test]
    fn test_start_spawns_at_origin() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);
        let piece = state.piece().cloned().unwrap();
        assert_eq!(piece.kind, ShapeKind::I);
        assert_eq!((piece.x, piece.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(state.level(), 1);
        assert_eq!(state.phase(), RunPhase::Running);
    }

    #[test]
    fn test_move_stops_at_walls() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);

        let mut lefts = 0;
        while state.move_left() {
            lefts += 1;
        }
        assert_eq!(lefts, SPAWN_X);
        assert_eq!(state.piece().map(|p| p.x), Some(0));

        let mut rights = 0;
        while state.move_right() {
            rights += 1;
        }
        // I piece is four wide
        assert_eq!(rights, GRID_WIDTH as i32 - 4);
    }

    #[test]
    fn test_rotate_blocked_by_floor_is_noop() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);
        // Horizontal I on the last row cannot stand up
        state.piece = Some(Piece::new(ShapeKind::I, 3, GRID_HEIGHT as i32 - 1));
        let before = state.piece().cloned();
        assert!(!state.rotate());
        assert_eq!(state.piece().cloned(), before);
    }

    #[test]
    fn test_rotate_blocked_by_settled_cell_is_noop() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);
        state.piece = Some(Piece::new(ShapeKind::I, 3, 5));
        // Vertical I would occupy column 3, rows 5..9
        state.grid.set(3, 7, Cell::Filled(ShapeKind::O));
        assert!(!state.rotate());
        state.grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
        assert!(state.rotate());
        assert_eq!(state.piece().map(|p| p.shape.height()), Some(4));
    }

    #[test]
    fn test_blocked_spawn_ends_run() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);
        state.grid.set(SPAWN_X as usize, SPAWN_Y as usize, Cell::Filled(ShapeKind::Z));
        assert!(!state.spawn_piece(&mut rng));
        assert!(state.is_game_over());
        assert!(state.piece().is_none());
        assert!(!state.move_left());
    }

    #[test]
    fn test_snapshot_overlays_piece() {
        let mut rng = i_piece_rng();
        let mut state = StackerState::new(StackerConfig::default());
        state.start(&mut rng);
        let snap = state.snapshot();
        assert_eq!(snap.cells.len(), GRID_HEIGHT);
        let filled = snap.cells.iter().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 4);
        assert_eq!(snap.descent_interval_ms, 1000);
        assert_eq!(snap.progress_percent, 0.0);
        assert!(!snap.game_over);
    }
}
