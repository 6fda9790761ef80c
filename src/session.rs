//! Run sessions
//!
//! A session owns one run of a game together with the interval handles that
//! drive it. The host calls `advance` with wall-clock milliseconds; the
//! session turns that into fixed ticks. Ending a run cancels every interval
//! the session owns, and starting again re-arms the same handles, so a run
//! can never be driven by two schedulers at once.

use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::rng::{RandomSource, SeededRng};
use crate::sim::scroller::{self, ScrollerSnapshot, ScrollerState};
use crate::sim::stacker::{self, StackerSnapshot, StackerState, StepOutcome};
use crate::sim::RunPhase;

/// A fixed-period scheduler handle with explicit start/cancel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    period_ms: u32,
    accumulated_ms: u32,
    active: bool,
    max_catchup: u32,
}

impl Interval {
    /// A cancelled interval; call `start` to arm it
    pub fn new(period_ms: u32, max_catchup: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
            active: false,
            max_catchup: max_catchup.max(1),
        }
    }

    pub fn start(&mut self) {
        self.accumulated_ms = 0;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.accumulated_ms = 0;
        self.active = false;
    }

    /// Change the period; time already accumulated carries over
    pub fn set_period(&mut self, period_ms: u32) {
        self.period_ms = period_ms.max(1);
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Add elapsed time and return how many ticks are due
    pub fn advance(&mut self, dt_ms: u32) -> u32 {
        if !self.active {
            return 0;
        }
        let total = self.accumulated_ms.saturating_add(dt_ms);
        let due = total / self.period_ms;
        self.accumulated_ms = total % self.period_ms;
        if due > self.max_catchup {
            log::warn!(
                "interval {}ms fell behind, dropping {} ticks",
                self.period_ms,
                due - self.max_catchup
            );
            return self.max_catchup;
        }
        due
    }
}

/// Side-scroller inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollerInput {
    Jump,
    DropFaster,
    Start,
    Restart,
}

impl ScrollerInput {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "ArrowUp" | "w" | "W" => Some(ScrollerInput::Jump),
            "ArrowDown" | "s" | "S" => Some(ScrollerInput::DropFaster),
            "Enter" => Some(ScrollerInput::Start),
            "r" | "R" => Some(ScrollerInput::Restart),
            _ => None,
        }
    }
}

/// Block-stacker inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackerInput {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Start,
    Restart,
}

impl StackerInput {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(StackerInput::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(StackerInput::MoveRight),
            "ArrowDown" | "s" | "S" => Some(StackerInput::MoveDown),
            "ArrowUp" | "w" | "W" | " " => Some(StackerInput::Rotate),
            "Enter" => Some(StackerInput::Start),
            "r" | "R" => Some(StackerInput::Restart),
            _ => None,
        }
    }
}

/// One side-scroller run plus its physics and clock intervals
pub struct ScrollerSession<R: RandomSource = SeededRng> {
    state: ScrollerState,
    rng: R,
    physics: Interval,
    clock: Interval,
}

impl ScrollerSession<SeededRng> {
    pub fn seeded(settings: &Settings, seed: u64) -> Self {
        Self::new(settings, SeededRng::new(seed))
    }
}

impl<R: RandomSource> ScrollerSession<R> {
    pub fn new(settings: &Settings, rng: R) -> Self {
        Self {
            state: ScrollerState::new(settings.scroller.clone()),
            rng,
            physics: Interval::new(PHYSICS_TICK_MS, settings.max_catchup_ticks),
            clock: Interval::new(CLOCK_TICK_MS, settings.max_catchup_ticks),
        }
    }

    /// Begin a run unless one is already in progress
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.begin();
    }

    /// Throw away the current run and begin a new one
    pub fn restart(&mut self) {
        self.begin();
    }

    fn begin(&mut self) {
        self.state.start(&mut self.rng);
        self.physics.start();
        self.clock.start();
        log::info!("Side-scroller run started");
    }

    fn stop(&mut self) {
        self.physics.cancel();
        self.clock.cancel();
        log::info!(
            "Side-scroller over: score {}, {}s, hit {}",
            self.state.score(),
            self.state.elapsed_secs(),
            self.state.cause().map(|c| c.as_str()).unwrap_or("nothing")
        );
    }

    pub fn handle(&mut self, input: ScrollerInput) {
        match input {
            ScrollerInput::Jump => self.state.jump(),
            ScrollerInput::DropFaster => self.state.drop_faster(),
            ScrollerInput::Start => self.start(),
            ScrollerInput::Restart => self.restart(),
        }
    }

    /// Feed wall-clock time; returns the number of physics ticks run
    pub fn advance(&mut self, dt_ms: u32) -> u32 {
        let due = self.physics.advance(dt_ms);
        let mut ran = 0;
        for _ in 0..due {
            scroller::tick(&mut self.state, &mut self.rng);
            ran += 1;
            if self.state.is_game_over() {
                self.stop();
                return ran;
            }
        }
        for _ in 0..self.clock.advance(dt_ms) {
            scroller::clock_tick(&mut self.state);
        }
        ran
    }

    pub fn is_running(&self) -> bool {
        self.state.phase() == RunPhase::Running
    }

    pub fn state(&self) -> &ScrollerState {
        &self.state
    }

    pub fn physics_interval(&self) -> &Interval {
        &self.physics
    }

    pub fn clock_interval(&self) -> &Interval {
        &self.clock
    }

    pub fn snapshot(&self) -> ScrollerSnapshot {
        self.state.snapshot()
    }
}

/// One block-stacker run plus its descent interval
pub struct StackerSession<R: RandomSource = SeededRng> {
    state: StackerState,
    rng: R,
    descent: Interval,
}

impl StackerSession<SeededRng> {
    pub fn seeded(settings: &Settings, seed: u64) -> Self {
        Self::new(settings, SeededRng::new(seed))
    }
}

impl<R: RandomSource> StackerSession<R> {
    pub fn new(settings: &Settings, rng: R) -> Self {
        let state = StackerState::new(settings.stacker.clone());
        let descent = Interval::new(state.descent_interval_ms(), settings.max_catchup_ticks);
        Self { state, rng, descent }
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.begin();
    }

    pub fn restart(&mut self) {
        self.begin();
    }

    fn begin(&mut self) {
        self.state.start(&mut self.rng);
        self.descent.set_period(self.state.descent_interval_ms());
        self.descent.start();
        if self.state.is_game_over() {
            // Spawn area blocked by a configuration that barely fits
            self.stop();
            return;
        }
        log::info!("Block-stacker run started");
    }

    fn stop(&mut self) {
        self.descent.cancel();
        log::info!(
            "Block-stacker over: score {}, level {}, {} lines",
            self.state.score(),
            self.state.level(),
            self.state.lines_cleared()
        );
    }

    pub fn handle(&mut self, input: StackerInput) {
        match input {
            StackerInput::MoveLeft => {
                self.state.move_left();
            }
            StackerInput::MoveRight => {
                self.state.move_right();
            }
            StackerInput::Rotate => {
                self.state.rotate();
            }
            StackerInput::MoveDown => {
                let outcome = stacker::move_down(&mut self.state, &mut self.rng);
                self.after_step(outcome);
            }
            StackerInput::Start => self.start(),
            StackerInput::Restart => self.restart(),
        }
    }

    /// Feed wall-clock time; returns the number of descent steps run
    pub fn advance(&mut self, dt_ms: u32) -> u32 {
        let due = self.descent.advance(dt_ms);
        let mut ran = 0;
        for _ in 0..due {
            let outcome = stacker::tick(&mut self.state, &mut self.rng);
            ran += 1;
            self.after_step(outcome);
            if !self.descent.is_active() {
                break;
            }
        }
        ran
    }

    fn after_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Locked { lines, leveled_up } => {
                if lines > 0 {
                    log::debug!("Cleared {} lines, score {}", lines, self.state.score());
                }
                if leveled_up {
                    let period = self.state.descent_interval_ms();
                    self.descent.set_period(period);
                    log::info!("Level {} reached, descent every {}ms", self.state.level(), period);
                }
            }
            StepOutcome::ToppedOut { .. } => self.stop(),
            StepOutcome::Fell | StepOutcome::Idle => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.phase() == RunPhase::Running
    }

    pub fn state(&self) -> &StackerState {
        &self.state
    }

    pub fn descent_interval(&self) -> &Interval {
        &self.descent
    }

    pub fn snapshot(&self) -> StackerSnapshot {
        self.state.snapshot()
    }
}
