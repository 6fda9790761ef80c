//! Side-scroller state and configuration
//!
//! Screen space: x grows to the right, y grows downward, the ground strip
//! occupies the bottom `ground_height` pixels of the playfield.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SettingsError;
use crate::sim::RunPhase;
use crate::sim::collision::Rect;
use crate::sim::rng::RandomSource;

/// Tunables for the side-scroller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollerConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub ground_height: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    /// Fixed x of the actor's collision box
    pub lane_x: f32,
    pub gravity: f32,
    /// Velocity set by `jump` (negative is up)
    pub jump_impulse: f32,
    /// Velocity added by `drop_faster`
    pub drop_increment: f32,
    pub obstacle_width: f32,
    pub scroll_speed: f32,
    /// Distance the tail obstacle must travel from the right edge before the next spawns
    pub spawn_distance: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    /// Minimum visible pipe length above and below the gap
    pub gap_margin: f32,
    /// Optional round length shown as a countdown (display only)
    pub time_limit_secs: Option<u32>,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            lane_x: ACTOR_LANE_X,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            drop_increment: DROP_INCREMENT,
            obstacle_width: OBSTACLE_WIDTH,
            scroll_speed: SCROLL_SPEED,
            spawn_distance: SPAWN_DISTANCE,
            gap_min: GAP_MIN,
            gap_max: GAP_MAX,
            gap_margin: GAP_MARGIN,
            time_limit_secs: None,
        }
    }
}

impl ScrollerConfig {
    /// Y of the ground surface
    #[inline]
    pub fn floor(&self) -> f32 {
        self.playfield_height - self.ground_height
    }

    /// Largest legal actor y (top edge of the actor box)
    #[inline]
    pub fn max_actor_y(&self) -> f32 {
        self.floor() - self.actor_height
    }

    /// Starting actor y, halfway down the legal range
    #[inline]
    pub fn start_y(&self) -> f32 {
        self.max_actor_y() / 2.0
    }

    /// Reject configurations the tick cannot honor
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("obstacle_width", self.obstacle_width),
            ("scroll_speed", self.scroll_speed),
            ("gap_min", self.gap_min),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive (got {})", name, value)));
            }
        }
        if self.ground_height < 0.0 || self.gravity < 0.0 || self.gap_margin < 0.0 {
            return Err(invalid("ground_height, gravity and gap_margin must not be negative"));
        }
        if self.max_actor_y() <= 0.0 {
            return Err(invalid("actor does not fit above the ground"));
        }
        if self.jump_impulse >= 0.0 {
            return Err(invalid(format!(
                "jump_impulse must be upward/negative (got {})",
                self.jump_impulse
            )));
        }
        if self.gap_min > self.gap_max {
            return Err(invalid(format!(
                "gap_min {} exceeds gap_max {}",
                self.gap_min, self.gap_max
            )));
        }
        if self.gap_max + 2.0 * self.gap_margin > self.floor() {
            return Err(invalid("gap_max plus margins does not fit between ceiling and ground"));
        }
        // Keeps at most one pair inside the actor's lane at a time
        if self.spawn_distance < self.obstacle_width + self.actor_width {
            return Err(invalid(format!(
                "spawn_distance {} must be at least obstacle_width + actor_width ({})",
                self.spawn_distance,
                self.obstacle_width + self.actor_width
            )));
        }
        if self.lane_x < 0.0 || self.lane_x + self.actor_width > self.playfield_width {
            return Err(invalid("actor lane lies outside the playfield"));
        }
        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> SettingsError {
    SettingsError::Invalid(format!("scroller: {}", msg))
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Actor box overlapped a pipe
    Obstacle,
    /// Actor left the vertical playfield
    Boundary,
}

impl EndCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndCause::Obstacle => "obstacle",
            EndCause::Boundary => "boundary",
        }
    }
}

/// The moving actor (only the vertical axis moves)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub y: f32,
    pub velocity: f32,
}

impl Actor {
    pub fn rect(&self, config: &ScrollerConfig) -> Rect {
        Rect::new(config.lane_x, self.y, config.actor_width, config.actor_height)
    }
}

/// A pipe pair with a gap between `gap_top` and `gap_bottom`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Bottom edge of the top pipe
    pub gap_top: f32,
    /// Top edge of the bottom pipe
    pub gap_bottom: f32,
    /// Set once the trailing edge crosses the lane
    pub passed: bool,
}

impl Obstacle {
    /// Spawn a pair at `x` with a random gap size and position
    pub fn spawn(config: &ScrollerConfig, x: f32, rng: &mut dyn RandomSource) -> Self {
        let gap_height = rng.next_range(config.gap_min, config.gap_max);
        let lowest_top = config.floor() - config.gap_margin - gap_height;
        let gap_top = rng.next_range(config.gap_margin, lowest_top);
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + gap_height,
            passed: false,
        }
    }

    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    pub fn top_rect(&self, config: &ScrollerConfig) -> Rect {
        Rect::new(self.x, 0.0, config.obstacle_width, self.gap_top)
    }

    pub fn bottom_rect(&self, config: &ScrollerConfig) -> Rect {
        Rect::new(
            self.x,
            self.gap_bottom,
            config.obstacle_width,
            config.floor() - self.gap_bottom,
        )
    }
}

/// Read-only view handed to the UI each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollerSnapshot {
    pub phase: RunPhase,
    pub actor_y: f32,
    pub actor_velocity: f32,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub elapsed_secs: u32,
    /// Countdown for timed rounds (display only)
    pub time_remaining: Option<u32>,
    pub game_over: bool,
    pub cause: Option<EndCause>,
}

/// Complete side-scroller run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollerState {
    pub(crate) config: ScrollerConfig,
    pub(crate) actor: Actor,
    /// Ordered by x, appended at the tail, dropped from the head
    pub(crate) obstacles: VecDeque<Obstacle>,
    pub(crate) score: u32,
    pub(crate) elapsed_secs: u32,
    pub(crate) phase: RunPhase,
    pub(crate) cause: Option<EndCause>,
    /// Physics ticks since start
    pub(crate) ticks: u64,
}

impl ScrollerState {
    /// Create an idle state; nothing moves until `start`
    pub fn new(config: ScrollerConfig) -> Self {
        let actor = Actor {
            y: config.start_y(),
            velocity: 0.0,
        };
        Self {
            config,
            actor,
            obstacles: VecDeque::new(),
            score: 0,
            elapsed_secs: 0,
            phase: RunPhase::Ready,
            cause: None,
            ticks: 0,
        }
    }

    /// Reset everything and begin a run with one fresh obstacle at the right edge
    pub fn start(&mut self, rng: &mut dyn RandomSource) {
        let config = self.config.clone();
        *self = Self::new(config);
        let first = Obstacle::spawn(&self.config, self.config.playfield_width, rng);
        self.obstacles.push_back(first);
        self.phase = RunPhase::Running;
    }

    /// Same as `start`; kept separate to mirror the input surface
    pub fn restart(&mut self, rng: &mut dyn RandomSource) {
        self.start(rng);
    }

    /// Override velocity with the jump impulse
    pub fn jump(&mut self) {
        if self.phase == RunPhase::Running {
            self.actor.velocity = self.config.jump_impulse;
        }
    }

    /// Add to the current downward velocity
    pub fn drop_faster(&mut self) {
        if self.phase == RunPhase::Running {
            self.actor.velocity += self.config.drop_increment;
        }
    }

    pub(crate) fn end(&mut self, cause: EndCause) {
        self.phase = RunPhase::GameOver;
        self.cause = Some(cause);
    }

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn obstacles(&self) -> impl ExactSizeIterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn cause(&self) -> Option<EndCause> {
        self.cause
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.config
            .time_limit_secs
            .map(|limit| limit.saturating_sub(self.elapsed_secs))
    }

    pub fn snapshot(&self) -> ScrollerSnapshot {
        ScrollerSnapshot {
            phase: self.phase,
            actor_y: self.actor.y,
            actor_velocity: self.actor.velocity,
            obstacles: self.obstacles.iter().copied().collect(),
            score: self.score,
            elapsed_secs: self.elapsed_secs,
            time_remaining: self.time_remaining(),
            game_over: self.is_game_over(),
            cause: self.cause,
        }
    }
}
