//! Fixed-step side-scroller tick
//!
//! One call advances physics by one 20 ms step. The elapsed-time clock is a
//! separate entry point driven by its own 1 s interval.

use super::state::{EndCause, Obstacle, ScrollerState};
use crate::sim::collision::overlaps_any;
use crate::sim::RunPhase;
use crate::sim::rng::RandomSource;

/// Advance actor physics and the obstacle queue by one step
pub fn tick(state: &mut ScrollerState, rng: &mut dyn RandomSource) {
    if state.phase != RunPhase::Running {
        return;
    }
    state.ticks += 1;

    // Integrate position with the old velocity, then apply gravity
    state.actor.y += state.actor.velocity;
    state.actor.velocity += state.config.gravity;

    if state.actor.y < 0.0 || state.actor.y > state.config.max_actor_y() {
        log::trace!("actor left playfield at y={:.1}", state.actor.y);
        state.end(EndCause::Boundary);
        return;
    }

    scroll_obstacles(state);
    spawn_obstacle(state, rng);
    drop_offscreen(state);

    if actor_hits_obstacle(state) {
        state.end(EndCause::Obstacle);
    }
}

/// Advance the elapsed-time counter by one second
pub fn clock_tick(state: &mut ScrollerState) {
    if state.phase == RunPhase::Running {
        state.elapsed_secs += 1;
    }
}

/// Move every pair left and award a point when one clears the lane
fn scroll_obstacles(state: &mut ScrollerState) {
    let width = state.config.obstacle_width;
    let lane = state.config.lane_x;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= state.config.scroll_speed;
        if !obstacle.passed && obstacle.trailing_edge(width) < lane {
            obstacle.passed = true;
            state.score += 1;
        }
    }
}

fn spawn_obstacle(state: &mut ScrollerState, rng: &mut dyn RandomSource) {
    let right_edge = state.config.playfield_width;
    let due = match state.obstacles.back() {
        Some(tail) => right_edge - tail.x > state.config.spawn_distance,
        None => true,
    };
    if due {
        let obstacle = Obstacle::spawn(&state.config, right_edge, rng);
        state.obstacles.push_back(obstacle);
    }
}

fn drop_offscreen(state: &mut ScrollerState) {
    let width = state.config.obstacle_width;
    while let Some(head) = state.obstacles.front() {
        if head.trailing_edge(width) < 0.0 {
            state.obstacles.pop_front();
        } else {
            break;
        }
    }
}

fn actor_hits_obstacle(state: &ScrollerState) -> bool {
    let actor = state.actor.rect(&state.config);
    state.obstacles.iter().any(|o| {
        overlaps_any(
            &actor,
            &[o.top_rect(&state.config), o.bottom_rect(&state.config)],
        )
    })
}
