//! Per-frame simulation tick
//!
//! Advances the ball, ages the trail and answers the hit test. Frame deltas
//! are taken as-is: there is no clamping or sub-stepping, so a long stall
//! (backgrounded tab) can carry the ball straight past the target.

use super::state::{GameState, Particle, Screen};
use crate::chord_distance;
use crate::consts::*;

/// Angular speed (radians per millisecond) for a score
///
/// Starts at `START_SPEED` and eases toward `MAX_SPEED` without reaching it.
/// Computed in `f64` so consecutive scores stay distinct far beyond any
/// playable score.
pub fn ball_speed(score: u32) -> f64 {
    let start = f64::from(START_SPEED);
    let max = f64::from(MAX_SPEED);
    max - (max - start) / (1.0 + f64::from(score) * f64::from(SPEED_EASING))
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, dt_ms: f32) {
    if state.screen == Screen::Playing {
        let speed = ball_speed(state.score);
        state.ball_angle += (f64::from(dt_ms) * speed * f64::from(state.dir)) as f32;
        state.particles.push(Particle::new(state.ball_angle));
    }

    // Trail keeps fading on every screen
    let dt_secs = dt_ms / 1000.0;
    for particle in state.particles.iter_mut() {
        particle.age += dt_secs;
    }
    state.particles.retain(|p| !p.expired());
}

/// True when the ball overlaps the target
///
/// Compares straight-line distance between the two ring positions, not the
/// angular difference.
pub fn is_on_target(state: &GameState) -> bool {
    chord_distance(state.ball_angle, state.target_angle) < BALL_RADIUS * 2.0
}
