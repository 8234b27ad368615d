//! Orbit Hit - a one-button ring reflex game
//!
//! Core modules:
//! - `sim`: Game state, per-frame simulation and the screen state machine
//! - `leaderboard`: Rank computation and the score store boundary
//! - `identity`: Anonymous player identity
//! - `feedback`: Sound/celebration triggers
//! - `session`: Single-threaded driver wiring state to collaborators
//! - `settings`: Player preferences

pub mod feedback;
pub mod identity;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{LocalTask, Session, now_unix_ms};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Angular speed at score 0 (radians per millisecond)
    pub const START_SPEED: f32 = 0.004;
    /// Asymptotic upper bound on angular speed (radians per millisecond)
    pub const MAX_SPEED: f32 = 0.012;
    /// How quickly speed eases toward `MAX_SPEED` per point scored
    pub const SPEED_EASING: f32 = 0.01;

    /// Ring geometry in the 100x100 game space
    pub const RING_CENTER: Vec2 = Vec2::new(50.0, 50.0);
    pub const RING_RADIUS: f32 = 40.0;

    /// Ball and target visual radius
    pub const BALL_RADIUS: f32 = 5.0;

    /// Particle lifetime in seconds
    pub const PARTICLE_MAX_AGE: f32 = 0.1;
    /// Particles drawn smaller than this are invisible
    pub const MIN_PARTICLE_RADIUS: f32 = 1.0;

    /// Score a round must exceed to enter a name / earn confetti
    pub const QUALIFYING_SCORE: u32 = 10;
    /// Maximum characters in a leaderboard name
    pub const MAX_NAME_LEN: usize = 10;
    /// Size of the celebratory band and the displayed board
    pub const LEADERBOARD_SIZE: usize = 10;

    /// Ball direction at the start of every round
    pub const INITIAL_DIR: i8 = -1;
}

/// Position on the ring for an angle (radians, unbounded)
#[inline]
pub fn angle_to_pos(angle: f32) -> Vec2 {
    consts::RING_CENTER + consts::RING_RADIUS * Vec2::new(angle.cos(), angle.sin())
}

/// Straight-line distance between two points on the ring
#[inline]
pub fn chord_distance(a: f32, b: f32) -> f32 {
    angle_to_pos(a).distance(angle_to_pos(b))
}
