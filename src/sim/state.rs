//! Game state and core simulation types
//!
//! A single `GameState` value is threaded through every operation; nothing
//! here is global.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use crate::consts::*;
use crate::leaderboard::LeaderboardEntry;

/// Current top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Waiting for the first press
    #[default]
    Instructions,
    /// Ball orbiting, presses are scored
    Playing,
    /// Round over, restart available
    GameOver,
    /// Round qualified for the leaderboard, typing a name
    NameEntry,
}

/// Trail sample left behind by the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Seconds since the particle was spawned
    pub age: f32,
    /// Ball angle at spawn time
    pub angle: f32,
}

impl Particle {
    pub fn new(angle: f32) -> Self {
        Self { age: 0.0, angle }
    }

    /// Remaining life in [0, 1] (1 = just spawned)
    pub fn fade(&self) -> f32 {
        (1.0 - self.age / PARTICLE_MAX_AGE).clamp(0.0, 1.0)
    }

    /// Draw radius, shrinking with age
    pub fn radius(&self) -> f32 {
        BALL_RADIUS * self.fade()
    }

    pub fn visible(&self) -> bool {
        self.radius() > MIN_PARTICLE_RADIUS
    }

    pub fn expired(&self) -> bool {
        self.age > PARTICLE_MAX_AGE
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub screen: Screen,
    /// Hits landed this round
    pub score: u32,
    /// Ball angle in radians (accumulates, never wrapped)
    pub ball_angle: f32,
    /// Angular direction, +1 or -1
    pub dir: i8,
    /// Target angle in [0, 2π)
    pub target_angle: f32,
    /// Trail samples, oldest first
    pub particles: Vec<Particle>,
    /// Anonymous player id, set once sign-in resolves
    pub identity: Option<String>,
    /// Name being typed on the name entry screen
    pub name: String,
    /// Leaderboard position of the last finished round
    pub rank: Option<usize>,
    /// Whether the last finished round earned a celebration
    pub confetti: bool,
    /// Leaderboard overlay toggle (independent of `screen`)
    pub show_leaderboard: bool,
    /// Cached top entries for the overlay
    pub board: Vec<LeaderboardEntry>,
    /// Bumped when a round ends or restarts; stale rank and submission
    /// results are dropped
    pub round_generation: u64,
    /// Bumped on every overlay toggle and restart; stale board fetches are dropped
    pub board_generation: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state on the instructions screen
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            screen: Screen::Instructions,
            score: 0,
            ball_angle: 0.0,
            dir: INITIAL_DIR,
            target_angle: 0.0,
            particles: Vec::new(),
            identity: None,
            name: String::new(),
            rank: None,
            confetti: false,
            show_leaderboard: false,
            board: Vec::new(),
            round_generation: 0,
            board_generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.randomize_target();
        state
    }

    /// Pick a new target uniformly over [0, 2π)
    pub fn randomize_target(&mut self) {
        self.target_angle = self.rng.random_range(0.0..TAU);
    }

    /// Invalidate any rank lookup or submission still in flight
    pub fn next_round_generation(&mut self) -> u64 {
        self.round_generation += 1;
        self.round_generation
    }

    /// Invalidate any board fetch still in flight
    pub fn next_board_generation(&mut self) -> u64 {
        self.board_generation += 1;
        self.board_generation
    }

    /// True once the round has ended (leaderboard feedback is meaningful)
    pub fn round_over(&self) -> bool {
        matches!(self.screen, Screen::GameOver | Screen::NameEntry)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}
