//! Screen state machine
//!
//! Input adapters collapse raw key/click/touch events into the logical
//! operations here. Each runs to completion against a `GameState`; none of
//! them fail, invalid calls are simply ignored.

use super::state::{GameState, Screen};
use super::tick::is_on_target;
use crate::consts::*;
use crate::feedback::Feedback;
use crate::leaderboard::{LeaderboardEntry, RankRequest, RankResult};

/// What a single `activate` did
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Instructions dismissed, round started
    Started,
    /// Target hit
    Hit { score: u32 },
    /// Target missed, round over; a rank lookup should be issued
    Miss {
        score: u32,
        screen: Screen,
        request: RankRequest,
    },
    /// Nothing to do on this screen
    Ignored,
}

/// A validated name submission, ready to write to the store
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Store key; the submission timestamp in milliseconds
    pub key: String,
    pub entry: LeaderboardEntry,
    /// `GameState::round_generation` when the submission was made
    pub generation: u64,
}

/// A key press on the name entry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKey {
    Backspace,
    Char(char),
    Other,
}

impl NameKey {
    /// Map a DOM-style key name ("Backspace", "a", "Shift", ...)
    pub fn from_key(key: &str) -> Self {
        if key == "Backspace" {
            return NameKey::Backspace;
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => NameKey::Char(c),
            _ => NameKey::Other,
        }
    }
}

/// The main press/click/tap action
pub fn activate(state: &mut GameState, feedback: &impl Feedback) -> GameEvent {
    match state.screen {
        Screen::Instructions => {
            state.screen = Screen::Playing;
            log::info!("Round started");
            GameEvent::Started
        }
        Screen::Playing if is_on_target(state) => {
            feedback.play_hit();
            state.score += 1;
            state.dir = -state.dir;
            state.randomize_target();
            log::debug!("Hit! score {}", state.score);
            GameEvent::Hit { score: state.score }
        }
        Screen::Playing => {
            feedback.play_miss();
            let request = RankRequest {
                generation: state.next_round_generation(),
                score: state.score,
                identity: state.identity.clone(),
            };
            state.rank = None;
            state.confetti = false;
            state.screen = if state.score > QUALIFYING_SCORE {
                Screen::NameEntry
            } else {
                Screen::GameOver
            };
            log::info!("Round over with score {} -> {:?}", state.score, state.screen);
            GameEvent::Miss {
                score: state.score,
                screen: state.screen,
                request,
            }
        }
        Screen::GameOver | Screen::NameEntry => GameEvent::Ignored,
    }
}

/// Reset everything except identity and start playing
pub fn restart(state: &mut GameState) {
    state.screen = Screen::Playing;
    state.score = 0;
    state.ball_angle = 0.0;
    state.dir = INITIAL_DIR;
    state.particles.clear();
    state.name.clear();
    state.rank = None;
    state.confetti = false;
    state.show_leaderboard = false;
    state.board.clear();
    state.randomize_target();
    // Drop any rank lookup, submission or board fetch still in flight
    state.next_round_generation();
    state.next_board_generation();
    log::info!("Round restarted");
}

/// Apply a key to the name being typed. Returns true if the name changed.
pub fn edit_name(state: &mut GameState, key: NameKey) -> bool {
    if state.screen != Screen::NameEntry {
        return false;
    }
    match key {
        NameKey::Backspace => state.name.pop().is_some(),
        NameKey::Char(c) if state.name.chars().count() < MAX_NAME_LEN => {
            state.name.push(c);
            true
        }
        _ => false,
    }
}

/// Flip the overlay. Returns true if it is now shown.
pub fn toggle_leaderboard(state: &mut GameState) -> bool {
    state.show_leaderboard = !state.show_leaderboard;
    state.next_board_generation();
    state.show_leaderboard
}

/// Apply a fetched board if it belongs to the latest toggle and the overlay
/// is still shown
pub fn apply_board(state: &mut GameState, generation: u64, board: Vec<LeaderboardEntry>) -> bool {
    if generation != state.board_generation || !state.show_leaderboard {
        log::debug!(
            "Dropping stale board (generation {} vs {})",
            generation,
            state.board_generation
        );
        return false;
    }
    state.board = board;
    true
}

/// Check the name submission preconditions and build the record to store
///
/// Returns `None` if the submission should be silently skipped. The store
/// key is `now_ms`, so two submissions in the same millisecond share a key
/// and the later write replaces the earlier one.
pub fn prepare_submission(state: &GameState, name: &str, now_ms: u64) -> Option<Submission> {
    if state.screen != Screen::NameEntry {
        return None;
    }
    let identity = state.identity.as_ref()?;
    let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        return None;
    }
    let entry = LeaderboardEntry {
        name,
        score: state.score,
        timestamp: now_ms,
        identity: identity.clone(),
    };
    Some(Submission {
        key: now_ms.to_string(),
        entry,
        generation: state.round_generation,
    })
}

/// Finish a confirmed submission if its round is still the current one
pub fn complete_submission(state: &mut GameState, generation: u64) -> bool {
    if generation != state.round_generation || state.screen != Screen::NameEntry {
        log::debug!(
            "Dropping stale submission (generation {} vs {})",
            generation,
            state.round_generation
        );
        return false;
    }
    state.screen = Screen::GameOver;
    log::info!("Score submitted");
    true
}

/// Apply a resolved rank lookup if it is still the latest one
pub fn apply_rank(state: &mut GameState, generation: u64, result: RankResult) -> bool {
    if generation != state.round_generation || !state.round_over() {
        log::debug!(
            "Dropping stale rank result (generation {} vs {})",
            generation,
            state.round_generation
        );
        return false;
    }
    state.rank = Some(result.rank);
    state.confetti = result.confetti;
    true
}
