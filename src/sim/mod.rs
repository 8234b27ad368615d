//! Game simulation module
//!
//! All gameplay logic lives here. Operations take the `GameState` explicitly
//! and have no rendering or platform dependencies; sounds and celebrations go
//! through the injected `Feedback`.

pub mod input;
pub mod state;
pub mod tick;

pub use input::{
    GameEvent, NameKey, Submission, activate, apply_board, apply_rank, complete_submission,
    edit_name, prepare_submission, restart, toggle_leaderboard,
};
pub use state::{GameState, Particle, Screen};
pub use tick::{ball_speed, is_on_target, tick};
