//! Orbit Hit headless runner
//!
//! Plays one round with a simple autopilot against a JSON leaderboard file:
//! presses whenever the ball overlaps the target until it has enough hits,
//! then presses off target to end the round.

use std::path::PathBuf;

use clap::Parser;

use orbit_hit::{Session, now_unix_ms};
use orbit_hit::feedback::{GatedFeedback, LogFeedback};
use orbit_hit::identity::AnonymousIdentity;
use orbit_hit::leaderboard::JsonFileStore;
use orbit_hit::settings::Settings;
use orbit_hit::sim::{GameEvent, Screen, is_on_target};

/// Give up on a round that never lines up
const MAX_FRAMES: u32 = 200_000;

#[derive(Parser)]
#[command(name = "orbit-hit")]
#[command(about = "Play a headless round of Orbit Hit against a local leaderboard")]
struct Args {
    /// Hits to land before deliberately missing
    #[arg(long, default_value_t = 12)]
    hits: u32,

    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file
    #[arg(long, default_value = "leaderboard.json")]
    board: PathBuf,

    /// Name to submit if the round qualifies
    #[arg(long, default_value = "AUTO")]
    name: String,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(now_unix_ms);
    log::info!("Orbit Hit starting with seed {}", seed);

    let settings = Settings::load(&args.settings);
    let session = Session::new(
        seed,
        JsonFileStore::new(&args.board),
        AnonymousIdentity::new(seed),
        GatedFeedback::new(LogFeedback, settings),
    );

    pollster::block_on(session.sign_in());
    session.activate();

    let mut rank_task = None;
    for _ in 0..MAX_FRAMES {
        session.tick(args.frame_ms);

        let (on_target, score) = {
            let state = session.state();
            (is_on_target(&state), state.score)
        };
        let wants_hit = score < args.hits;
        if on_target != wants_hit {
            continue;
        }
        match session.activate() {
            (GameEvent::Miss { .. }, task) => {
                rank_task = task;
                break;
            }
            (GameEvent::Hit { score }, _) => log::info!("Hit #{}", score),
            _ => {}
        }
    }

    let Some(task) = rank_task else {
        log::error!("Round did not finish within {} frames", MAX_FRAMES);
        std::process::exit(1);
    };
    pollster::block_on(task);

    if session.state().screen == Screen::NameEntry {
        match session.submit_name(&args.name) {
            Some(task) => pollster::block_on(task),
            None => log::warn!("Could not submit name {:?}", args.name),
        }
    }

    let state = session.state();
    println!("Final score: {}", state.score);
    match state.rank {
        Some(rank) => println!("Rank: #{}{}", rank, if state.confetti { " 🎉" } else { "" }),
        None => println!("Rank: unavailable"),
    }
    drop(state);

    if let Some(task) = session.toggle_leaderboard() {
        pollster::block_on(task);
    }
    for (i, entry) in session.state().board.iter().enumerate() {
        println!("{:>2}. {:<10} {}", i + 1, entry.name, entry.score);
    }
}
