//! End-to-end round flow through the public session API

use orbit_hit::Session;
use orbit_hit::consts::INITIAL_DIR;
use orbit_hit::feedback::{RecordingFeedback, Signal};
use orbit_hit::identity::AnonymousIdentity;
use orbit_hit::leaderboard::{JsonFileStore, LeaderboardStore, MemoryStore};
use orbit_hit::sim::{GameEvent, NameKey, Screen, is_on_target};

/// Tick in small steps until the ball sits on (or off) the target
fn run_until<S, I>(session: &Session<S, I, RecordingFeedback>, on_target: bool)
where
    S: LeaderboardStore + 'static,
    I: orbit_hit::identity::IdentityProvider + 'static,
{
    for _ in 0..100_000 {
        if is_on_target(&session.state()) == on_target {
            return;
        }
        session.tick(4.0);
    }
    panic!("ball never reached the requested position");
}

#[test]
fn three_hits_then_qualifying_miss() {
    let session = Session::new(
        2024,
        MemoryStore::new(),
        AnonymousIdentity::new(5),
        RecordingFeedback::default(),
    );
    pollster::block_on(session.sign_in());

    assert_eq!(session.state().screen, Screen::Instructions);
    assert_eq!(session.activate().0, GameEvent::Started);
    assert_eq!(session.state().screen, Screen::Playing);

    for expected in 1..=3 {
        run_until(&session, true);
        let (event, task) = session.activate();
        assert_eq!(event, GameEvent::Hit { score: expected });
        assert!(task.is_none());
    }
    assert_eq!(session.state().score, 3);
    // Flipped three times from the start
    assert_eq!(session.state().dir, -INITIAL_DIR);

    session.shared_state().borrow_mut().score = 11;
    run_until(&session, false);
    let (event, task) = session.activate();
    assert!(matches!(event, GameEvent::Miss { score: 11, screen: Screen::NameEntry, .. }));
    assert_eq!(session.state().screen, Screen::NameEntry);
    let task = task.expect("rank lookup issued");

    pollster::block_on(task);
    assert_eq!(session.state().rank, Some(1));
    assert!(session.state().confetti);
    assert_eq!(
        session.feedback().signals(),
        vec![Signal::Hit, Signal::Hit, Signal::Hit, Signal::Miss, Signal::Celebrate]
    );
}

#[test]
fn submitted_score_lands_in_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");

    let session = Session::new(
        7,
        JsonFileStore::new(&path),
        AnonymousIdentity::new(8),
        RecordingFeedback::default(),
    );
    pollster::block_on(session.sign_in());
    session.activate();

    session.shared_state().borrow_mut().score = 25;
    run_until(&session, false);
    let task = session.activate().1.unwrap();
    pollster::block_on(task);

    for key in ["Backspace", "J", "o", "Shift", "e"] {
        session.edit_name(NameKey::from_key(key));
    }
    assert_eq!(session.state().name, "Joe");
    pollster::block_on(session.submit_typed_name().unwrap());
    assert_eq!(session.state().screen, Screen::GameOver);

    let snapshot = pollster::block_on(JsonFileStore::new(&path).read_once()).unwrap();
    assert_eq!(snapshot.len(), 1);
    let entry = snapshot.values().next().unwrap();
    assert_eq!(entry.name, "Joe");
    assert_eq!(entry.score, 25);
    assert_eq!(entry.timestamp.to_string(), *snapshot.keys().next().unwrap());

    // Restart keeps identity, clears the round
    let identity = session.state().identity.clone();
    session.restart();
    let state = session.state();
    assert_eq!(state.screen, Screen::Playing);
    assert_eq!(state.score, 0);
    assert!(state.particles.is_empty());
    assert_eq!(state.identity, identity);
}
