//! Single-threaded game session
//!
//! Owns the `GameState` and the collaborators, and turns the logical input
//! events into state changes. Work that waits on the store or on sign-in is
//! handed back as a `LocalTask` for the caller to spawn or poll; the screen
//! change it follows has already happened by then.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::feedback::Feedback;
use crate::identity::IdentityProvider;
use crate::leaderboard::{LeaderboardStore, RankRequest, fetch_board, fetch_rank};
use crate::sim::{self, GameEvent, GameState, NameKey};

/// Deferred work completing against the shared state
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Wall-clock milliseconds since the Unix epoch (0 if the clock is before it)
pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}

pub struct Session<S, I, F> {
    state: Rc<RefCell<GameState>>,
    store: Rc<S>,
    identity: Rc<I>,
    feedback: Rc<F>,
}

impl<S, I, F> Session<S, I, F>
where
    S: LeaderboardStore + 'static,
    I: IdentityProvider + 'static,
    F: Feedback + 'static,
{
    pub fn new(seed: u64, store: S, identity: I, feedback: F) -> Self {
        Self {
            state: Rc::new(RefCell::new(GameState::new(seed))),
            store: Rc::new(store),
            identity: Rc::new(identity),
            feedback: Rc::new(feedback),
        }
    }

    /// Read-only view for rendering
    pub fn state(&self) -> Ref<'_, GameState> {
        self.state.borrow()
    }

    /// Shared handle to the state (adapters and tests)
    pub fn shared_state(&self) -> Rc<RefCell<GameState>> {
        Rc::clone(&self.state)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Resolve the anonymous identity; on failure it stays unset
    pub fn sign_in(&self) -> LocalTask {
        let state = Rc::clone(&self.state);
        let identity = Rc::clone(&self.identity);
        Box::pin(async move {
            match identity.sign_in().await {
                Ok(id) => {
                    let mut state = state.borrow_mut();
                    if state.identity.is_none() {
                        state.identity = Some(id);
                    }
                }
                Err(e) => log::warn!("Sign-in failed, leaderboard submission disabled: {}", e),
            }
        })
    }

    /// Advance one frame
    pub fn tick(&self, dt_ms: f32) {
        sim::tick(&mut self.state.borrow_mut(), dt_ms);
    }

    /// Main press action; a miss also returns the rank lookup to run
    pub fn activate(&self) -> (GameEvent, Option<LocalTask>) {
        let event = sim::activate(&mut self.state.borrow_mut(), &*self.feedback);
        let task = match &event {
            GameEvent::Miss { request, .. } => Some(self.rank_task(request.clone())),
            _ => None,
        };
        (event, task)
    }

    pub fn restart(&self) {
        sim::restart(&mut self.state.borrow_mut());
    }

    pub fn edit_name(&self, key: NameKey) -> bool {
        sim::edit_name(&mut self.state.borrow_mut(), key)
    }

    /// Submit `name` for the finished round; `None` if the submission is not allowed
    pub fn submit_name(&self, name: &str) -> Option<LocalTask> {
        let submission = sim::prepare_submission(&self.state.borrow(), name, now_unix_ms())?;
        let state = Rc::clone(&self.state);
        let store = Rc::clone(&self.store);
        Some(Box::pin(async move {
            match store.write(&submission.key, &submission.entry).await {
                Ok(()) => {
                    sim::complete_submission(&mut state.borrow_mut(), submission.generation);
                }
                Err(e) => log::error!("Failed to submit score {}: {}", submission.entry.score, e),
            }
        }))
    }

    /// Submit whatever has been typed on the name entry screen
    pub fn submit_typed_name(&self) -> Option<LocalTask> {
        let name = self.state.borrow().name.clone();
        self.submit_name(&name)
    }

    /// Flip the leaderboard overlay; showing it also refreshes the board
    pub fn toggle_leaderboard(&self) -> Option<LocalTask> {
        let generation = {
            let mut state = self.state.borrow_mut();
            if !sim::toggle_leaderboard(&mut state) {
                return None;
            }
            state.board_generation
        };
        let state = Rc::clone(&self.state);
        let store = Rc::clone(&self.store);
        Some(Box::pin(async move {
            match fetch_board(&*store).await {
                Ok(board) => {
                    sim::apply_board(&mut state.borrow_mut(), generation, board);
                }
                Err(e) => log::warn!("Failed to load leaderboard: {}", e),
            }
        }))
    }

    fn rank_task(&self, request: RankRequest) -> LocalTask {
        let state = Rc::clone(&self.state);
        let store = Rc::clone(&self.store);
        let feedback = Rc::clone(&self.feedback);
        Box::pin(async move {
            let result = match fetch_rank(&*store, &request).await {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("Rank lookup failed: {}", e);
                    return;
                }
            };
            let applied = sim::apply_rank(&mut state.borrow_mut(), request.generation, result);
            if applied {
                log::info!("Ranked #{} (confetti: {})", result.rank, result.confetti);
                if result.confetti {
                    feedback.celebrate();
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{RecordingFeedback, Signal};
    use crate::identity::{AnonymousIdentity, FailingIdentity};
    use crate::leaderboard::{LeaderboardEntry, MemoryStore};
    use crate::sim::Screen;
    use pollster::block_on;

    type TestSession = Session<MemoryStore, AnonymousIdentity, RecordingFeedback>;

    fn session_with(entries: Vec<LeaderboardEntry>) -> TestSession {
        let session = Session::new(
            11,
            MemoryStore::from_entries(entries),
            AnonymousIdentity::new(1),
            RecordingFeedback::default(),
        );
        block_on(session.sign_in());
        session
    }

    fn finish_round(session: &TestSession, score: u32) -> Option<LocalTask> {
        {
            let mut state = session.state.borrow_mut();
            state.screen = Screen::Playing;
            state.score = score;
            state.ball_angle = state.target_angle + std::f32::consts::PI;
        }
        session.activate().1
    }

    fn stored(name: &str, score: u32, timestamp: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.into(),
            score,
            timestamp,
            identity: name.to_lowercase(),
        }
    }

    #[test]
    fn test_clock_is_unix_millis() {
        // 2020-01-01T00:00:00Z
        let first = now_unix_ms();
        assert!(first > 1_577_836_800_000);
        assert!(now_unix_ms() >= first);
    }

    #[test]
    fn test_sign_in_sets_identity() {
        let session = session_with(vec![]);
        assert!(session.state().identity.is_some());
    }

    #[test]
    fn test_failed_sign_in_disables_submission() {
        let session = Session::new(
            1,
            MemoryStore::new(),
            FailingIdentity,
            RecordingFeedback::default(),
        );
        block_on(session.sign_in());
        assert!(session.state().identity.is_none());

        session.state.borrow_mut().screen = Screen::NameEntry;
        assert!(session.submit_name("Ann").is_none());
        assert_eq!(session.state().screen, Screen::NameEntry);
    }

    #[test]
    fn test_miss_transitions_before_rank_resolves() {
        let session = session_with(vec![stored("A", 50, 1), stored("B", 80, 2)]);
        let task = finish_round(&session, 60).expect("rank task");

        assert_eq!(session.state().screen, Screen::NameEntry);
        assert_eq!(session.state().rank, None);

        block_on(task);
        assert_eq!(session.state().rank, Some(2));
        assert!(session.state().confetti);
        assert_eq!(
            session.feedback().signals(),
            vec![Signal::Miss, Signal::Celebrate]
        );
    }

    #[test]
    fn test_stale_rank_result_is_dropped() {
        let session = session_with(vec![stored("A", 50, 1)]);
        let first = finish_round(&session, 60).unwrap();
        session.restart();
        let second = finish_round(&session, 3).unwrap();

        block_on(second);
        block_on(first);
        let state = session.state();
        assert_eq!(state.rank, Some(2));
        assert!(!state.confetti);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_rank_after_restart_is_ignored() {
        let session = session_with(vec![]);
        let task = finish_round(&session, 20).unwrap();
        session.restart();
        block_on(task);
        assert_eq!(session.state().rank, None);
        assert!(!session.feedback().signals().contains(&Signal::Celebrate));
    }

    #[test]
    fn test_failed_rank_lookup_leaves_fields_unset() {
        let session = session_with(vec![]);
        session.store().set_unavailable(true);
        let task = finish_round(&session, 20).unwrap();
        block_on(task);
        assert_eq!(session.state().rank, None);
        assert!(!session.state().confetti);
        assert_eq!(session.state().screen, Screen::NameEntry);
    }

    #[test]
    fn test_submit_name_writes_and_finishes() {
        let session = session_with(vec![]);
        block_on(finish_round(&session, 15).unwrap());

        for c in "Zed".chars() {
            session.edit_name(NameKey::Char(c));
        }
        let task = session.submit_typed_name().expect("submission");
        assert_eq!(session.state().screen, Screen::NameEntry);
        block_on(task);

        assert_eq!(session.state().screen, Screen::GameOver);
        assert_eq!(session.store().len(), 1);
        let snapshot = block_on(session.store().read_once()).unwrap();
        let entry = snapshot.values().next().unwrap();
        assert_eq!(entry.name, "Zed");
        assert_eq!(entry.score, 15);
        assert_eq!(Some(&entry.identity), session.state().identity.as_ref());
    }

    #[test]
    fn test_blank_name_is_a_no_op() {
        let session = session_with(vec![]);
        block_on(finish_round(&session, 15).unwrap());
        assert!(session.submit_name("   ").is_none());
        assert_eq!(session.state().screen, Screen::NameEntry);
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_late_write_does_not_end_next_round() {
        let session = session_with(vec![]);
        block_on(finish_round(&session, 15).unwrap());
        let earlier = session.submit_name("Old").expect("submission");

        session.restart();
        block_on(finish_round(&session, 20).unwrap());
        assert_eq!(session.state().screen, Screen::NameEntry);

        block_on(earlier);
        let state = session.state();
        assert_eq!(state.screen, Screen::NameEntry);
        assert_eq!(state.score, 20);
        // The write itself still lands
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_name_entry() {
        let session = session_with(vec![]);
        block_on(finish_round(&session, 15).unwrap());
        session.store().set_unavailable(true);
        block_on(session.submit_name("Ann").unwrap());
        assert_eq!(session.state().screen, Screen::NameEntry);
    }

    #[test]
    fn test_toggle_leaderboard_loads_board() {
        let session = session_with(vec![stored("A", 50, 1), stored("B", 80, 2)]);
        let task = session.toggle_leaderboard().expect("board fetch");
        block_on(task);
        let names: Vec<String> = session.state().board.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["B", "A"]);

        assert!(session.toggle_leaderboard().is_none());
        assert!(!session.state().show_leaderboard);
        assert_eq!(session.state().screen, Screen::Instructions);
    }

    #[test]
    fn test_older_board_fetch_does_not_overwrite_newer() {
        let session = session_with(vec![stored("A", 50, 1)]);
        let older = session.toggle_leaderboard().expect("board fetch");
        assert!(session.toggle_leaderboard().is_none());
        let newer = session.toggle_leaderboard().expect("board fetch");
        block_on(newer);

        // The older fetch reads the store after this write
        block_on(session.store().write("2", &stored("B", 80, 2))).unwrap();
        block_on(older);
        let names: Vec<String> = session.state().board.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["A"]);
    }
}
