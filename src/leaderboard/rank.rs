//! Rank computation
//!
//! Board order is score descending; equal scores go to the earlier
//! submission, then to the lower store key. The live (unsubmitted) score
//! sorts after every stored entry with the same score.

use std::cmp::Ordering;

use super::store::{LeaderboardStore, StoreError};
use super::{LeaderboardEntry, Snapshot};
use crate::consts::{LEADERBOARD_SIZE, QUALIFYING_SCORE};

/// Rank lookup issued when a round ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRequest {
    /// Matches `GameState::round_generation` at issue time
    pub generation: u64,
    pub score: u32,
    pub identity: Option<String>,
}

/// Where a score lands on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankResult {
    /// 1-based position
    pub rank: usize,
    pub confetti: bool,
}

/// Board ordering for two entries
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Rank a live score against a snapshot of the store
///
/// Falls back to last place when the player has no identity (or no entry on
/// the merged board matches it).
pub fn rank_score(snapshot: &Snapshot, score: u32, identity: Option<&str>) -> RankResult {
    // Snapshot iterates in key order, so the stable sorts settle any
    // remaining ties by key
    let mut board: Vec<&LeaderboardEntry> = snapshot.values().collect();
    board.sort_by(|a, b| compare_entries(a, b));

    let current = LeaderboardEntry {
        name: String::new(),
        score,
        timestamp: u64::MAX,
        identity: identity.unwrap_or_default().to_string(),
    };
    board.push(&current);
    board.sort_by(|a, b| compare_entries(a, b));

    let rank = identity
        .and_then(|id| {
            board
                .iter()
                .position(|e| e.identity == id && e.score == score)
        })
        .map(|i| i + 1)
        .unwrap_or(board.len());

    let confetti =
        score > QUALIFYING_SCORE && (rank <= LEADERBOARD_SIZE || snapshot.len() < LEADERBOARD_SIZE);

    RankResult { rank, confetti }
}

/// The best `limit` entries in board order
pub fn top_entries(snapshot: &Snapshot, limit: usize) -> Vec<LeaderboardEntry> {
    let mut board: Vec<LeaderboardEntry> = snapshot.values().cloned().collect();
    board.sort_by(compare_entries);
    board.truncate(limit);
    board
}

/// Read the store once and rank the request against it
pub async fn fetch_rank<S: LeaderboardStore>(
    store: &S,
    request: &RankRequest,
) -> Result<RankResult, StoreError> {
    let snapshot = store.read_once().await?;
    Ok(rank_score(
        &snapshot,
        request.score,
        request.identity.as_deref(),
    ))
}

/// Read the store once and return the displayed board
pub async fn fetch_board<S: LeaderboardStore>(store: &S) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let snapshot = store.read_once().await?;
    Ok(top_entries(&snapshot, LEADERBOARD_SIZE))
}
