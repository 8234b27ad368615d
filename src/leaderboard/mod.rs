//! Global leaderboard
//!
//! Entries live in a remote key-value store keyed by submission timestamp.
//! `rank` merges the live score into a snapshot of that store; `store` is the
//! read/write boundary.

pub mod rank;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use rank::{
    RankRequest, RankResult, compare_entries, fetch_board, fetch_rank, rank_score, top_entries,
};
pub use store::{JsonFileStore, LeaderboardStore, MemoryStore, StoreError};

/// A single stored leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) of the submission, also the store key
    pub timestamp: u64,
    /// Anonymous id of the submitting player
    pub identity: String,
}

/// One-shot read of the whole store, keyed by opaque store key
pub type Snapshot = BTreeMap<String, LeaderboardEntry>;
