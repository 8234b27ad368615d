//! Leaderboard store boundary
//!
//! The remote store is a key-value map read as a one-shot snapshot and
//! written one entry at a time. Futures here are single-threaded (`!Send`).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::{LeaderboardEntry, Snapshot};

/// Errors talking to the leaderboard store
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "leaderboard I/O error: {e}"),
            StoreError::Parse(e) => write!(f, "leaderboard data is malformed: {e}"),
            StoreError::Unavailable => write!(f, "leaderboard store unavailable"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Parse(e) => Some(e),
            StoreError::Unavailable => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

/// Read/write access to the score store
#[allow(async_fn_in_trait)]
pub trait LeaderboardStore {
    /// Snapshot of every stored entry
    async fn read_once(&self) -> Result<Snapshot, StoreError>;

    /// Store one entry under `key`
    ///
    /// Keys are submission timestamps in milliseconds. Writing to a key that
    /// already exists replaces its entry, so two submissions landing in the
    /// same millisecond keep only the later one.
    async fn write(&self, key: &str, entry: &LeaderboardEntry) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Snapshot>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with entries keyed by their timestamps
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|e| (e.timestamp.to_string(), e)),
        );
        store
    }

    /// Make every read and write fail (simulates losing the connection)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<LeaderboardEntry> {
        self.entries.borrow().get(key).cloned()
    }
}

impl LeaderboardStore for MemoryStore {
    async fn read_once(&self) -> Result<Snapshot, StoreError> {
        if self.unavailable.get() {
            return Err(StoreError::Unavailable);
        }
        Ok(self.entries.borrow().clone())
    }

    async fn write(&self, key: &str, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        if self.unavailable.get() {
            return Err(StoreError::Unavailable);
        }
        if self
            .entries
            .borrow_mut()
            .insert(key.to_string(), entry.clone())
            .is_some()
        {
            log::warn!("Replaced leaderboard entry {}", key);
        }
        Ok(())
    }
}

/// Store backed by a JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Snapshot::new());
        }
        Ok(serde_json::from_str(&json)?)
    }
}

impl LeaderboardStore for JsonFileStore {
    async fn read_once(&self) -> Result<Snapshot, StoreError> {
        let snapshot = self.load()?;
        log::debug!("Read {} leaderboard entries", snapshot.len());
        Ok(snapshot)
    }

    async fn write(&self, key: &str, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        let mut snapshot = self.load()?;
        if snapshot.insert(key.to_string(), entry.clone()).is_some() {
            log::warn!("Replaced leaderboard entry {}", key);
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)?;
        log::info!("Leaderboard saved ({} entries)", snapshot.len());
        Ok(())
    }
}
