//! Persistence boundary.
//!
//! A match persists as two opaque JSON blobs (settings and state), the
//! position of its shuffle RNG and a version token. Every save names the version it was derived from and is
//! refused if the record has moved on since, so two requests that both
//! rehydrate, mutate and persist the same match cannot silently overwrite
//! each other.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::GameRngState;

/// Match identifier assigned by the store.
pub type MatchId = u64;

/// Version token of a stored match. Starts at 1 and grows by one per save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub u64);

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A persisted match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    /// `Settings` as a JSON object.
    pub settings: String,
    /// `MatchState` as a JSON object.
    pub state: String,
    /// Shuffle stream, so round-start reshuffles continue across requests.
    pub rng: GameRngState,
    pub version: Version,
}

/// Persistence errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No match with this id.
    #[error("match {0} not found")]
    NotFound(MatchId),

    /// Someone else saved the match after it was loaded.
    #[error("match {id} was modified concurrently: expected {expected}, found {found}")]
    VersionConflict {
        id: MatchId,
        expected: Version,
        found: Version,
    },

    /// A stored blob is not a JSON object.
    #[error("stored {field} of match {id} is not a JSON object")]
    Corrupt { id: MatchId, field: &'static str },
}

/// Storage for persisted matches.
///
/// Implementations must make `save` an atomic compare-and-swap on the
/// version token.
pub trait MatchStore {
    /// Store a new match. Returns its id and initial version.
    fn create(&self, settings: String, state: String, rng: GameRngState) -> Result<(MatchId, Version), StoreError>;

    /// Load a match.
    fn load(&self, id: MatchId) -> Result<StoredMatch, StoreError>;

    /// Replace the state and RNG position of a match if it is still at
    /// `expected`.
    ///
    /// Returns the new version.
    fn save(&self, id: MatchId, expected: Version, state: String, rng: GameRngState) -> Result<Version, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    next_id: MatchId,
    matches: FxHashMap<MatchId, StoredMatch>,
}

/// In-process `MatchStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchStore for MemoryStore {
    fn create(&self, settings: String, state: String, rng: GameRngState) -> Result<(MatchId, Version), StoreError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        let version = Version(1);
        inner.matches.insert(
            id,
            StoredMatch {
                settings,
                state,
                rng,
                version,
            },
        );
        Ok((id, version))
    }

    fn load(&self, id: MatchId) -> Result<StoredMatch, StoreError> {
        self.lock().matches.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn save(&self, id: MatchId, expected: Version, state: String, rng: GameRngState) -> Result<Version, StoreError> {
        let mut inner = self.lock();
        let stored = inner.matches.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if stored.version != expected {
            log::warn!(
                "rejecting save of match {}: expected {}, found {}",
                id,
                expected,
                stored.version
            );
            return Err(StoreError::VersionConflict {
                id,
                expected,
                found: stored.version,
            });
        }
        stored.state = state;
        stored.rng = rng;
        stored.version = Version(expected.0 + 1);
        Ok(stored.version)
    }
}
