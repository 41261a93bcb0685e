//! Per-request match sessions.
//!
//! The surrounding application is stateless between requests: each one
//! loads the match, rebuilds the engine from the persisted records, runs a
//! single operation and writes the state back. `MatchSession` packages that
//! cycle and carries the loaded version token into the save. The shuffle
//! RNG is persisted with the state, so a match replays the same turn
//! orders no matter how its requests are split.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::{parse_record, GameRng, MatchState, Phase, PlayerId, Schema, Settings};
use crate::rules::{MoveError, NextAction, RulesEngine};
use crate::store::{MatchId, MatchStore, StoreError, Version};

/// Failure of a session operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The engine rejected the move; nothing was saved.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Loading or saving failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only view of a match for one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub next_action: &'static str,
    pub status: String,
    pub winner_message: String,
    /// Live cells per player, slot 0 unused.
    pub counts: Vec<u32>,
    /// Present when the viewer's copy is missing or stale, or when the
    /// viewer is about to place cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<Vec<u8>>>,
}

/// One loaded match bound to its store.
pub struct MatchSession<'s, S: MatchStore> {
    store: &'s S,
    id: MatchId,
    version: Version,
    engine: RulesEngine,
}

impl<'s, S: MatchStore> MatchSession<'s, S> {
    /// Create and persist a new match.
    pub fn create(store: &'s S, settings: Settings, rng: GameRng) -> Result<Self, SessionError> {
        let engine = RulesEngine::new(settings, rng);
        let (id, version) = store.create(
            engine.settings().to_json(),
            engine.state().to_json(),
            engine.rng_state(),
        )?;
        Ok(Self {
            store,
            id,
            version,
            engine,
        })
    }

    /// Load a match and rebuild its engine, RNG included.
    ///
    /// Invalid persisted fields are dropped through the validated setters;
    /// only a blob that is not a JSON object at all is an error.
    pub fn open(store: &'s S, id: MatchId) -> Result<Self, SessionError> {
        let stored = store.load(id)?;
        let settings_record = parse_record(&stored.settings).map_err(|_| StoreError::Corrupt {
            id,
            field: "settings",
        })?;
        let state_record = parse_record(&stored.state).map_err(|_| StoreError::Corrupt { id, field: "state" })?;

        let mut settings = Settings::default();
        settings.apply_record(&settings_record);
        let state = MatchState::from_record(&state_record);
        let rng = GameRng::from_state(&stored.rng);

        Ok(Self {
            store,
            id,
            version: stored.version,
            engine: RulesEngine::resume(settings, state, rng),
        })
    }

    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Version the session will save against.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Place a cell from raw request coordinates and persist on success.
    pub fn place_cell(&mut self, x: &Value, y: &Value, player: PlayerId) -> Result<(), SessionError> {
        self.engine.place_cell_value(x, y, player)?;
        self.persist()
    }

    /// Drive the evolution phase to its end, persisting after every step.
    ///
    /// Returns the number of generation steps run; 0 outside the
    /// evolution phase. Any pacing between steps is up to the caller.
    pub fn run_generations(&mut self) -> Result<u32, SessionError> {
        let mut steps = 0;
        while self.engine.state().phase() == Phase::Evolution {
            self.engine.advance_generation()?;
            self.persist()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// View of the match for `viewer` (`None` for spectators).
    ///
    /// `client_grid` is the viewer's copy of the grid; the authoritative
    /// grid is included only when that copy is absent or out of date, or
    /// when the viewer has cells to place.
    #[must_use]
    pub fn snapshot(&self, viewer: Option<PlayerId>, client_grid: Option<&Value>) -> Snapshot {
        let engine = &self.engine;
        let next_action = match viewer {
            Some(player) => engine.next_action(player),
            None if engine.state().phase() == Phase::Finished => NextAction::GameOver,
            None => NextAction::Wait,
        };
        let stale = !client_grid.is_some_and(|grid| engine.grid_is_actual_value(grid));
        let grid = (next_action == NextAction::AddCell || stale).then(|| engine.state().grid().to_rows());

        Snapshot {
            next_action: next_action.as_str(),
            status: engine.status(),
            winner_message: engine.winner_message(),
            counts: engine.counts().as_slice().to_vec(),
            grid,
        }
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        self.version = self
            .store
            .save(self.id, self.version, self.engine.state().to_json(), self.engine.rng_state())?;
        Ok(())
    }
}
