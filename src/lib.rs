//! # life-arena
//!
//! Rules engine for a turn-based, multi-player Game of Life played on a
//! shared toroidal grid by 1-5 players.
//!
//! ## How a match runs
//!
//! 1. **Placement**: in a shuffled turn order, each player places
//!    `new_cells_per_round` cells on empty squares.
//! 2. **Evolution**: each generation step lets every player, in turn order,
//!    apply Conway's rules to the grid from their own point of view.
//! 3. After `generations_per_round` steps the next round starts with a
//!    fresh shuffle; after `rounds_number` rounds the player(s) with the
//!    most live cells win.
//!
//! ## Design Principles
//!
//! 1. **Stateless callers**: settings and state persist as flat records
//!    and are rebuilt per request through validated setters.
//! 2. **Deterministic**: all randomness comes from an injected `GameRng`.
//! 3. **No partial moves**: a rejected operation leaves the state as it was.
//!
//! ## Modules
//!
//! - `core`: players, grid, settings, state, records, RNG
//! - `rules`: generation rules, standings and the `RulesEngine`
//! - `store`: versioned persistence boundary
//! - `session`: load-operate-save cycle for one request

pub mod core;
pub mod rules;
pub mod session;
pub mod store;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameRngState, Grid, MatchState, Phase, PlayerId, PlayerMap, Record, Schema, Settings,
    SettingsField, StateField,
};

pub use crate::rules::{MoveError, NextAction, RulesEngine, Standing};

pub use crate::session::{MatchSession, SessionError, Snapshot};

pub use crate::store::{MatchId, MatchStore, MemoryStore, StoredMatch, StoreError, Version};
