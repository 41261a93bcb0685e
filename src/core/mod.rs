//! Core match types: players, grid, settings, state, records, RNG.
//!
//! These are the data the rules engine operates on. Nothing in here knows
//! the rules; `rules` does.

pub mod player;
pub mod grid;
pub mod rng;
pub mod value;
pub mod record;
pub mod config;
pub mod state;

pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use grid::Grid;
pub use rng::{GameRng, GameRngState};
pub use record::{parse_record, Record, Schema};
pub use config::{Settings, SettingsField, MAX_GRID_SIDE, MIN_GRID_SIDE};
pub use state::{Leaders, MatchState, Phase, StateField, TurnOrder};
