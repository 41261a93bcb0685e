//! Rules of the multi-player Game of Life.
//!
//! - `evolution`: neighbor counting and the per-player generation pass
//! - `standings`: live-cell counts and the leader set
//! - `engine`: the phase-driven `RulesEngine` that ties them together

pub mod engine;
pub mod error;
pub mod evolution;
pub mod standings;

pub use engine::{NextAction, RulesEngine};
pub use error::MoveError;
pub use standings::Standing;
