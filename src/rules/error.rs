//! Engine operation errors.

use thiserror::Error;

use crate::core::{Phase, PlayerId};

/// Why a `place_cell` or `advance_generation` call was rejected.
///
/// A rejected call never changes the match state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Cells can only be placed in the placement phase.
    #[error("cells cannot be placed now: not your move type")]
    NotPlacementPhase { phase: Phase },

    /// Someone else is placing cells.
    #[error("not this player's turn: {player} tried to place, waiting on {}", expected_label(.expected))]
    NotPlayersTurn {
        player: PlayerId,
        expected: Option<PlayerId>,
    },

    /// Coordinates off the grid or not integers.
    #[error("invalid coordinates ({x}, {y})")]
    InvalidCoordinates { x: String, y: String },

    /// Target cell already has an owner.
    #[error("cell already occupied at ({x}, {y})")]
    CellOccupied { x: usize, y: usize, owner: u8 },

    /// Generations only run once every player has placed.
    #[error("must place cells first")]
    NotEvolutionPhase { phase: Phase },
}

fn expected_label(expected: &Option<PlayerId>) -> String {
    match expected {
        Some(player) => player.to_string(),
        None => "nobody".to_string(),
    }
}
