//! Match state: the full mutable snapshot of one match.
//!
//! ## MatchState
//!
//! - Grid contents
//! - Phase, turn order and whose turn it is
//! - Round and generation counters
//! - Current leader set
//! - Cells placed by the player currently placing
//!
//! Fields are only written by the rules engine or through the validated
//! [`MatchState::try_set`] path used for rehydration. An invalid write is
//! dropped as a whole (a list with one bad element voids the assignment)
//! and the previous value stays in place.

use serde_json::{json, Value};
use smallvec::SmallVec;

use super::config::Settings;
use super::grid::Grid;
use super::player::{PlayerId, MAX_PLAYERS};
use super::record::Schema;
use super::rng::GameRng;
use super::value::{coerce_int, coerce_int_list};

/// Turn order, one entry per player.
pub type TurnOrder = SmallVec<[PlayerId; MAX_PLAYERS as usize]>;

/// Leader ids. `[0]` means nobody has any cells.
pub type Leaders = SmallVec<[u8; MAX_PLAYERS as usize]>;

/// Match phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Terminal; no further mutation.
    Finished,
    /// Players place new cells in turn order.
    #[default]
    Placement,
    /// Generations are being computed.
    Evolution,
}

impl Phase {
    /// Persisted value: `-1`, `0` or `1`.
    #[must_use]
    pub const fn raw(self) -> i8 {
        match self {
            Phase::Finished => -1,
            Phase::Placement => 0,
            Phase::Evolution => 1,
        }
    }

    /// Parse a persisted phase value.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            -1 => Some(Phase::Finished),
            0 => Some(Phase::Placement),
            1 => Some(Phase::Evolution),
            _ => None,
        }
    }
}

/// A settable `MatchState` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateField {
    Grid,
    Phase,
    TurnOrder,
    CurrentTurnIndex,
    CurrentRound,
    CurrentGeneration,
    Leaders,
    CellsPlacedThisTurn,
}

impl StateField {
    /// All fields, in persistence order.
    pub const ALL: [StateField; 8] = [
        StateField::Grid,
        StateField::Phase,
        StateField::TurnOrder,
        StateField::CurrentTurnIndex,
        StateField::CurrentRound,
        StateField::CurrentGeneration,
        StateField::Leaders,
        StateField::CellsPlacedThisTurn,
    ];

    /// Persisted field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StateField::Grid => "grid",
            StateField::Phase => "phase",
            StateField::TurnOrder => "turn_order",
            StateField::CurrentTurnIndex => "current_turn_index",
            StateField::CurrentRound => "current_round",
            StateField::CurrentGeneration => "current_generation",
            StateField::Leaders => "leaders",
            StateField::CellsPlacedThisTurn => "cells_placed_this_turn",
        }
    }

    /// Look a field up by its persisted name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    pub(crate) grid: Grid,
    pub(crate) phase: Phase,
    pub(crate) turn_order: TurnOrder,
    pub(crate) current_turn_index: usize,
    pub(crate) current_round: u32,
    pub(crate) current_generation: u32,
    pub(crate) leaders: Leaders,
    pub(crate) cells_placed_this_turn: u32,
}

impl Default for MatchState {
    /// Blank state for rehydration: empty grid and turn order, placement
    /// phase, round 1, generation 1, no leaders.
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            phase: Phase::Placement,
            turn_order: TurnOrder::new(),
            current_turn_index: 0,
            current_round: 1,
            current_generation: 1,
            leaders: Leaders::new(),
            cells_placed_this_turn: 0,
        }
    }
}

impl MatchState {
    /// Start a new match: empty grid sized from `settings` and a shuffled
    /// turn order over all players.
    #[must_use]
    pub fn fresh(settings: &Settings, rng: &mut GameRng) -> Self {
        let mut turn_order: TurnOrder = PlayerId::all(settings.players_number() as usize).collect();
        rng.shuffle(&mut turn_order);

        Self {
            grid: Grid::new(settings.grid_width(), settings.grid_height()),
            turn_order,
            ..Self::default()
        }
    }

    /// Rebuild a state from a persisted record on top of [`Default`].
    ///
    /// Invalid fields are dropped; the record never fails as a whole.
    #[must_use]
    pub fn from_record(record: &super::record::Record) -> Self {
        let mut state = Self::default();
        state.apply_record(record);
        state
    }

    // === Accessors ===

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    #[must_use]
    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    #[must_use]
    pub fn current_generation(&self) -> u32 {
        self.current_generation
    }

    #[must_use]
    pub fn leaders(&self) -> &[u8] {
        &self.leaders
    }

    #[must_use]
    pub fn cells_placed_this_turn(&self) -> u32 {
        self.cells_placed_this_turn
    }

    /// Player at `current_turn_index`, if the index is inside the turn order.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn_order.get(self.current_turn_index).copied()
    }

    // === Validated writes ===

    /// Validated write of one field.
    ///
    /// Returns `false` and leaves the state untouched when the value is
    /// rejected.
    pub fn try_set(&mut self, field: StateField, value: &Value) -> bool {
        match field {
            StateField::Grid => match Grid::from_value(value) {
                Some(grid) => {
                    self.grid = grid;
                    true
                }
                None => false,
            },
            StateField::TurnOrder => match parse_turn_order(value) {
                Some(order) => {
                    self.turn_order = order;
                    true
                }
                None => false,
            },
            StateField::Leaders => match parse_leaders(value) {
                Some(leaders) => {
                    self.leaders = leaders;
                    true
                }
                None => false,
            },
            _ => match coerce_int(value) {
                Some(v) => self.try_set_int(field, v),
                None => false,
            },
        }
    }

    fn try_set_int(&mut self, field: StateField, value: i64) -> bool {
        match field {
            StateField::Phase => match Phase::from_raw(value) {
                Some(phase) => self.phase = phase,
                None => return false,
            },
            StateField::CurrentTurnIndex => match usize::try_from(value) {
                Ok(v) => self.current_turn_index = v,
                Err(_) => return false,
            },
            StateField::CellsPlacedThisTurn => match u32::try_from(value) {
                Ok(v) => self.cells_placed_this_turn = v,
                Err(_) => return false,
            },
            StateField::CurrentRound | StateField::CurrentGeneration => {
                let Some(v) = u32::try_from(value).ok().filter(|v| *v > 0) else {
                    return false;
                };
                if field == StateField::CurrentRound {
                    self.current_round = v;
                } else {
                    self.current_generation = v;
                }
            }
            StateField::Grid | StateField::TurnOrder | StateField::Leaders => return false,
        }
        true
    }

    /// Read a field as a primitive value.
    #[must_use]
    pub fn get(&self, field: StateField) -> Value {
        match field {
            StateField::Grid => json!(self.grid.to_rows()),
            StateField::Phase => json!(self.phase.raw()),
            StateField::TurnOrder => {
                json!(self.turn_order.iter().map(|p| p.raw()).collect::<Vec<_>>())
            }
            StateField::CurrentTurnIndex => json!(self.current_turn_index),
            StateField::CurrentRound => json!(self.current_round),
            StateField::CurrentGeneration => json!(self.current_generation),
            StateField::Leaders => json!(self.leaders.to_vec()),
            StateField::CellsPlacedThisTurn => json!(self.cells_placed_this_turn),
        }
    }
}

/// Distinct player ids in `1..=MAX_PLAYERS`.
fn parse_turn_order(value: &Value) -> Option<TurnOrder> {
    let mut order = TurnOrder::new();
    for raw in coerce_int_list(value)? {
        let player = PlayerId::from_raw(raw)?;
        if order.contains(&player) {
            return None;
        }
        order.push(player);
    }
    Some(order)
}

/// Ids in `0..=MAX_PLAYERS`.
fn parse_leaders(value: &Value) -> Option<Leaders> {
    coerce_int_list(value)?
        .into_iter()
        .map(|raw| {
            if (0..=i64::from(MAX_PLAYERS)).contains(&raw) {
                Some(raw as u8)
            } else {
                None
            }
        })
        .collect()
}

impl Schema for MatchState {
    const FIELDS: &'static [&'static str] = &[
        "grid",
        "phase",
        "turn_order",
        "current_turn_index",
        "current_round",
        "current_generation",
        "leaders",
        "cells_placed_this_turn",
    ];

    fn field_value(&self, name: &str) -> Option<Value> {
        StateField::from_name(name).map(|f| self.get(f))
    }

    fn try_set_named(&mut self, name: &str, value: &Value) -> bool {
        match StateField::from_name(name) {
            Some(field) => self.try_set(field, value),
            None => false,
        }
    }
}
