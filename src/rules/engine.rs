//! The rules engine.
//!
//! `RulesEngine` owns one match's `Settings` and `MatchState` and is the
//! only thing that mutates the state during play:
//!
//! - **Placement** (`Phase::Placement`): players take turns placing
//!   `new_cells_per_round` cells each, in turn order.
//! - **Evolution** (`Phase::Evolution`): `advance_generation` runs one
//!   generation step per call until the round's generations are used up.
//! - **Finished** (`Phase::Finished`): terminal.
//!
//! Every operation checks all of its preconditions before touching the
//! state, so a rejected call leaves the match exactly as it was. The
//! engine performs no I/O and offers no concurrency guarantee; callers
//! serialize access to a given match themselves.

use log::{debug, info};
use serde_json::Value;

use crate::core::value::coerce_int;
use crate::core::{GameRng, GameRngState, Grid, MatchState, Phase, PlayerId, PlayerMap, Settings};

use super::error::MoveError;
use super::evolution;
use super::standings::{self, Standing};

/// What a player should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NextAction {
    /// The match has finished.
    GameOver,
    /// It is this player's turn to place cells.
    AddCell,
    /// Someone else is placing, or generations are running.
    Wait,
}

impl NextAction {
    /// Wire name: `game_over`, `add_cell` or `wait`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NextAction::GameOver => "game_over",
            NextAction::AddCell => "add_cell",
            NextAction::Wait => "wait",
        }
    }
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules evaluator for a single match.
#[derive(Clone, Debug)]
pub struct RulesEngine {
    settings: Settings,
    state: MatchState,
    rng: GameRng,
    counts: PlayerMap<u32>,
    last_error: Option<MoveError>,
}

impl RulesEngine {
    /// Start a new match.
    ///
    /// ```
    /// use life_arena::core::{GameRng, Phase, Settings};
    /// use life_arena::rules::RulesEngine;
    ///
    /// let engine = RulesEngine::new(Settings::default(), GameRng::new(42));
    /// assert_eq!(engine.state().phase(), Phase::Placement);
    /// assert_eq!(engine.state().turn_order().len(), 2);
    /// ```
    #[must_use]
    pub fn new(settings: Settings, mut rng: GameRng) -> Self {
        let state = MatchState::fresh(&settings, &mut rng);
        info!(
            "new match: {}x{} grid, {} players, turn order {:?}",
            settings.grid_width(),
            settings.grid_height(),
            settings.players_number(),
            state.turn_order()
        );
        Self::resume(settings, state, rng)
    }

    /// Resume a match from a rehydrated state. The state is used as-is.
    #[must_use]
    pub fn resume(settings: Settings, state: MatchState, rng: GameRng) -> Self {
        let counts = standings::count_cells(state.grid(), settings.players_number() as usize);
        Self {
            settings,
            state,
            rng,
            counts,
            last_error: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// RNG position, for callers that persist the shuffle stream.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Give up the engine, keeping its settings and state.
    #[must_use]
    pub fn into_parts(self) -> (Settings, MatchState) {
        (self.settings, self.state)
    }

    /// Error of the most recent rejected call. Cleared by a successful call.
    #[must_use]
    pub fn last_error(&self) -> Option<&MoveError> {
        self.last_error.as_ref()
    }

    /// Message of [`RulesEngine::last_error`], empty when there is none.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.last_error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    // === Operations ===

    /// Place one cell for `player` at column `x`, row `y`.
    pub fn place_cell(&mut self, x: i64, y: i64, player: PlayerId) -> Result<(), MoveError> {
        let result = self.try_place_cell(x, y, player);
        self.record(result)
    }

    /// [`RulesEngine::place_cell`] with coordinates straight from a request.
    ///
    /// Coordinates that are not integer-coercible are `InvalidCoordinates`.
    pub fn place_cell_value(&mut self, x: &Value, y: &Value, player: PlayerId) -> Result<(), MoveError> {
        let result = self.check_turn(player).and_then(|()| match (coerce_int(x), coerce_int(y)) {
            (Some(x), Some(y)) => self.try_place_cell(x, y, player),
            _ => Err(MoveError::InvalidCoordinates {
                x: x.to_string(),
                y: y.to_string(),
            }),
        });
        self.record(result)
    }

    /// Run one generation step for every player, then advance the
    /// generation/round counters.
    pub fn advance_generation(&mut self) -> Result<(), MoveError> {
        let result = self.try_advance_generation();
        self.record(result)
    }

    // === Queries ===

    /// What `player` should do next. Pure.
    #[must_use]
    pub fn next_action(&self, player: PlayerId) -> NextAction {
        match self.state.phase {
            Phase::Finished => NextAction::GameOver,
            Phase::Placement if self.state.current_player() == Some(player) => NextAction::AddCell,
            _ => NextAction::Wait,
        }
    }

    /// Whether `candidate` equals the authoritative grid.
    #[must_use]
    pub fn grid_is_actual(&self, candidate: &Grid) -> bool {
        *candidate == self.state.grid
    }

    /// [`RulesEngine::grid_is_actual`] for a raw list-of-rows grid.
    #[must_use]
    pub fn grid_is_actual_value(&self, candidate: &Value) -> bool {
        self.state.grid.matches_value(candidate)
    }

    /// Live cells per player; slot 0 is a placeholder.
    #[must_use]
    pub fn counts(&self) -> &PlayerMap<u32> {
        &self.counts
    }

    /// Live cells owned by `player`, 0 for unknown players.
    #[must_use]
    pub fn player_cells(&self, player: PlayerId) -> u32 {
        self.counts.get(player).copied().unwrap_or(0)
    }

    /// Current leader ids; `[0]` when nobody has cells.
    #[must_use]
    pub fn leaders(&self) -> &[u8] {
        self.state.leaders()
    }

    #[must_use]
    pub fn standing(&self) -> Standing {
        Standing::from_leaders(self.state.leaders())
    }

    /// Whether every round has been played.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.current_round > self.settings.rounds_number()
    }

    #[must_use]
    pub fn winner_message(&self) -> String {
        self.standing().message(self.state.phase)
    }

    /// Human-readable summary of where the match stands.
    #[must_use]
    pub fn status(&self) -> String {
        match self.state.phase {
            Phase::Finished => format!("Game over. {}", self.winner_message()),
            Phase::Evolution => "Cell generations proceeding".to_string(),
            Phase::Placement => {
                let remaining = self
                    .settings
                    .new_cells_per_round()
                    .saturating_sub(self.state.cells_placed_this_turn);
                match self.state.current_player() {
                    Some(player) => format!("Player {} adding cells, {} remaining", player.raw(), remaining),
                    None => "Waiting for players".to_string(),
                }
            }
        }
    }

    // === Internals ===

    fn record(&mut self, result: Result<(), MoveError>) -> Result<(), MoveError> {
        match &result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                debug!("rejected: {}", err);
                self.last_error = Some(err.clone());
            }
        }
        result
    }

    fn check_turn(&self, player: PlayerId) -> Result<(), MoveError> {
        if self.state.phase != Phase::Placement {
            return Err(MoveError::NotPlacementPhase {
                phase: self.state.phase,
            });
        }
        let expected = self.state.current_player();
        if expected != Some(player) {
            return Err(MoveError::NotPlayersTurn { player, expected });
        }
        Ok(())
    }

    fn try_place_cell(&mut self, x: i64, y: i64, player: PlayerId) -> Result<(), MoveError> {
        self.check_turn(player)?;

        if !self.state.grid.contains(x, y) {
            return Err(MoveError::InvalidCoordinates {
                x: x.to_string(),
                y: y.to_string(),
            });
        }
        let (x, y) = (x as usize, y as usize);
        match self.state.grid.get(x, y) {
            Some(0) => {}
            Some(owner) => return Err(MoveError::CellOccupied { x, y, owner }),
            None => {
                return Err(MoveError::InvalidCoordinates {
                    x: x.to_string(),
                    y: y.to_string(),
                })
            }
        }

        // All checks passed; mutate.
        self.state.grid.set(x, y, player.raw());
        self.counts = standings::count_cells(&self.state.grid, self.settings.players_number() as usize);
        self.state.cells_placed_this_turn = self.state.cells_placed_this_turn.saturating_add(1);
        debug!(
            "{} placed at ({}, {}), {}/{}",
            player,
            x,
            y,
            self.state.cells_placed_this_turn,
            self.settings.new_cells_per_round()
        );

        if self.state.cells_placed_this_turn >= self.settings.new_cells_per_round() {
            self.state.current_turn_index += 1;
            if self.state.current_turn_index >= self.state.turn_order.len() {
                self.state.phase = Phase::Evolution;
                info!("round {}: all cells placed, evolving", self.state.current_round);
            } else {
                self.state.cells_placed_this_turn = 0;
            }
        }

        Ok(())
    }

    fn try_advance_generation(&mut self) -> Result<(), MoveError> {
        if self.state.phase != Phase::Evolution {
            return Err(MoveError::NotEvolutionPhase {
                phase: self.state.phase,
            });
        }

        evolution::generation_step(&mut self.state.grid, &self.state.turn_order);
        self.state.current_turn_index = self.state.turn_order.len();
        self.state.current_generation = self.state.current_generation.saturating_add(1);
        self.counts = standings::count_cells(&self.state.grid, self.settings.players_number() as usize);
        self.state.leaders = standings::compute_leaders(&self.counts);
        debug!(
            "round {} generation {} done, counts {:?}",
            self.state.current_round,
            self.state.current_generation.saturating_sub(1),
            self.counts.as_slice()
        );

        if self.state.current_generation > self.settings.generations_per_round() {
            self.state.current_round = self.state.current_round.saturating_add(1);
            self.state.current_generation = 1;

            if self.is_over() {
                self.state.phase = Phase::Finished;
                info!("match finished: {}", self.winner_message());
                return Ok(());
            }

            self.state.phase = Phase::Placement;
            self.rng.shuffle(&mut self.state.turn_order);
            self.state.current_turn_index = 0;
            self.state.cells_placed_this_turn = 0;
            info!(
                "round {} placement, turn order {:?}",
                self.state.current_round, self.state.turn_order
            );
        }

        Ok(())
    }
}
