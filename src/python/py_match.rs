//! Match bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde_json::Value;

use crate::core::{parse_record, GameRng, Grid, MatchState, PlayerId, Schema, Settings};
use crate::rules::RulesEngine;

fn rng_from(seed: Option<u64>) -> GameRng {
    seed.map_or_else(GameRng::from_entropy, GameRng::new)
}

/// Primitive Python value as JSON; anything else becomes `null`.
fn to_value(obj: &Bound<'_, PyAny>) -> Value {
    if let Ok(v) = obj.extract::<i64>() {
        Value::from(v)
    } else if let Ok(v) = obj.extract::<f64>() {
        Value::from(v)
    } else if let Ok(v) = obj.extract::<String>() {
        Value::from(v)
    } else {
        Value::Null
    }
}

/// Python wrapper for RulesEngine.
#[pyclass(name = "Match")]
pub struct PyMatch {
    engine: RulesEngine,
}

#[pymethods]
impl PyMatch {
    /// Start a new match on the default 30x20 grid with 2 players.
    ///
    /// Out-of-range pacing values fall back to the defaults.
    #[new]
    #[pyo3(signature = (
        generations_per_round = 20,
        rounds_number = 10,
        new_cells_per_round = 20,
        seed = None
    ))]
    fn new(generations_per_round: u32, rounds_number: u32, new_cells_per_round: u32, seed: Option<u64>) -> Self {
        let settings = Settings::with_pacing(generations_per_round, rounds_number, new_cells_per_round);
        Self {
            engine: RulesEngine::new(settings, rng_from(seed)),
        }
    }

    /// Rebuild a match from stored settings and state JSON.
    ///
    /// Raises ValueError only if a blob is not a JSON object; invalid
    /// fields inside are dropped.
    #[staticmethod]
    #[pyo3(signature = (settings_json, state_json, seed = None))]
    fn resume(settings_json: &str, state_json: &str, seed: Option<u64>) -> PyResult<Self> {
        let settings_record = parse_record(settings_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let state_record = parse_record(state_json).map_err(|e| PyValueError::new_err(e.to_string()))?;

        let mut settings = Settings::default();
        settings.apply_record(&settings_record);
        let state = MatchState::from_record(&state_record);

        Ok(Self {
            engine: RulesEngine::resume(settings, state, rng_from(seed)),
        })
    }

    /// Place a cell. Coordinates may be ints, floats or numeric strings,
    /// as they arrive in a request. On failure returns False and sets
    /// `last_error`.
    fn place_cell(&mut self, x: &Bound<'_, PyAny>, y: &Bound<'_, PyAny>, player: u8) -> bool {
        self.engine
            .place_cell_value(&to_value(x), &to_value(y), PlayerId::new(player))
            .is_ok()
    }

    /// Run one generation step. On failure returns False and sets `last_error`.
    fn advance_generation(&mut self) -> bool {
        self.engine.advance_generation().is_ok()
    }

    /// "game_over", "add_cell" or "wait".
    fn next_action(&self, player: u8) -> &'static str {
        self.engine.next_action(PlayerId::new(player)).as_str()
    }

    /// Whether a client-side grid (list of rows) is up to date.
    fn grid_is_actual(&self, grid: Vec<Vec<i64>>) -> bool {
        Grid::from_rows(&grid).is_some_and(|g| self.engine.grid_is_actual(&g))
    }

    /// Grid as a (height, width) uint8 array.
    fn grid<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let grid = self.engine.state().grid();
        PyArray1::from_slice_bound(py, grid.cells())
            .reshape([grid.height(), grid.width()])
    }

    #[getter]
    fn phase(&self) -> i8 {
        self.engine.state().phase().raw()
    }

    #[getter]
    fn status(&self) -> String {
        self.engine.status()
    }

    #[getter]
    fn winner_message(&self) -> String {
        self.engine.winner_message()
    }

    #[getter]
    fn counts(&self) -> Vec<u32> {
        self.engine.counts().as_slice().to_vec()
    }

    #[getter]
    fn leaders(&self) -> Vec<u8> {
        self.engine.leaders().to_vec()
    }

    #[getter]
    fn last_error(&self) -> String {
        self.engine.error_message()
    }

    fn settings_json(&self) -> String {
        self.engine.settings().to_json()
    }

    fn state_json(&self) -> String {
        self.engine.state().to_json()
    }

    fn __repr__(&self) -> String {
        let state = self.engine.state();
        format!(
            "Match(phase={}, round={}, generation={})",
            state.phase().raw(),
            state.current_round(),
            state.current_generation()
        )
    }
}
