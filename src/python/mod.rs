//! Python bindings for the life-arena rules engine.
//!
//! Lets a Python web application drive matches directly: rebuild the
//! engine from the stored JSON blobs on each request, call one operation,
//! and store `state_json()` again.
//!
//! # Quick Start
//!
//! ```python
//! import life_arena
//!
//! game = life_arena.Match(generations_per_round=20, rounds_number=10,
//!                         new_cells_per_round=20, seed=42)
//! settings, state = game.settings_json(), game.state_json()
//!
//! game = life_arena.Match.resume(settings, state)
//! if not game.place_cell(3, 4, 1):
//!     print(game.last_error)
//! ```

use pyo3::prelude::*;

mod py_match;

pub use py_match::*;

/// life-arena: multi-player Game of Life rules engine.
#[pymodule]
fn life_arena(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatch>()?;
    Ok(())
}
