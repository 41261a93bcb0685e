//! Generation rules.
//!
//! One generation step is a sequential pass: each player in turn order
//! rewrites the whole grid from their own point of view, and the next
//! player sees the already-updated grid.
//!
//! Relative to the acting player `P`, on a toroidal 8-neighborhood:
//! - a cell owned by `P` survives with 2 or 3 neighbors owned by `P`,
//!   otherwise it becomes empty;
//! - any other cell (empty or owned by someone else) becomes `P`'s with
//!   exactly 3 neighbors owned by `P`, otherwise it is left alone.

use crate::core::{Grid, PlayerId};

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Count the neighbors of `(x, y)` owned by `player`, wrapping at edges.
#[must_use]
pub fn owned_neighbors(grid: &Grid, x: usize, y: usize, player: PlayerId) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| grid.get_wrapped(x, y, dx, dy) == player.raw())
        .count() as u8
}

/// Owner of `(x, y)` after `player` acts.
#[must_use]
pub fn next_cell(grid: &Grid, x: usize, y: usize, player: PlayerId) -> u8 {
    let current = grid.get(x, y).unwrap_or(0);
    let neighbors = owned_neighbors(grid, x, y, player);

    if current == player.raw() {
        if (2..=3).contains(&neighbors) {
            current
        } else {
            0
        }
    } else if neighbors == 3 {
        player.raw()
    } else {
        current
    }
}

/// The whole grid after `player` acts. `grid` itself is not modified.
#[must_use]
pub fn evolve_for(grid: &Grid, player: PlayerId) -> Grid {
    let mut next = grid.clone();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            next.set(x, y, next_cell(grid, x, y, player));
        }
    }
    next
}

/// One full generation step: every player in `turn_order`, in order, each
/// committing before the next one acts.
pub fn generation_step(grid: &mut Grid, turn_order: &[PlayerId]) {
    for &player in turn_order {
        *grid = evolve_for(grid, player);
    }
}
