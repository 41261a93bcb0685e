//! The shared toroidal grid.
//!
//! Cells hold `0` when empty or the id of the owning player. Storage is a
//! flat row-major `Vec<u8>`; the persisted form is a list of rows.

use serde_json::Value;

use super::player::MAX_PLAYERS;
use super::value::coerce_int;

/// Rectangular `height × width` matrix of cell owners.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Build a grid from rows of raw integers.
    ///
    /// Returns `None` unless the rows form a rectangle with at least one
    /// column and every cell is in `0..=MAX_PLAYERS`. No rows at all gives
    /// the empty `0 × 0` grid.
    ///
    /// ```
    /// use life_arena::core::Grid;
    ///
    /// let grid = Grid::from_rows(&[vec![0, 1], vec![2, 0]]).unwrap();
    /// assert_eq!((grid.width(), grid.height()), (2, 2));
    /// assert_eq!(grid.get(1, 0), Some(1));
    ///
    /// assert!(Grid::from_rows(&[vec![0, 1], vec![2]]).is_none());
    /// assert!(Grid::from_rows(&[vec![0, 9]]).is_none());
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[Vec<i64>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height > 0 && width == 0 {
            return None;
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return None;
            }
            for &cell in row.iter() {
                if !(0..=i64::from(MAX_PLAYERS)).contains(&cell) {
                    return None;
                }
                cells.push(cell as u8);
            }
        }

        Some(Self { width, height, cells })
    }

    /// Parse a grid from a JSON list of integer lists.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let rows = value
            .as_array()?
            .iter()
            .map(|row| row.as_array()?.iter().map(coerce_int).collect::<Option<Vec<_>>>())
            .collect::<Option<Vec<_>>>()?;
        Self::from_rows(&rows)
    }

    /// Persisted form: a list of rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether `(x, y)` lies on the grid.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Owner of the cell at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Owner of the cell at an offset from `(x, y)`, wrapping around edges.
    #[must_use]
    pub fn get_wrapped(&self, x: usize, y: usize, dx: isize, dy: isize) -> u8 {
        let wx = (x as isize + dx).rem_euclid(self.width as isize) as usize;
        let wy = (y as isize + dy).rem_euclid(self.height as isize) as usize;
        self.cells[wy * self.width + wx]
    }

    /// Set the owner of an in-bounds cell. Returns `false` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, owner: u8) -> bool {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = owner;
            true
        } else {
            false
        }
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // `chunks` panics on 0, and a 0-wide grid has no cells anyway.
        self.cells.chunks(self.width.max(1))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Compare against a client-side copy given as raw rows.
    ///
    /// Any dimension or cell mismatch, or a non-integer cell, is `false`.
    #[must_use]
    pub fn matches_value(&self, value: &Value) -> bool {
        let Some(rows) = value.as_array() else {
            return false;
        };
        if rows.len() != self.height {
            return false;
        }
        rows.iter().zip(self.rows()).all(|(candidate, row)| {
            candidate.as_array().is_some_and(|cells| {
                cells.len() == row.len()
                    && cells
                        .iter()
                        .zip(row)
                        .all(|(c, &owner)| coerce_int(c) == Some(i64::from(owner)))
            })
        })
    }
}
