//! Match configuration.
//!
//! `Settings` fixes the grid size, player count and pacing of one match.
//! It is built once, before the match starts, and never changes afterwards.
//!
//! Every write goes through a validated setter: a value outside the field's
//! range, or one that does not read as an integer, leaves the previous
//! value in place. The setter's `bool` result is the only trace of the
//! rejection; callers that care must check it or re-read the field.

use serde_json::{json, Value};
use std::ops::RangeInclusive;

use super::player::MAX_PLAYERS;
use super::record::Schema;
use super::value::{coerce_int, coerce_int_list};

/// Smallest allowed grid side.
pub const MIN_GRID_SIDE: usize = 10;

/// Largest allowed grid side. Keeps the cell buffer of a persisted
/// settings record bounded.
pub const MAX_GRID_SIDE: usize = 1000;

/// A settable `Settings` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsField {
    GridWidth,
    GridHeight,
    PlayersNumber,
    GenerationsPerRound,
    RoundsNumber,
    NewCellsPerRound,
}

impl SettingsField {
    /// All fields, in persistence order.
    pub const ALL: [SettingsField; 6] = [
        SettingsField::GridWidth,
        SettingsField::GridHeight,
        SettingsField::PlayersNumber,
        SettingsField::GenerationsPerRound,
        SettingsField::RoundsNumber,
        SettingsField::NewCellsPerRound,
    ];

    /// Persisted field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SettingsField::GridWidth => "grid_width",
            SettingsField::GridHeight => "grid_height",
            SettingsField::PlayersNumber => "players_number",
            SettingsField::GenerationsPerRound => "generations_per_round",
            SettingsField::RoundsNumber => "rounds_number",
            SettingsField::NewCellsPerRound => "new_cells_per_round",
        }
    }

    /// Look a field up by its persisted name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Closed range of accepted values.
    #[must_use]
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            SettingsField::GridWidth | SettingsField::GridHeight => {
                MIN_GRID_SIDE as i64..=MAX_GRID_SIDE as i64
            }
            SettingsField::PlayersNumber => 1..=i64::from(MAX_PLAYERS),
            SettingsField::GenerationsPerRound => 1..=50,
            SettingsField::RoundsNumber => 1..=30,
            SettingsField::NewCellsPerRound => 5..=30,
        }
    }
}

/// Immutable-after-construction match parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    grid_width: usize,
    grid_height: usize,
    players_number: u8,
    generations_per_round: u32,
    rounds_number: u32,
    new_cells_per_round: u32,
}

impl Default for Settings {
    /// 30×20 grid, 2 players, 20 generations per round, 10 rounds,
    /// 20 new cells per round.
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            players_number: 2,
            generations_per_round: 20,
            rounds_number: 10,
            new_cells_per_round: 20,
        }
    }
}

impl Settings {
    /// Build settings from raw pacing values.
    ///
    /// `Value::Null` or any invalid value keeps the default for that field.
    ///
    /// ```
    /// use life_arena::core::Settings;
    /// use serde_json::json;
    ///
    /// let settings = Settings::new(&json!("5"), &json!(99), &json!(null));
    /// assert_eq!(settings.generations_per_round(), 5);
    /// assert_eq!(settings.rounds_number(), 10);
    /// assert_eq!(settings.new_cells_per_round(), 20);
    /// ```
    #[must_use]
    pub fn new(generations_per_round: &Value, rounds_number: &Value, new_cells_per_round: &Value) -> Self {
        let mut settings = Self::default();
        settings.try_set(SettingsField::GenerationsPerRound, generations_per_round);
        settings.try_set(SettingsField::RoundsNumber, rounds_number);
        settings.try_set(SettingsField::NewCellsPerRound, new_cells_per_round);
        settings
    }

    /// Typed form of [`Settings::new`].
    #[must_use]
    pub fn with_pacing(generations_per_round: u32, rounds_number: u32, new_cells_per_round: u32) -> Self {
        Self::new(
            &json!(generations_per_round),
            &json!(rounds_number),
            &json!(new_cells_per_round),
        )
    }

    /// Set the grid size from a `[width, height]` pair.
    ///
    /// Both sides must be valid or neither is written.
    #[must_use]
    pub fn with_grid_size(mut self, width: usize, height: usize) -> Self {
        self.try_set_grid_size(&json!([width, height]));
        self
    }

    /// Set the number of players.
    #[must_use]
    pub fn with_players(mut self, players_number: u8) -> Self {
        self.try_set(SettingsField::PlayersNumber, &json!(players_number));
        self
    }

    /// Validated write of one field.
    pub fn try_set(&mut self, field: SettingsField, value: &Value) -> bool {
        match coerce_int(value) {
            Some(v) => self.try_set_int(field, v),
            None => false,
        }
    }

    /// Validated write of one field from an integer.
    pub fn try_set_int(&mut self, field: SettingsField, value: i64) -> bool {
        if !field.range().contains(&value) {
            return false;
        }
        match field {
            SettingsField::GridWidth => self.grid_width = value as usize,
            SettingsField::GridHeight => self.grid_height = value as usize,
            SettingsField::PlayersNumber => self.players_number = value as u8,
            SettingsField::GenerationsPerRound => self.generations_per_round = value as u32,
            SettingsField::RoundsNumber => self.rounds_number = value as u32,
            SettingsField::NewCellsPerRound => self.new_cells_per_round = value as u32,
        }
        true
    }

    /// Validated write of both grid sides from a `[width, height]` pair.
    pub fn try_set_grid_size(&mut self, value: &Value) -> bool {
        let Some(pair) = coerce_int_list(value) else {
            return false;
        };
        let &[width, height] = pair.as_slice() else {
            return false;
        };
        let range = SettingsField::GridWidth.range();
        if !range.contains(&width) || !range.contains(&height) {
            return false;
        }
        self.grid_width = width as usize;
        self.grid_height = height as usize;
        true
    }

    /// Grid width (number of columns).
    #[must_use]
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Grid height (number of rows).
    #[must_use]
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// `(width, height)`.
    #[must_use]
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid_width, self.grid_height)
    }

    #[must_use]
    pub fn players_number(&self) -> u8 {
        self.players_number
    }

    #[must_use]
    pub fn generations_per_round(&self) -> u32 {
        self.generations_per_round
    }

    #[must_use]
    pub fn rounds_number(&self) -> u32 {
        self.rounds_number
    }

    #[must_use]
    pub fn new_cells_per_round(&self) -> u32 {
        self.new_cells_per_round
    }

    /// Read a field as an integer.
    #[must_use]
    pub fn get(&self, field: SettingsField) -> i64 {
        match field {
            SettingsField::GridWidth => self.grid_width as i64,
            SettingsField::GridHeight => self.grid_height as i64,
            SettingsField::PlayersNumber => i64::from(self.players_number),
            SettingsField::GenerationsPerRound => i64::from(self.generations_per_round),
            SettingsField::RoundsNumber => i64::from(self.rounds_number),
            SettingsField::NewCellsPerRound => i64::from(self.new_cells_per_round),
        }
    }
}

impl Schema for Settings {
    const FIELDS: &'static [&'static str] = &[
        "grid_width",
        "grid_height",
        "players_number",
        "generations_per_round",
        "rounds_number",
        "new_cells_per_round",
    ];

    fn field_value(&self, name: &str) -> Option<Value> {
        SettingsField::from_name(name).map(|f| json!(self.get(f)))
    }

    fn try_set_named(&mut self, name: &str, value: &Value) -> bool {
        match SettingsField::from_name(name) {
            Some(field) => self.try_set(field, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::parse_record;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.grid_size(), (30, 20));
        assert_eq!(settings.players_number(), 2);
        assert_eq!(settings.generations_per_round(), 20);
        assert_eq!(settings.rounds_number(), 10);
        assert_eq!(settings.new_cells_per_round(), 20);
    }

    #[test]
    fn test_pacing_from_raw_values() {
        let settings = Settings::new(&json!(2), &json!("3"), &json!(5.0));
        assert_eq!(settings.generations_per_round(), 2);
        assert_eq!(settings.rounds_number(), 3);
        assert_eq!(settings.new_cells_per_round(), 5);
    }

    #[test]
    fn test_out_of_range_keeps_previous_value() {
        let mut settings = Settings::with_pacing(20, 10, 20);

        assert!(!settings.try_set(SettingsField::GenerationsPerRound, &json!(0)));
        assert!(!settings.try_set(SettingsField::GenerationsPerRound, &json!(51)));
        assert!(!settings.try_set(SettingsField::RoundsNumber, &json!(31)));
        assert!(!settings.try_set(SettingsField::NewCellsPerRound, &json!(4)));
        assert!(!settings.try_set(SettingsField::PlayersNumber, &json!(6)));
        assert!(!settings.try_set(SettingsField::GridWidth, &json!(9)));

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_non_integer_keeps_previous_value() {
        let mut settings = Settings::default();
        assert!(!settings.try_set(SettingsField::RoundsNumber, &json!("many")));
        assert!(!settings.try_set(SettingsField::RoundsNumber, &json!([3])));
        assert_eq!(settings.rounds_number(), 10);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let mut settings = Settings::default();
        assert!(settings.try_set_int(SettingsField::GenerationsPerRound, 50));
        assert!(settings.try_set_int(SettingsField::RoundsNumber, 1));
        assert!(settings.try_set_int(SettingsField::NewCellsPerRound, 30));
        assert!(settings.try_set_int(SettingsField::PlayersNumber, 5));
        assert!(settings.try_set_int(SettingsField::GridHeight, 10));
    }

    #[test]
    fn test_grid_size_pair() {
        let mut settings = Settings::default();
        assert!(settings.try_set_grid_size(&json!([10, 6 + 4])));
        assert_eq!(settings.grid_size(), (10, 10));

        assert!(!settings.try_set_grid_size(&json!([40, 9])));
        assert!(!settings.try_set_grid_size(&json!([40])));
        assert!(!settings.try_set_grid_size(&json!([40, 40, 40])));
        assert!(!settings.try_set_grid_size(&json!(40)));
        assert_eq!(settings.grid_size(), (10, 10));
    }

    #[test]
    fn test_grid_side_upper_bound() {
        let mut settings = Settings::default();
        assert!(settings.try_set_grid_size(&json!([1000, 1000])));
        assert!(!settings.try_set_grid_size(&json!([1001, 10])));
        assert!(!settings.try_set(SettingsField::GridHeight, &json!(4_000_000_000u64)));
        assert_eq!(settings.grid_size(), (1000, 1000));
    }

    #[test]
    fn test_builders() {
        let settings = Settings::with_pacing(2, 2, 5).with_grid_size(12, 15).with_players(4);
        assert_eq!(settings.grid_size(), (12, 15));
        assert_eq!(settings.players_number(), 4);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in SettingsField::ALL {
            assert_eq!(SettingsField::from_name(field.name()), Some(field));
        }
        assert_eq!(SettingsField::from_name("grid_size"), None);
        assert_eq!(
            Settings::FIELDS.to_vec(),
            SettingsField::ALL.iter().map(|f| f.name()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_record_round_trip() {
        let settings = Settings::with_pacing(3, 4, 6).with_grid_size(11, 12).with_players(3);
        let record = parse_record(&settings.to_json()).unwrap();

        let mut restored = Settings::default();
        assert!(restored.apply_record(&record).is_empty());
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_record_with_corrupt_field() {
        let record = parse_record(r#"{"rounds_number": 0, "generations_per_round": "7"}"#).unwrap();
        let mut settings = Settings::default();

        let rejected = settings.apply_record(&record);

        assert_eq!(rejected, vec!["rounds_number".to_string()]);
        assert_eq!(settings.rounds_number(), 10);
        assert_eq!(settings.generations_per_round(), 7);
    }
}
