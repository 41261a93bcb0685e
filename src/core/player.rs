//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Ids are 1-based because the grid stores
//! the owning player's id in each cell and reserves `0` for empty cells.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by a `Vec` with one slot per id plus an
//! unused slot 0, so the layout matches the persisted counts array.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest supported number of players in a match.
pub const MAX_PLAYERS: u8 = 5;

/// Player identifier, `1..=MAX_PLAYERS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Build a player ID from a raw value, rejecting `0` and out-of-range ids.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        if (1..=i64::from(MAX_PLAYERS)).contains(&raw) {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    /// Get the raw id, which is also the value stored in owned grid cells.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Get the slot of this player in a `PlayerMap`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a match with `player_count` players.
    ///
    /// ```
    /// use life_arena::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use life_arena::core::{PlayerId, PlayerMap};
///
/// let mut cells: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// cells[PlayerId::new(2)] += 3;
///
/// assert_eq!(cells[PlayerId::new(2)], 3);
/// assert_eq!(cells.as_slice(), &[0, 0, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory is also called once with `PlayerId(0)` for the
    /// placeholder slot.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count <= MAX_PLAYERS as usize, "At most 5 players supported");

        let data = (0..=player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len() - 1
    }

    /// Get a reference to a player's data, `None` for unknown ids.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data, `None` for unknown ids.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs, skipping the placeholder slot.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Raw storage, placeholder slot included.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);

        assert_eq!(p1.index(), 1);
        assert_eq!(p1.raw(), 1);
        assert_eq!(format!("{}", p1), "player 1");
    }

    #[test]
    fn test_player_id_from_raw() {
        assert_eq!(PlayerId::from_raw(3), Some(PlayerId::new(3)));
        assert_eq!(PlayerId::from_raw(0), None);
        assert_eq!(PlayerId::from_raw(-2), None);
        assert_eq!(PlayerId::from_raw(6), None);
    }

    #[test]
    fn test_player_id_all() {
        let players: Vec<_> = PlayerId::all(4).collect();
        assert_eq!(players.len(), 4);
        assert_eq!(players[0], PlayerId::new(1));
        assert_eq!(players[3], PlayerId::new(4));
    }

    #[test]
    fn test_player_map_placeholder_slot() {
        let map: PlayerMap<u32> = PlayerMap::new(3, |p| p.raw() as u32 * 10);

        assert_eq!(map.player_count(), 3);
        assert_eq!(map.as_slice(), &[0, 10, 20, 30]);
        assert_eq!(map[PlayerId::new(2)], 20);
    }

    #[test]
    fn test_player_map_get_unknown() {
        let map: PlayerMap<u32> = PlayerMap::with_value(2, 0);
        assert_eq!(map.get(PlayerId::new(2)), Some(&0));
        assert_eq!(map.get(PlayerId::new(3)), None);
    }

    #[test]
    fn test_player_map_iter_skips_placeholder() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |p| p.raw() as u32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(1), &1), (PlayerId::new(2), &2)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |p| p.raw() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "At most 5 players supported")]
    fn test_player_map_too_many_players() {
        let _: PlayerMap<u32> = PlayerMap::with_value(6, 0);
    }
}
