//! Live-cell counts and the leader set.

use crate::core::{Grid, Leaders, Phase, PlayerId, PlayerMap};

/// Count live cells per player. Cells owned by ids above `player_count`
/// are ignored.
#[must_use]
pub fn count_cells(grid: &Grid, player_count: usize) -> PlayerMap<u32> {
    let mut counts = PlayerMap::with_value(player_count, 0);
    for &cell in grid.cells() {
        if cell > 0 {
            if let Some(count) = counts.get_mut(PlayerId::new(cell)) {
                *count += 1;
            }
        }
    }
    counts
}

/// Players with the strictly highest positive count, ascending by id.
///
/// Returns `[0]` when nobody has a live cell.
#[must_use]
pub fn compute_leaders(counts: &PlayerMap<u32>) -> Leaders {
    let mut leaders = Leaders::new();
    leaders.push(0);
    let mut best = 0;

    for (player, &count) in counts.iter() {
        if count > best {
            leaders.clear();
            leaders.push(player.raw());
            best = count;
        } else if count > 0 && count == best {
            leaders.push(player.raw());
        }
    }

    leaders
}

/// Structured view of a leader set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Standing {
    /// No generation has been scored yet.
    Unscored,
    /// Nobody has any live cells.
    NoLife,
    /// A single player leads.
    Leader(PlayerId),
    /// Several players share the lead.
    Tie(Vec<PlayerId>),
}

impl Standing {
    /// Interpret a persisted leader set.
    #[must_use]
    pub fn from_leaders(leaders: &[u8]) -> Self {
        match leaders {
            [] => Standing::Unscored,
            [0] => Standing::NoLife,
            [id] => Standing::Leader(PlayerId::new(*id)),
            ids => Standing::Tie(ids.iter().map(|&id| PlayerId::new(id)).collect()),
        }
    }

    /// Human-readable summary: "leader" while the match runs, "winner"
    /// once it has finished.
    #[must_use]
    pub fn message(&self, phase: Phase) -> String {
        match self {
            Standing::Tie(players) => {
                let ids: Vec<String> = players.iter().map(|p| p.raw().to_string()).collect();
                format!("Tie between players {}", ids.join(", "))
            }
            Standing::Leader(player) => {
                let title = if phase == Phase::Finished { "Winner" } else { "Leader" };
                format!("{}: {}", title, player)
            }
            Standing::Unscored | Standing::NoLife => "No life present".to_string(),
        }
    }
}
