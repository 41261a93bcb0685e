//! Property-based tests for placement and generation steps.
//!
//! Random move sequences must never resize the grid, overwrite an owned
//! cell or push the placement counter past the per-turn allowance.
use life_arena::core::{parse_record, GameRng, Grid, MatchState, PlayerId, Schema, Settings};
use life_arena::rules::evolution::generation_step;
use life_arena::rules::RulesEngine;
use proptest::prelude::*;

// Strategy for a rectangular grid owned by players 1..=3
fn grid_strategy() -> impl Strategy<Value = Grid> {
    (1usize..8, 1usize..8)
        .prop_flat_map(|(w, h)| prop::collection::vec(prop::collection::vec(0i64..=3, w), h))
        .prop_map(|rows| Grid::from_rows(&rows).unwrap())
}

// Strategy for a turn order: a permutation of 1..=n
fn order_strategy() -> impl Strategy<Value = Vec<PlayerId>> {
    (1usize..=3)
        .prop_flat_map(|n| Just(PlayerId::all(n).collect::<Vec<_>>()).prop_shuffle())
}

// Strategy for a sequence of placement attempts, some off the grid
fn moves_strategy() -> impl Strategy<Value = Vec<(i64, i64, u8)>> {
    prop::collection::vec((-2i64..12, -2i64..12, 1u8..=3), 0..120)
}

proptest! {
    #[test]
    fn test_placements_keep_invariants(seed in any::<u64>(), moves in moves_strategy()) {
        let settings = Settings::with_pacing(2, 2, 5).with_grid_size(10, 10).with_players(3);
        let mut engine = RulesEngine::new(settings, GameRng::new(seed));

        for (x, y, player) in moves {
            let before = engine.state().clone();
            let result = engine.place_cell(x, y, PlayerId::new(player));
            let state = engine.state();

            prop_assert_eq!(state.grid().width(), 10);
            prop_assert_eq!(state.grid().height(), 10);
            prop_assert!(state.cells_placed_this_turn() <= 5);

            match result {
                Ok(()) => {
                    let (x, y) = (x as usize, y as usize);
                    prop_assert_eq!(before.grid().get(x, y), Some(0));
                    prop_assert_eq!(state.grid().get(x, y), Some(player));
                    // Every other cell is untouched
                    let changed = before
                        .grid()
                        .cells()
                        .iter()
                        .zip(state.grid().cells())
                        .filter(|(a, b)| a != b)
                        .count();
                    prop_assert_eq!(changed, 1);
                }
                Err(_) => prop_assert_eq!(&before, state),
            }
        }
    }

    #[test]
    fn test_generation_step_keeps_shape(grid in grid_strategy(), order in order_strategy()) {
        let mut next = grid.clone();
        generation_step(&mut next, &order);

        prop_assert_eq!(next.width(), grid.width());
        prop_assert_eq!(next.height(), grid.height());
        for &cell in next.cells() {
            let known = cell == 0
                || order.iter().any(|p| p.raw() == cell)
                || grid.cells().contains(&cell);
            prop_assert!(known, "unexpected owner {}", cell);
        }
    }

    #[test]
    fn test_empty_grid_is_fixed_point(w in 1usize..20, h in 1usize..20, order in order_strategy()) {
        let mut grid = Grid::new(w, h);
        generation_step(&mut grid, &order);
        prop_assert_eq!(grid, Grid::new(w, h));
    }

    #[test]
    fn test_state_record_reload(seed in any::<u64>(), moves in moves_strategy()) {
        let settings = Settings::with_pacing(2, 2, 5).with_grid_size(10, 10).with_players(3);
        let mut engine = RulesEngine::new(settings, GameRng::new(seed));
        for (x, y, player) in moves {
            let _ = engine.place_cell(x, y, PlayerId::new(player));
        }

        let record = parse_record(&engine.state().to_json()).unwrap();
        prop_assert_eq!(&MatchState::from_record(&record), engine.state());
    }
}
