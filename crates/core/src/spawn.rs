//! Spawn module - new tiles after a settled move, and the opening position
//!
//! Placement is uniform over empty cells. The 2-vs-4 weighting is a policy knob:
//! the default favors 2 at 90/10, [`SpawnPolicy::uniform`] flips a fair coin.

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::tile::Tile;
use crate::types::{TileId, DEFAULT_FOUR_PERCENT, START_TILE_COUNT, START_TILE_VALUE};

/// Value weighting for spawned tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPolicy {
    four_percent: u8,
}

impl SpawnPolicy {
    /// Chance (0..=100, clamped) that a spawned tile is a 4
    pub const fn new(four_percent: u8) -> Self {
        let four_percent = if four_percent > 100 { 100 } else { four_percent };
        Self { four_percent }
    }

    /// Equal odds for 2 and 4
    pub const fn uniform() -> Self {
        Self::new(50)
    }

    pub fn four_percent(&self) -> u8 {
        self.four_percent
    }

    /// Draw the value of the next spawned tile
    pub fn draw_value(&self, rng: &mut SimpleRng) -> u32 {
        if rng.chance_percent(self.four_percent) {
            4
        } else {
            2
        }
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FOUR_PERCENT)
    }
}

/// Pick an empty cell uniformly at random
///
/// Returns `None` only for a full grid, which callers must rule out first.
pub fn random_empty_cell(grid: &Grid, rng: &mut SimpleRng) -> Option<(u8, u8)> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let pick = rng.next_range(empty.len() as u32) as usize;
    empty.get(pick).copied()
}

/// Place one new tile with a policy-drawn value at a random empty cell
pub fn spawn_tile(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    policy: &SpawnPolicy,
    id: TileId,
) -> Option<Tile> {
    let (row, col) = random_empty_cell(grid, rng)?;
    let tile = Tile::new(id, policy.draw_value(rng), row, col);
    let placed = grid.place(tile);
    assert!(placed.is_ok(), "spawn onto a drawn empty cell failed: {:?}", placed);
    Some(tile)
}

/// Place the opening tiles (two 2s) on distinct random cells
///
/// Ids are taken from `first_id` upward. Returns how many tiles were placed.
pub fn seed_start_tiles(grid: &mut Grid, rng: &mut SimpleRng, first_id: u32) -> usize {
    let mut placed = 0;
    for i in 0..START_TILE_COUNT {
        let Some((row, col)) = random_empty_cell(grid, rng) else {
            break;
        };
        let tile = Tile::new(TileId(first_id + i as u32), START_TILE_VALUE, row, col);
        let result = grid.place(tile);
        assert!(result.is_ok(), "opening tile placement failed: {:?}", result);
        placed += 1;
    }
    placed
}
