use arrayvec::ArrayVec;

use crate::tile::Tile;
use crate::types::{Direction, GRID_CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: u32,
    pub value: u32,
    pub row: u8,
    pub col: u8,
    pub x: i32,
    pub y: i32,
}

impl From<Tile> for TileSnapshot {
    fn from(value: Tile) -> Self {
        Self {
            id: value.id.get(),
            value: value.value,
            row: value.row,
            col: value.col,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Row-major by logical cell
    pub tiles: ArrayVec<TileSnapshot, GRID_CELLS>,
    pub moving: Option<Direction>,
    pub game_over: bool,
    pub episode_id: u32,
    pub move_id: u32,
    pub frame: u32,
    pub seed: u32,
    pub pending: u8,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }

    pub fn total_value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).sum()
    }

    pub fn max_value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    pub fn value_at(&self, row: u8, col: u8) -> Option<u32> {
        self.tiles
            .iter()
            .find(|t| t.row == row && t.col == col)
            .map(|t| t.value)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tiles: ArrayVec::new(),
            moving: None,
            game_over: false,
            episode_id: 0,
            move_id: 0,
            frame: 0,
            seed: 0,
            pending: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;
    use crate::grid::Grid;

    #[test]
    fn test_snapshot_values() {
        let grid = Grid::from_cells(&[(0, 0, 2), (1, 3, 8), (3, 2, 32)]).unwrap();
        let snapshot = GameState::from_grid(1, grid).snapshot();

        assert_eq!(snapshot.value_at(0, 0), Some(2));
        assert_eq!(snapshot.value_at(1, 3), Some(8));
        assert_eq!(snapshot.value_at(3, 2), Some(32));
        assert_eq!(snapshot.value_at(2, 2), None);
        assert_eq!(snapshot.total_value(), 42);
        assert_eq!(snapshot.max_value(), 32);
        assert!(snapshot.playable());
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let snapshot = GameSnapshot::default();
        assert!(snapshot.tiles.is_empty());
        assert_eq!(snapshot.value_at(0, 0), None);
        assert_eq!(snapshot.max_value(), 0);
    }
}
