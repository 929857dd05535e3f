//! Grid module - owns every tile of one game
//!
//! The grid is a 4x4 mapping from `(row, col)` to at most one tile.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: `(row, col)` where row ranges 0..3 (top to bottom), col ranges 0..3
//! (left to right).
//!
//! The grid never moves tiles on its own and holds no randomness; the move engine
//! drains it at the start of every pass and re-keys it at the end.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::tile::Tile;
use crate::types::{TileId, GRID_CELLS, GRID_COLS, GRID_ROWS};

/// Placement failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: u8, col: u8 },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: u8, col: u8 },
}

/// The game grid - 4 rows x 4 columns using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Option<Tile>; GRID_CELLS],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_CELLS],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    pub(crate) fn index(row: u8, col: u8) -> Option<usize> {
        if row >= GRID_ROWS || col >= GRID_COLS {
            return None;
        }
        Some(row as usize * GRID_COLS as usize + col as usize)
    }

    pub fn rows(&self) -> u8 {
        GRID_ROWS
    }

    pub fn cols(&self) -> u8 {
        GRID_COLS
    }

    /// Tile at (row, col), `None` if empty or out of bounds
    pub fn get(&self, row: u8, col: u8) -> Option<&Tile> {
        Self::index(row, col).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Put a tile into the cell named by its own coordinates
    pub fn place(&mut self, tile: Tile) -> Result<(), GridError> {
        let (row, col) = tile.cell();
        let idx = Self::index(row, col).ok_or(GridError::OutOfBounds { row, col })?;
        if self.cells[idx].is_some() {
            return Err(GridError::Occupied { row, col });
        }
        self.cells[idx] = Some(tile);
        Ok(())
    }

    /// Remove and return the tile at (row, col)
    pub fn remove(&mut self, row: u8, col: u8) -> Option<Tile> {
        Self::index(row, col).and_then(|idx| self.cells[idx].take())
    }

    /// Iterate occupied cells in row-major order
    ///
    /// Row-major is a storage detail; callers that need spatial ordering along a
    /// direction must sort.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Coordinates of every empty cell in row-major order
    pub fn empty_cells(&self) -> ArrayVec<(u8, u8), GRID_CELLS> {
        let mut out = ArrayVec::new();
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_none() {
                let row = (idx / GRID_COLS as usize) as u8;
                let col = (idx % GRID_COLS as usize) as u8;
                out.push((row, col));
            }
        }
        out
    }

    /// Drain every tile, leaving the grid empty
    pub fn take_all(&mut self) -> ArrayVec<Tile, GRID_CELLS> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }

    /// Rebuild the mapping from each tile's own coordinates
    ///
    /// Two tiles claiming one cell means the move engine broke its own invariant;
    /// that is not recoverable.
    pub fn rekey<I: IntoIterator<Item = Tile>>(&mut self, tiles: I) {
        self.clear();
        for tile in tiles {
            let placed = self.place(tile);
            assert!(placed.is_ok(), "grid re-key failed: {:?}", placed);
        }
    }

    /// Sum of all tile values
    pub fn total_value(&self) -> u32 {
        self.tiles().map(|t| t.value).sum()
    }

    /// Largest tile value, 0 on an empty grid
    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// Largest tile id in use
    pub fn max_id(&self) -> Option<TileId> {
        self.tiles().map(|t| t.id).max()
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from `(row, col, value)` triples, ids assigned in order from 1
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_core::Grid;
    ///
    /// let grid = Grid::from_cells(&[(0, 0, 2), (0, 1, 2)]).unwrap();
    /// assert_eq!(grid.len(), 2);
    /// assert_eq!(grid.get(0, 1).map(|t| t.value), Some(2));
    /// ```
    pub fn from_cells(cells: &[(u8, u8, u32)]) -> Result<Self, GridError> {
        let mut grid = Self::new();
        for (i, &(row, col, value)) in cells.iter().enumerate() {
            grid.place(Tile::new(TileId(i as u32 + 1), value, row, col))?;
        }
        Ok(grid)
    }

    /// Tile values as a 2D array (0 = empty)
    pub fn values(&self) -> [[u32; GRID_COLS as usize]; GRID_ROWS as usize] {
        let mut out = [[0u32; GRID_COLS as usize]; GRID_ROWS as usize];
        for tile in self.tiles() {
            out[tile.row as usize][tile.col as usize] = tile.value;
        }
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(0, 3), Some(3));
        assert_eq!(Grid::index(1, 0), Some(4));
        assert_eq!(Grid::index(3, 3), Some(15));
        assert_eq!(Grid::index(4, 0), None);
        assert_eq!(Grid::index(0, 4), None);
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut grid = Grid::new();
        assert!(grid.place(Tile::new(TileId(1), 2, 1, 1)).is_ok());
        assert_eq!(
            grid.place(Tile::new(TileId(2), 4, 1, 1)),
            Err(GridError::Occupied { row: 1, col: 1 })
        );
        assert_eq!(grid.get(1, 1).map(|t| t.value), Some(2));
    }

    #[test]
    fn test_place_rejects_out_of_bounds() {
        let mut grid = Grid::new();
        let mut tile = Tile::new(TileId(1), 2, 0, 0);
        tile.row = 4;
        assert_eq!(
            grid.place(tile),
            Err(GridError::OutOfBounds { row: 4, col: 0 })
        );
    }

    #[test]
    fn test_take_all_then_rekey() {
        let mut grid = Grid::from_cells(&[(0, 0, 2), (2, 3, 8)]).unwrap();
        let mut tiles = grid.take_all();
        assert!(grid.is_empty());

        tiles[0].col = 1;
        tiles[0].snap_to_cell();
        grid.rekey(tiles);

        assert!(grid.get(0, 0).is_none());
        assert_eq!(grid.get(0, 1).map(|t| t.value), Some(2));
        assert_eq!(grid.get(2, 3).map(|t| t.value), Some(8));
    }

    #[test]
    #[should_panic(expected = "grid re-key failed")]
    fn test_rekey_collision_is_fatal() {
        let mut grid = Grid::new();
        grid.rekey([
            Tile::new(TileId(1), 2, 0, 0),
            Tile::new(TileId(2), 2, 0, 0),
        ]);
    }

    #[test]
    fn test_empty_cells_and_full() {
        let mut grid = Grid::new();
        assert_eq!(grid.empty_cells().len(), GRID_CELLS);
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let id = TileId((row * GRID_COLS + col) as u32);
                grid.place(Tile::new(id, 2, row, col)).unwrap();
            }
        }
        assert!(grid.is_full());
        assert!(grid.empty_cells().is_empty());
        assert_eq!(grid.total_value(), 32);
    }
}
