//! Grid tests - placement, lookup and bookkeeping

use twenty48::core::{Grid, GridError, Tile};
use twenty48::types::{TileId, CELL_HEIGHT, CELL_WIDTH, GRID_CELLS, GRID_COLS, GRID_ROWS};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new();
    assert_eq!(grid.rows(), GRID_ROWS);
    assert_eq!(grid.cols(), GRID_COLS);
    assert!(grid.is_empty());
    assert!(!grid.is_full());

    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            assert!(grid.get(row, col).is_none(), "cell ({}, {}) should be empty", row, col);
        }
    }
}

#[test]
fn test_grid_get_out_of_bounds() {
    let grid = Grid::from_cells(&[(3, 3, 2)]).unwrap();
    assert!(grid.get(GRID_ROWS, 0).is_none());
    assert!(grid.get(0, GRID_COLS).is_none());
    assert!(grid.get(3, 3).is_some());
}

#[test]
fn test_tile_rests_at_cell_origin() {
    let grid = Grid::from_cells(&[(2, 1, 16)]).unwrap();
    let tile = grid.get(2, 1).copied().unwrap();
    assert_eq!(tile.x, CELL_WIDTH);
    assert_eq!(tile.y, 2 * CELL_HEIGHT);
    assert!(tile.is_at_rest());
}

#[test]
fn test_place_and_remove() {
    let mut grid = Grid::new();
    grid.place(Tile::new(TileId(7), 8, 1, 2)).unwrap();
    assert_eq!(grid.len(), 1);
    assert_eq!(grid.get(1, 2).map(|t| t.id), Some(TileId(7)));

    let removed = grid.remove(1, 2).unwrap();
    assert_eq!(removed.value, 8);
    assert!(grid.is_empty());
    assert!(grid.remove(1, 2).is_none());
}

#[test]
fn test_from_cells_rejects_duplicates() {
    let err = Grid::from_cells(&[(0, 0, 2), (0, 0, 4)]).unwrap_err();
    assert_eq!(err, GridError::Occupied { row: 0, col: 0 });
    assert_eq!(err.to_string(), "cell (0, 0) is already occupied");
}

#[test]
fn test_empty_cells_row_major() {
    let grid = Grid::from_cells(&[(0, 0, 2), (0, 2, 2)]).unwrap();
    let empty = grid.empty_cells();
    assert_eq!(empty.len(), GRID_CELLS - 2);
    assert_eq!(empty[0], (0, 1));
    assert_eq!(empty[1], (0, 3));
    assert_eq!(empty[2], (1, 0));
}

#[test]
fn test_values_and_totals() {
    let grid = Grid::from_cells(&[(0, 0, 2), (1, 3, 64), (3, 0, 8)]).unwrap();
    let values = grid.values();
    assert_eq!(values[0], [2, 0, 0, 0]);
    assert_eq!(values[1], [0, 0, 0, 64]);
    assert_eq!(values[3], [8, 0, 0, 0]);
    assert_eq!(grid.total_value(), 74);
    assert_eq!(grid.max_value(), 64);
    assert_eq!(grid.max_id(), Some(TileId(3)));
}

#[test]
fn test_clear() {
    let mut grid = Grid::from_cells(&[(0, 0, 2), (3, 3, 4)]).unwrap();
    grid.clear();
    assert!(grid.is_empty());
    assert_eq!(grid.max_value(), 0);
    assert_eq!(grid.max_id(), None);
}
