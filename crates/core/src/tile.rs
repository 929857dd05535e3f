//! Tile module - a single numbered cell occupant
//!
//! A tile carries both its logical cell `(row, col)` and its pixel position `(x, y)`.
//! The two agree whenever no move is in flight; during a move the pixel position
//! leads and the logical cell is recomputed from it after every advance.

use crate::types::{TileId, CELL_HEIGHT, CELL_WIDTH};

/// How a pixel position maps back onto a cell index
///
/// A sliding tile takes over the cell it is entering as soon as it crosses into it,
/// so leftward/upward motion rounds up and rightward/downward motion rounds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Ceil,
    Floor,
}

impl Rounding {
    #[inline]
    fn cell_of(self, pos: i32, extent: i32) -> u8 {
        let cell = match self {
            Rounding::Ceil => (pos + extent - 1).div_euclid(extent),
            Rounding::Floor => pos.div_euclid(extent),
        };
        cell.max(0) as u8
    }
}

/// A numbered tile (value is always a power of two, at least 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: u8,
    pub col: u8,
    pub x: i32,
    pub y: i32,
}

impl Tile {
    /// Create a tile at rest in the given cell
    pub fn new(id: TileId, value: u32, row: u8, col: u8) -> Self {
        debug_assert!(value >= 2 && value.is_power_of_two());
        Self {
            id,
            value,
            row,
            col,
            x: col as i32 * CELL_WIDTH,
            y: row as i32 * CELL_HEIGHT,
        }
    }

    /// Pixel position matches the logical cell exactly
    pub fn is_at_rest(&self) -> bool {
        self.x == self.col as i32 * CELL_WIDTH && self.y == self.row as i32 * CELL_HEIGHT
    }

    /// Move the pixel position onto the logical cell
    pub fn snap_to_cell(&mut self) {
        self.x = self.col as i32 * CELL_WIDTH;
        self.y = self.row as i32 * CELL_HEIGHT;
    }

    /// Shift the pixel position without touching the logical cell
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Recompute the logical cell from the pixel position
    pub fn relocate(&mut self, rounding: Rounding) {
        self.row = rounding.cell_of(self.y, CELL_HEIGHT);
        self.col = rounding.cell_of(self.x, CELL_WIDTH);
    }

    pub fn cell(&self) -> (u8, u8) {
        (self.row, self.col)
    }
}
