//! Slide module - the tick-driven move engine
//!
//! A move is not an atomic transform. It is a fixed-step simulation: every tick each
//! tile advances up to [`MOVE_VEL`] pixels toward the target edge, merging into an
//! equal neighbor once it gets within one tick of it, until a whole pass changes
//! nothing. Renderers see every intermediate pass.
//!
//! All four directions share one algorithm; [`Slide`] carries the few things that
//! differ (axis, sign, rounding) and every predicate is derived from those.
//!
//! # Pass rules
//!
//! Tiles are processed nearest-edge first so a tile is never blocked by a neighbor
//! that has yet to move this pass. For each tile:
//!
//! 1. On the boundary: skip.
//! 2. No neighbor in the next cell: advance.
//! 3. Equal neighbor, neither consumed by a merge this move: advance, or merge when
//!    a full tick would reach the neighbor.
//! 4. Otherwise: advance if a full tick leaves the tiles non-overlapping, else close
//!    the remaining gap and stop.
//!
//! An advance never carries a tile past the rest position of the cell ahead of it.
//! Neighbor lookups use the grid as keyed at the start of the pass. The grid is
//! re-keyed from each tile's own coordinates once the pass ends.

use std::cmp::Reverse;

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::grid::Grid;
use crate::tile::{Rounding, Tile};
use crate::types::{
    Direction, TileId, CELL_HEIGHT, CELL_WIDTH, GRID_CELLS, GRID_COLS, GRID_ROWS, MOVE_VEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Direction-parameterized sliding rules, chosen once per move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    direction: Direction,
    axis: Axis,
    /// -1 toward index 0, +1 toward the far edge
    sign: i32,
    velocity: i32,
}

impl Slide {
    pub fn new(direction: Direction) -> Self {
        Self::with_velocity(direction, MOVE_VEL)
    }

    /// Slide with a custom per-tick velocity (pixels, at least 1)
    pub fn with_velocity(direction: Direction, velocity: i32) -> Self {
        let (axis, sign) = match direction {
            Direction::Left => (Axis::Horizontal, -1),
            Direction::Right => (Axis::Horizontal, 1),
            Direction::Up => (Axis::Vertical, -1),
            Direction::Down => (Axis::Vertical, 1),
        };
        Self {
            direction,
            axis,
            sign,
            velocity: velocity.max(1),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell index along the axis of travel (column for left/right, row for up/down)
    pub fn sort_key(&self, tile: &Tile) -> u8 {
        match self.axis {
            Axis::Horizontal => tile.col,
            Axis::Vertical => tile.row,
        }
    }

    /// Order tiles nearest-edge first (stable, so ties keep row-major order)
    pub fn sort(&self, tiles: &mut [Tile]) {
        if self.sign < 0 {
            tiles.sort_by_key(|t| self.sort_key(t));
        } else {
            tiles.sort_by_key(|t| Reverse(self.sort_key(t)));
        }
    }

    /// Per-tick displacement vector
    pub fn delta(&self) -> (i32, i32) {
        self.scaled(self.velocity)
    }

    /// Rounding that hands a tile the cell it is entering
    pub fn rounding(&self) -> Rounding {
        if self.sign < 0 {
            Rounding::Ceil
        } else {
            Rounding::Floor
        }
    }

    /// Tile already touches the target edge
    pub fn at_boundary(&self, tile: &Tile) -> bool {
        let lane = self.sort_key(tile);
        if self.sign < 0 {
            lane == 0
        } else {
            lane + 1 >= self.lane_len()
        }
    }

    /// The cell one step toward the target edge, `None` on the boundary
    pub fn neighbor_cell(&self, tile: &Tile) -> Option<(u8, u8)> {
        if self.at_boundary(tile) {
            return None;
        }
        let (row, col) = tile.cell();
        Some(match self.direction {
            Direction::Left => (row, col - 1),
            Direction::Right => (row, col + 1),
            Direction::Up => (row - 1, col),
            Direction::Down => (row + 1, col),
        })
    }

    /// A full tick would carry `tile` onto (or past) its equal-valued neighbor
    pub fn would_overshoot_merge(&self, tile: &Tile, neighbor: &Tile) -> bool {
        self.gap(tile, neighbor) <= self.velocity
    }

    /// A full tick would make `tile` overlap a neighbor it cannot merge with
    pub fn would_overshoot_move(&self, tile: &Tile, neighbor: &Tile) -> bool {
        self.gap(tile, neighbor) - self.velocity < self.extent()
    }

    /// Upper bound on passes for one move: crossing every cell of a lane, plus the
    /// pass that observes nothing changed
    pub fn max_ticks(&self) -> u32 {
        let per_cell = (self.extent() + self.velocity - 1) / self.velocity;
        self.lane_len() as u32 * per_cell as u32 + 1
    }

    fn lane_len(&self) -> u8 {
        match self.axis {
            Axis::Horizontal => GRID_COLS,
            Axis::Vertical => GRID_ROWS,
        }
    }

    fn extent(&self) -> i32 {
        match self.axis {
            Axis::Horizontal => CELL_WIDTH,
            Axis::Vertical => CELL_HEIGHT,
        }
    }

    fn pixel(&self, tile: &Tile) -> i32 {
        match self.axis {
            Axis::Horizontal => tile.x,
            Axis::Vertical => tile.y,
        }
    }

    fn scaled(&self, distance: i32) -> (i32, i32) {
        match self.axis {
            Axis::Horizontal => (self.sign * distance, 0),
            Axis::Vertical => (0, self.sign * distance),
        }
    }

    /// Pixels between the origins of `tile` and the neighbor ahead of it
    fn gap(&self, tile: &Tile, neighbor: &Tile) -> i32 {
        (self.pixel(tile) - self.pixel(neighbor)) * -self.sign
    }

    /// Pixels until `tile` rests in the cell ahead of it, 0 on the boundary
    fn room_ahead(&self, tile: &Tile) -> i32 {
        let Some((row, col)) = self.neighbor_cell(tile) else {
            return 0;
        };
        let origin = match self.axis {
            Axis::Horizontal => col as i32 * CELL_WIDTH,
            Axis::Vertical => row as i32 * CELL_HEIGHT,
        };
        (self.pixel(tile) - origin) * -self.sign
    }

    /// Advance up to `distance` pixels without skipping past the cell ahead.
    /// Returns whether the tile moved.
    fn advance(&self, tile: &mut Tile, distance: i32) -> bool {
        let distance = distance.min(self.room_ahead(tile));
        if distance <= 0 {
            return false;
        }
        let (dx, dy) = self.scaled(distance);
        tile.translate(dx, dy);
        tile.relocate(self.rounding());
        true
    }
}

/// Result of a settled move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub direction: Direction,
    /// At least one tile was displaced or merged
    pub moved: bool,
    pub merges: u32,
    /// Passes run, including the final one that changed nothing
    pub ticks: u32,
}

impl MoveOutcome {
    /// A rejected input: nothing could slide or merge
    pub fn is_noop(&self) -> bool {
        !self.moved
    }
}

/// One in-flight move
///
/// Lives from the directional input until the simulation reaches a fixed point.
/// The consumed set holds every tile that has absorbed a merge this move; such a
/// tile cannot take part in another merge until the next move.
#[derive(Debug, Clone)]
pub struct MoveTransaction {
    slide: Slide,
    consumed: ArrayVec<TileId, GRID_CELLS>,
    ticks: u32,
    merges: u32,
    moved: bool,
    settled: bool,
}

impl MoveTransaction {
    pub fn new(direction: Direction) -> Self {
        Self::with_slide(Slide::new(direction))
    }

    pub fn with_slide(slide: Slide) -> Self {
        Self {
            slide,
            consumed: ArrayVec::new(),
            ticks: 0,
            merges: 0,
            moved: false,
            settled: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.slide.direction()
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Tile already absorbed a merge this move
    pub fn is_consumed(&self, id: TileId) -> bool {
        self.consumed.contains(&id)
    }

    pub fn outcome(&self) -> MoveOutcome {
        MoveOutcome {
            direction: self.slide.direction(),
            moved: self.moved,
            merges: self.merges,
            ticks: self.ticks,
        }
    }

    /// Run one pass over every tile. Returns whether anything moved or merged.
    pub fn step(&mut self, grid: &mut Grid) -> bool {
        if self.settled {
            return false;
        }

        let slide = self.slide;
        let mut tiles = grid.take_all();
        slide.sort(&mut tiles);

        // Cell -> index into `tiles`, keyed as the pass began.
        let mut lookup: [Option<usize>; GRID_CELLS] = [None; GRID_CELLS];
        for (i, tile) in tiles.iter().enumerate() {
            if let Some(idx) = Grid::index(tile.row, tile.col) {
                lookup[idx] = Some(i);
            }
        }
        let mut absorbed = [false; GRID_CELLS];
        let mut changed = false;

        for i in 0..tiles.len() {
            let tile = tiles[i];
            let Some((row, col)) = slide.neighbor_cell(&tile) else {
                continue;
            };
            let Some(j) = Grid::index(row, col).and_then(|idx| lookup[idx]) else {
                changed |= slide.advance(&mut tiles[i], slide.velocity);
                continue;
            };

            let next = tiles[j];
            let mergeable = tile.value == next.value
                && !self.is_consumed(tile.id)
                && !self.is_consumed(next.id);

            if mergeable {
                if slide.would_overshoot_merge(&tile, &next) {
                    tiles[j].value *= 2;
                    absorbed[i] = true;
                    // Tiles behind see this cell as empty for the rest of the pass.
                    if let Some(idx) = Grid::index(tile.row, tile.col) {
                        lookup[idx] = None;
                    }
                    self.consumed.push(next.id);
                    self.merges += 1;
                    changed = true;
                } else {
                    changed |= slide.advance(&mut tiles[i], slide.velocity);
                }
            } else if !slide.would_overshoot_move(&tile, &next) {
                changed |= slide.advance(&mut tiles[i], slide.velocity);
            } else {
                let slack = slide.gap(&tile, &next) - slide.extent();
                changed |= slide.advance(&mut tiles[i], slack);
            }
        }

        grid.rekey(
            tiles
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !absorbed[*i])
                .map(|(_, tile)| tile),
        );

        self.ticks += 1;
        if changed {
            self.moved = true;
        } else {
            self.settled = true;
        }

        if !self.settled && self.ticks >= slide.max_ticks() {
            warn!(
                "{} move still sliding after {} ticks; snapping tiles to their cells",
                slide.direction().as_str(),
                self.ticks
            );
            let mut tiles = grid.take_all();
            for tile in tiles.iter_mut() {
                tile.snap_to_cell();
            }
            grid.rekey(tiles);
            self.settled = true;
        }

        if self.settled {
            debug_assert!(grid.tiles().all(Tile::is_at_rest));
            debug!(
                "{} settled: moved={} merges={} ticks={}",
                slide.direction().as_str(),
                self.moved,
                self.merges,
                self.ticks
            );
        }

        changed
    }
}

/// Run a move to rest, calling `on_tick` with the grid after every pass
pub fn apply_move<F>(grid: &mut Grid, direction: Direction, mut on_tick: F) -> MoveOutcome
where
    F: FnMut(&Grid),
{
    let mut txn = MoveTransaction::new(direction);
    while !txn.is_settled() {
        txn.step(grid);
        on_tick(grid);
    }
    txn.outcome()
}

/// Run a move to rest without observing intermediate passes
pub fn slide_to_rest(grid: &mut Grid, direction: Direction) -> MoveOutcome {
    apply_move(grid, direction, |_| {})
}

/// Whether a move in `direction` would change anything
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    let mut probe = grid.clone();
    !slide_to_rest(&mut probe, direction).is_noop()
}
