//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, protocol adapter, benches).
//!
//! # Board Geometry
//!
//! The classic 2048 board:
//!
//! - **Grid**: 4 rows x 4 columns (indexed 0-3)
//! - **Cell size**: 200 x 200 pixels (an 800 x 800 board)
//! - **Velocity**: tiles slide 20 pixels per tick, so one cell takes 10 ticks
//!
//! Pixel positions only matter while a move is animating. At rest every tile sits
//! exactly at `(col * CELL_WIDTH, row * CELL_HEIGHT)`.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `MOVE_VEL` | 20 | Pixels a tile advances per tick |
//!
//! # Examples
//!
//! ```
//! use twenty48_types::{Direction, GameAction, GRID_COLS, GRID_ROWS};
//!
//! let action = GameAction::from_str("moveLeft").unwrap();
//! assert_eq!(action, GameAction::MoveLeft);
//! assert_eq!(action.direction(), Some(Direction::Left));
//!
//! // Restart carries no direction
//! assert_eq!(GameAction::Restart.direction(), None);
//!
//! assert_eq!(GRID_ROWS, 4);
//! assert_eq!(GRID_COLS, 4);
//! ```

/// Board height in cells (4 rows)
pub const GRID_ROWS: u8 = 4;

/// Board width in cells (4 columns)
pub const GRID_COLS: u8 = 4;

/// Total number of cells on the board
pub const GRID_CELLS: usize = (GRID_ROWS as usize) * (GRID_COLS as usize);

/// Width of one cell in pixels (800 / 4)
pub const CELL_WIDTH: i32 = 200;

/// Height of one cell in pixels (800 / 4)
pub const CELL_HEIGHT: i32 = 200;

/// Pixels a sliding tile advances per tick
pub const MOVE_VEL: i32 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Number of tiles placed on a fresh board
pub const START_TILE_COUNT: usize = 2;

/// Value of the tiles placed on a fresh board
pub const START_TILE_VALUE: u32 = 2;

/// Default chance (in percent) that a spawned tile is a 4 instead of a 2
pub const DEFAULT_FOUR_PERCENT: u8 = 10;

/// Maximum number of inputs waiting for the current move to settle
pub const MAX_PENDING_ACTIONS: usize = 8;


/// The four slide directions
///
/// - **Left**: toward column 0
/// - **Right**: toward the last column
/// - **Up**: toward row 0
/// - **Down**: toward the last row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in input order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("left"), Some(Direction::Left));
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These arrive from whatever front end drives the game and are queued
/// until the in-flight move (if any) settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Slide every tile toward column 0
    MoveLeft,
    /// Slide every tile toward the last column
    MoveRight,
    /// Slide every tile toward row 0
    MoveUp,
    /// Slide every tile toward the last row
    MoveDown,
    /// Clear the board and start over (always accepted, including after game over)
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// Accepts the camelCase protocol names and the bare direction words
    /// (case-insensitive). `escape` is an alias for restart.
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("up"), Some(GameAction::MoveUp));
    /// assert_eq!(GameAction::from_str("Restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "moveup" | "up" => Some(GameAction::MoveUp),
            "movedown" | "down" => Some(GameAction::MoveDown),
            "restart" | "escape" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for the protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::Restart => "restart",
        }
    }

    /// Slide direction carried by this action, `None` for restart
    pub fn direction(&self) -> Option<Direction> {
        match self {
            GameAction::MoveLeft => Some(Direction::Left),
            GameAction::MoveRight => Some(Direction::Right),
            GameAction::MoveUp => Some(Direction::Up),
            GameAction::MoveDown => Some(Direction::Down),
            GameAction::Restart => None,
        }
    }
}

impl From<Direction> for GameAction {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Left => GameAction::MoveLeft,
            Direction::Right => GameAction::MoveRight,
            Direction::Up => GameAction::MoveUp,
            Direction::Down => GameAction::MoveDown,
        }
    }
}

/// Identity of a tile within one game
///
/// Ids are handed out monotonically by the game state and never reused
/// until restart. A merge keeps the target's id; the absorbed tile's id retires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    pub fn get(self) -> u32 {
        self.0
    }
}
