//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on rendering, input devices, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for replay and agents)
//! - **Testable**: Every rule is exercised without a window or a terminal
//! - **Fast**: Zero-allocation hot paths for tick processing
//!
//! # Module Structure
//!
//! - [`tile`]: A numbered tile with a logical cell and a pixel position
//! - [`grid`]: 4x4 cell-to-tile mapping
//! - [`slide`]: The tick-driven move engine (sort, advance, merge, settle)
//! - [`spawn`]: Opening tiles and one new tile after every effective move
//! - [`game_state`]: Input queue, in-flight move, game over and restart
//! - [`rng`]: Seeded LCG for reproducible spawns
//!
//! # Game Rules
//!
//! - **Sliding**: Every tile advances a fixed number of pixels per tick toward the
//!   chosen edge until a pass changes nothing
//! - **Merging**: Equal tiles merge into the one nearer the edge; the result cannot
//!   merge again during the same move
//! - **Spawning**: A move that changed something spawns one tile (2 or 4)
//! - **Game over**: The board is full and no direction can slide or merge
//!
//! # Example
//!
//! ```
//! use twenty48_core::{GameState, Grid};
//! use twenty48_types::GameAction;
//!
//! let grid = Grid::from_cells(&[(0, 0, 2), (0, 1, 2)]).unwrap();
//! let mut game = GameState::from_grid(12345, grid);
//!
//! // Slide left: the pair merges into a 4 and one new tile spawns
//! assert!(game.apply_action(GameAction::MoveLeft));
//! assert_eq!(game.grid().get(0, 0).map(|t| t.value), Some(4));
//! assert_eq!(game.grid().len(), 2);
//! ```
//!
//! # Timing
//!
//! The game uses a fixed timestep: call [`GameState::tick`](game_state::GameState::tick)
//! once every 16ms (about 60 FPS). Each tick runs exactly one pass of the in-flight move.

pub mod game_state;
pub mod grid;
pub mod rng;
pub mod slide;
pub mod snapshot;
pub mod spawn;
pub mod tile;

pub use twenty48_types as types;

// Re-export commonly used types for convenience
pub use game_state::GameState;
pub use grid::{Grid, GridError};
pub use rng::SimpleRng;
pub use slide::{apply_move, can_move, slide_to_rest, MoveOutcome, MoveTransaction, Slide};
pub use snapshot::{GameSnapshot, TileSnapshot};
pub use spawn::{random_empty_cell, seed_start_tiles, spawn_tile, SpawnPolicy};
pub use tile::{Rounding, Tile};
