//! Adapter module - drive the game over a line-delimited protocol
//!
//! The adapter is the boundary between the pure game core and whatever renders
//! it or feeds it input: a GUI shell, a test harness, or an agent piping through
//! stdin/stdout. It owns the tick loop; the core never touches I/O.
//!
//! # Protocol Overview
//!
//! One message per line in each direction.
//!
//! ## Driver → Game
//!
//! - A bare word: `left`, `right`, `up`, `down`, `moveLeft`…, `restart`
//!   (alias `escape`), `quit`
//! - A JSON command: `{"type":"command","seq":1,"action":"moveLeft"}`
//!
//! End of input behaves like `quit`. Either way, already queued moves still
//! settle before the session ends.
//!
//! ## Game → Driver
//!
//! - **observation**: Full state (cells, tiles with pixel positions, ids), sent on
//!   every tick that changed something, so a renderer can animate slides
//! - **move**: A settled move with its merge count and spawned tile; `moved:false`
//!   marks a rejected input
//! - **ack**: Command received (`queued`), or dropped because the input queue is
//!   full (`rejected`)
//! - **error**: `invalid_command` for lines that could not be parsed
//!
//! # Environment Variables
//!
//! - `TWENTY48_SEED`: RNG seed (default: derived from the clock)
//! - `TWENTY48_TICK_MS`: tick period, `0` for unpaced (default: 16)
//! - `TWENTY48_FOUR_PERCENT`: 2-vs-4 spawn weighting (default: 10)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Game   -> Driver: {"type":"observation","seq":1,"ts":...,"frame":0,"episode_id":0,...}
//! Driver -> Game:   {"type":"command","seq":1,"action":"moveLeft"}
//! Game   -> Driver: {"type":"ack","seq":2,"ts":...,"command_seq":1,"action":"moveLeft","status":"queued"}
//! Game   -> Driver: {"type":"observation","seq":3,"ts":...,"frame":1,"moving":"left",...}
//! ...
//! Game   -> Driver: {"type":"move","seq":33,"ts":...,"direction":"left","moved":true,"merges":1,...}
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;

pub use twenty48_core as core;
pub use twenty48_types as types;

pub use config::AdapterConfig;
pub use protocol::*;
pub use runtime::{run, spawn_reader, InboundEvent, RunSummary};
