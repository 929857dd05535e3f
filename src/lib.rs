//! 2048 (workspace facade crate).
//!
//! Exposes `twenty48::{core,adapter,types}` while the implementation lives in dedicated
//! crates under `crates/`.

pub use twenty48_adapter as adapter;
pub use twenty48_core as core;
pub use twenty48_types as types;
