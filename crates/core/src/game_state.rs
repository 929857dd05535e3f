//! Game state module - manages the complete game state
//!
//! This module ties together the grid, the move engine, the RNG and the spawn policy.
//! It owns the input queue and advances in-flight moves one pass per tick.
//!
//! # Lifecycle
//!
//! 1. A fresh game holds two 2-tiles at random cells.
//! 2. Directional input is queued. When no move is in flight, the next queued action
//!    starts on the following tick.
//! 3. Each tick runs one pass of the in-flight move. When it settles with at least
//!    one tile displaced or merged, either the game ends (grid full) or one new tile
//!    spawns. A no-op move is a rejected input: no spawn, no turn.
//! 4. Game over drops every move until a restart.
//!
//! A restart queued behind a move waits until that move settles.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::slide::{can_move, MoveOutcome, MoveTransaction};
use crate::snapshot::{GameSnapshot, TileSnapshot};
use crate::spawn::{seed_start_tiles, spawn_tile, SpawnPolicy};
use crate::tile::Tile;
use crate::types::{Direction, GameAction, TileId, MAX_PENDING_ACTIONS};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    rng: SimpleRng,
    spawn_policy: SpawnPolicy,
    seed: u32,
    next_tile_id: u32,
    /// Inputs waiting for the in-flight move to settle (FIFO).
    pending: ArrayVec<GameAction, MAX_PENDING_ACTIONS>,
    active: Option<MoveTransaction>,
    /// Outcome of the most recently settled move (consumed by observers).
    last_outcome: Option<MoveOutcome>,
    last_spawn: Option<Tile>,
    game_over: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Effective moves this episode (no-ops don't count).
    move_id: u32,
    /// Ticks since creation.
    frame: u32,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_policy(seed, SpawnPolicy::default())
    }

    /// Create a new game with a custom 2-vs-4 weighting
    pub fn with_policy(seed: u32, spawn_policy: SpawnPolicy) -> Self {
        let mut state = Self::from_grid_with_policy(seed, Grid::new(), spawn_policy);
        state.seed_board();
        state
    }

    /// Continue from an existing grid; no opening tiles are added
    pub fn from_grid(seed: u32, grid: Grid) -> Self {
        Self::from_grid_with_policy(seed, grid, SpawnPolicy::default())
    }

    pub fn from_grid_with_policy(seed: u32, grid: Grid, spawn_policy: SpawnPolicy) -> Self {
        let next_tile_id = grid.max_id().map_or(1, |id| id.get() + 1);
        Self {
            grid,
            rng: SimpleRng::new(seed),
            spawn_policy,
            seed,
            next_tile_id,
            pending: ArrayVec::new(),
            active: None,
            last_outcome: None,
            last_spawn: None,
            game_over: false,
            episode_id: 0,
            move_id: 0,
            frame: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn move_id(&self) -> u32 {
        self.move_id
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn spawn_policy(&self) -> SpawnPolicy {
        self.spawn_policy
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Direction of the in-flight move, if any
    pub fn moving(&self) -> Option<Direction> {
        self.active.as_ref().map(MoveTransaction::direction)
    }

    /// No move in flight and nothing queued
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Tile placed after the most recent effective move
    pub fn last_spawn(&self) -> Option<Tile> {
        self.last_spawn
    }

    pub fn last_outcome(&self) -> Option<MoveOutcome> {
        self.last_outcome
    }

    pub fn take_last_outcome(&mut self) -> Option<MoveOutcome> {
        self.last_outcome.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        for tile in self.grid.tiles() {
            out.tiles.push(TileSnapshot::from(*tile));
        }
        out.moving = self.moving();
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
        out.move_id = self.move_id;
        out.frame = self.frame;
        out.seed = self.seed;
        out.pending = self.pending.len() as u8;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Queue an input for the next idle tick. Returns false if the queue is full.
    pub fn enqueue(&mut self, action: GameAction) -> bool {
        if self.pending.try_push(action).is_err() {
            debug!("input queue full, dropping {}", action.as_str());
            return false;
        }
        true
    }

    /// Advance one fixed step
    ///
    /// Runs one pass of the in-flight move, or starts the next queued action when
    /// idle. Returns whether the renderable state changed.
    pub fn tick(&mut self) -> bool {
        self.frame = self.frame.wrapping_add(1);

        if self.active.is_none() {
            match self.next_runnable() {
                None => return false,
                Some(GameAction::Restart) => {
                    self.restart();
                    return true;
                }
                Some(action) => {
                    if let Some(direction) = action.direction() {
                        self.active = Some(MoveTransaction::new(direction));
                    }
                }
            }
        }

        self.step_active()
    }

    /// Apply one action to completion, bypassing the queue
    ///
    /// Any in-flight move settles first. Returns whether the action took effect
    /// (a restart, or a move that displaced or merged something).
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        self.finish_active();

        match action.direction() {
            None => {
                self.restart();
                true
            }
            Some(_) if self.game_over => false,
            Some(direction) => {
                self.active = Some(MoveTransaction::new(direction));
                self.finish_active();
                self.last_outcome.is_some_and(|o| o.moved)
            }
        }
    }

    /// Run the in-flight move, if any, to rest
    pub fn finish_active(&mut self) {
        while self.active.is_some() {
            self.frame = self.frame.wrapping_add(1);
            self.step_active();
        }
    }

    /// Clear the board and deal a fresh opening position
    pub fn restart(&mut self) {
        self.active = None;
        self.grid.clear();
        self.next_tile_id = 1;
        self.seed_board();
        self.game_over = false;
        self.last_outcome = None;
        self.last_spawn = None;
        self.move_id = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        info!("restart: episode {}", self.episode_id);
    }

    /// Some direction would displace or merge a tile
    pub fn has_legal_move(&self) -> bool {
        Direction::ALL.iter().any(|&d| can_move(&self.grid, d))
    }

    fn seed_board(&mut self) {
        let placed = seed_start_tiles(&mut self.grid, &mut self.rng, self.next_tile_id);
        self.next_tile_id += placed as u32;
    }

    /// Next queued action that may run now; moves are dropped while game over
    fn next_runnable(&mut self) -> Option<GameAction> {
        while !self.pending.is_empty() {
            let action = self.pending.remove(0);
            if action == GameAction::Restart || !self.game_over {
                return Some(action);
            }
            debug!("game over: ignoring {}", action.as_str());
        }
        None
    }

    fn step_active(&mut self) -> bool {
        let Some(txn) = self.active.as_mut() else {
            return false;
        };

        let changed = txn.step(&mut self.grid);
        if !txn.is_settled() {
            return changed;
        }

        let outcome = txn.outcome();
        self.active = None;
        self.settle(outcome) || changed
    }

    /// Spawn/terminal policy for a settled move. Returns whether the board changed.
    fn settle(&mut self, outcome: MoveOutcome) -> bool {
        self.last_outcome = Some(outcome);
        if outcome.is_noop() {
            return false;
        }

        self.move_id = self.move_id.wrapping_add(1);

        if self.grid.is_full() {
            self.enter_game_over();
            return true;
        }

        self.spawn();

        // The spawn filled the last cell and nothing can slide or merge.
        if self.grid.is_full() && !self.has_legal_move() {
            self.enter_game_over();
        }
        true
    }

    fn spawn(&mut self) {
        let id = TileId(self.next_tile_id);
        self.last_spawn = spawn_tile(&mut self.grid, &mut self.rng, &self.spawn_policy, id);
        if self.last_spawn.is_some() {
            self.next_tile_id += 1;
        }
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        info!(
            "game over: episode {} after {} moves, max tile {}",
            self.episode_id,
            self.move_id,
            self.grid.max_value()
        );
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
