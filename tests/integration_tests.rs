//! Integration tests for the tick-driven game loop

use twenty48::core::{GameSnapshot, GameState, Grid, SpawnPolicy};
use twenty48::types::{Direction, GameAction, MAX_PENDING_ACTIONS};

fn run_until_idle(game: &mut GameState) -> u32 {
    let mut ticks = 0;
    while !game.is_idle() {
        game.tick();
        ticks += 1;
        assert!(ticks < 10_000, "game never went idle");
    }
    ticks
}

#[test]
fn test_game_lifecycle() {
    let mut game = GameState::new(12345);
    assert_eq!(game.grid().len(), 2);
    assert!(!game.game_over());
    assert!(game.snapshot().playable());

    // Idle ticks change nothing
    assert!(!game.tick());
    assert_eq!(game.frame(), 1);

    for dir in Direction::ALL {
        game.enqueue(GameAction::from(dir));
    }
    run_until_idle(&mut game);

    assert!(game.move_id() >= 1, "at least one of four directions moves something");
    assert_eq!(game.snapshot().tiles.len(), game.grid().len());
    assert_eq!(game.snapshot().total_value(), game.grid().total_value());
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        GameAction::MoveLeft,
        GameAction::MoveUp,
        GameAction::MoveRight,
        GameAction::MoveDown,
        GameAction::MoveLeft,
        GameAction::MoveUp,
    ];

    let play = |seed: u32| {
        let mut game = GameState::new(seed);
        let mut frames = Vec::new();
        for action in script {
            game.enqueue(action);
            while !game.is_idle() {
                game.tick();
                frames.push(game.snapshot());
            }
        }
        frames
    };

    let a = play(99);
    let b = play(99);
    assert_eq!(a, b);
}

#[test]
fn test_intermediate_frames_are_visible() {
    let grid = Grid::from_cells(&[(0, 3, 2)]).unwrap();
    let mut game = GameState::from_grid(1, grid);
    game.enqueue(GameAction::MoveLeft);

    let mut snap = GameSnapshot::default();
    let mut xs = Vec::new();
    while !game.is_idle() {
        game.tick();
        game.snapshot_into(&mut snap);
        if snap.moving.is_some() {
            xs.push(snap.tiles[0].x);
        }
    }
    assert_eq!(xs.len(), 30);
    assert_eq!(xs[0], 580);
    assert_eq!(xs[29], 0);
    assert_eq!(game.move_id(), 1);
}

#[test]
fn test_input_during_move_is_queued_fifo() {
    let grid = Grid::from_cells(&[(0, 0, 2), (3, 3, 4)]).unwrap();
    let mut game = GameState::from_grid(5, grid);

    game.enqueue(GameAction::MoveRight);
    game.tick();
    assert_eq!(game.moving(), Some(Direction::Right));

    game.enqueue(GameAction::MoveDown);
    game.enqueue(GameAction::MoveLeft);
    assert_eq!(game.pending_len(), 2);

    let mut seen = Vec::new();
    while !game.is_idle() {
        game.tick();
        if let Some(outcome) = game.take_last_outcome() {
            seen.push(outcome.direction);
        }
    }
    assert_eq!(seen, vec![Direction::Right, Direction::Down, Direction::Left]);
}

#[test]
fn test_queue_overflow_is_refused() {
    let mut game = GameState::new(3);
    let accepted = (0..MAX_PENDING_ACTIONS + 3)
        .filter(|_| game.enqueue(GameAction::MoveUp))
        .count();
    assert_eq!(accepted, MAX_PENDING_ACTIONS);
}

#[test]
fn test_restart_resets_board_and_bumps_episode() {
    let mut game = GameState::new(42);
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::MoveUp);

    assert!(game.apply_action(GameAction::Restart));
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.move_id(), 0);
    assert_eq!(game.grid().len(), 2);
    assert!(game.grid().tiles().all(|t| t.value == 2));
    assert!(game.last_outcome().is_none());
}

#[test]
fn test_apply_action_settles_in_flight_move_first() {
    let grid = Grid::from_cells(&[(1, 3, 2)]).unwrap();
    let mut game = GameState::from_grid(8, grid);
    game.enqueue(GameAction::MoveLeft);
    game.tick();
    assert!(game.moving().is_some());

    game.apply_action(GameAction::MoveRight);
    assert!(game.moving().is_none());
    assert_eq!(game.move_id(), 2);
    assert!(game.grid().tiles().all(|t| t.is_at_rest()));
}

#[test]
fn test_long_random_game_keeps_invariants() {
    let mut game = GameState::with_policy(7, SpawnPolicy::uniform());
    let dirs = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
    let mut i = 0;

    while !game.game_over() && i < 2000 {
        let before = game.grid().total_value();
        game.apply_action(GameAction::from(dirs[i % 4]));
        let outcome = game.last_outcome().unwrap();

        let spawned = game.last_spawn().filter(|_| outcome.moved).map_or(0, |t| t.value);
        assert_eq!(game.grid().total_value(), before + spawned);
        assert!(game.grid().tiles().all(|t| t.value.is_power_of_two() && t.is_at_rest()));
        i += 1;
    }

    if game.game_over() {
        assert!(game.grid().is_full());
        assert!(!game.has_legal_move());
    }
}
