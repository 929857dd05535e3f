use criterion::{black_box, criterion_group, criterion_main, Criterion};
use twenty48::core::{can_move, slide_to_rest, spawn_tile, GameState, Grid, SimpleRng, SpawnPolicy};
use twenty48::types::{Direction, GameAction, TileId};

fn busy_grid() -> Grid {
    Grid::from_cells(&[
        (0, 0, 2),
        (0, 1, 2),
        (0, 3, 4),
        (1, 1, 8),
        (1, 2, 8),
        (2, 0, 16),
        (2, 3, 16),
        (3, 0, 2),
        (3, 1, 4),
        (3, 2, 4),
        (3, 3, 2),
    ])
    .unwrap()
}

fn bench_slide(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("slide_to_rest_left", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            slide_to_rest(&mut g, black_box(Direction::Left))
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            if state.is_idle() {
                state.enqueue(GameAction::MoveLeft);
                state.enqueue(GameAction::MoveDown);
                state.enqueue(GameAction::MoveRight);
                state.enqueue(GameAction::MoveUp);
            }
            if state.game_over() {
                state.restart();
            }
            black_box(state.tick());
        })
    });
}

fn bench_can_move(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("can_move_all_directions", |b| {
        b.iter(|| Direction::ALL.iter().filter(|&&d| can_move(black_box(&grid), d)).count())
    });
}

fn bench_spawn(c: &mut Criterion) {
    let grid = busy_grid();
    let policy = SpawnPolicy::default();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("spawn_tile", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            spawn_tile(&mut g, &mut rng, &policy, TileId(100))
        })
    });
}

criterion_group!(benches, bench_slide, bench_tick, bench_can_move, bench_spawn);
criterion_main!(benches);
