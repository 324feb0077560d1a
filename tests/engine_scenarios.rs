use arcade_snake::engine::{FOOD_REWARD, INITIAL_SNAKE_LENGTH};
use arcade_snake::{BoardConfig, Direction, EndReason, GameEngine, GameStatus, Position, TickOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine(seed: u64) -> GameEngine<StdRng> {
    GameEngine::with_rng(BoardConfig::default(), StdRng::seed_from_u64(seed))
}

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

#[test]
fn first_tick_on_a_300_board() {
    let mut engine = engine(1);
    engine.start();

    assert_eq!(
        engine.state().snake,
        &[at(150, 150), at(140, 150), at(130, 150), at(120, 150), at(110, 150)]
    );
    let food = engine.state().food;

    let outcome = engine.tick();
    let state = engine.state();

    if food == at(160, 150) {
        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.score, FOOD_REWARD);
    } else {
        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(
            state.snake,
            &[at(160, 150), at(150, 150), at(140, 150), at(130, 150), at(120, 150)]
        );
        assert_eq!(state.score, 0);
    }
}

#[test]
fn running_left_into_the_wall() {
    let mut engine = engine(2);
    engine.start();

    // Up one row, then left until the head sits on x = 0
    assert!(engine.set_direction(Direction::Up));
    engine.tick();
    assert!(engine.set_direction(Direction::Left));

    for _ in 0..15 {
        assert!(matches!(engine.tick(), TickOutcome::Moved | TickOutcome::Ate));
    }
    assert_eq!(engine.state().snake[0], at(0, 140));

    assert_eq!(engine.tick(), TickOutcome::Over(EndReason::Wall));
    assert_eq!(engine.status(), GameStatus::Over);
    assert_eq!(engine.state().snake[0], at(0, 140));
}

#[test]
fn reverse_request_never_changes_direction() {
    let mut engine = engine(3);
    engine.start();

    for _ in 0..5 {
        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.direction(), Direction::Right);
        engine.tick();
    }
}

#[test]
fn second_request_in_a_tick_is_dropped() {
    let mut engine = engine(4);
    engine.start();

    assert!(engine.set_direction(Direction::Up));
    assert!(!engine.set_direction(Direction::Right));
    assert!(!engine.set_direction(Direction::Left));
    assert_eq!(engine.direction(), Direction::Up);

    engine.tick();
    assert_eq!(engine.state().snake[0], at(150, 140));
}

#[test]
fn state_reads_are_idempotent() {
    let mut engine = engine(5);
    engine.start();
    engine.tick();

    let first = engine.state();
    let second = engine.state();
    assert_eq!(first, second);
}

#[test]
fn restart_after_game_over_resets_everything() {
    let mut engine = engine(6);
    engine.start();

    while engine.tick() != TickOutcome::Over(EndReason::Wall) {}

    engine.start();
    let state = engine.state();

    assert_eq!(state.status, GameStatus::Running);
    assert_eq!(state.score, 0);
    assert_eq!(state.direction, Direction::Right);
    assert_eq!(state.snake.len(), INITIAL_SNAKE_LENGTH);
    assert_eq!(state.snake[0], at(150, 150));
    assert!(!state.snake.contains(&state.food));
}

#[test]
fn random_play_keeps_invariants() {
    let board = BoardConfig::default();
    let mut engine = engine(7);
    let mut input = StdRng::seed_from_u64(70);
    let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    let mut games = 0;

    engine.start();

    for _ in 0..20_000 {
        if input.gen_bool(0.3) {
            engine.set_direction(directions[input.gen_range(0..4)]);
        }

        let score_before = engine.score();
        let len_before = engine.state().snake.len();

        match engine.tick() {
            TickOutcome::Ate => {
                assert_eq!(engine.score(), score_before + FOOD_REWARD);
                assert_eq!(engine.state().snake.len(), len_before + 1);
            }
            TickOutcome::Moved => assert_eq!(engine.state().snake.len(), len_before),
            TickOutcome::Over(_) => {
                assert_eq!(engine.state().snake.len(), len_before);
                games += 1;
                engine.start();
            }
            TickOutcome::Idle => panic!("engine stopped while running"),
        }

        let state = engine.state();
        assert!(!state.snake.is_empty());
        assert!(state.snake.iter().all(|p| p.is_aligned(board.cell_size()) && board.contains(*p)));
        assert!(board.contains(state.food) && state.food.is_aligned(board.cell_size()));
        assert!(!state.snake.contains(&state.food));
        assert_eq!(state.score % FOOD_REWARD, 0);
    }

    assert!(games > 0);
}
