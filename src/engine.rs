use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::config::BoardConfig;
use crate::snake::{Direction, Position, Snake};

pub const FOOD_REWARD: u32 = 10;
pub const INITIAL_SNAKE_LENGTH: usize = 5;

/// Head of the starting snake, in cells. (150, 150) on a 10-unit grid.
pub const INITIAL_HEAD_CELL: (i32, i32) = (15, 15);
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Self-collision only looks at segments from this index on. Segments
/// 1..=3 can be entered without ending the game.
pub const SELF_COLLISION_SKIP: usize = 4;

/// Random food candidates tried before falling back to picking among the
/// free cells directly.
pub const MAX_FOOD_ATTEMPTS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Over,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left to put food.
    BoardFull,
}

/// What a single call to [`GameEngine::tick`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine is not running; nothing changed.
    Idle,
    Moved,
    Ate,
    Over(EndReason),
}

/// Read-only view of the engine for the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameState<'a> {
    pub snake: &'a [Position],
    pub food: Position,
    pub score: u32,
    pub status: GameStatus,
    pub direction: Direction,
}

pub struct GameEngine<R = ThreadRng> {
    board: BoardConfig,
    snake: Snake,
    food: Position,
    direction: Direction,
    score: u32,
    status: GameStatus,
    end_reason: Option<EndReason>,
    direction_changed: bool,
    rng: R,
}

impl GameEngine<ThreadRng> {
    pub fn new(board: BoardConfig) -> Self {
        Self::with_rng(board, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// A fresh engine holds the starting snake and a placed food, but stays
    /// `NotStarted` until [`start`](Self::start) is called.
    pub fn with_rng(board: BoardConfig, rng: R) -> Self {
        let mut engine = GameEngine {
            board,
            snake: initial_snake(&board),
            food: Position::new(0, 0),
            direction: INITIAL_DIRECTION,
            score: 0,
            status: GameStatus::NotStarted,
            end_reason: None,
            direction_changed: false,
            rng,
        };

        if let Some(food) = engine.place_food() {
            engine.food = food;
        }
        engine
    }

    /// Starts a new game, or restarts the current one.
    pub fn start(&mut self) {
        self.snake = initial_snake(&self.board);
        self.direction = INITIAL_DIRECTION;
        self.score = 0;
        self.end_reason = None;
        self.direction_changed = false;
        self.status = GameStatus::Running;

        // The board always has room next to a fresh snake
        if let Some(food) = self.place_food() {
            self.food = food;
        }

        info!(
            width = self.board.width(),
            height = self.board.height(),
            food = ?self.food,
            "game started"
        );
    }

    /// Requests a turn. Only the first request after each tick is looked at,
    /// and a turn back onto the snake's own neck is refused. Returns whether
    /// the direction changed.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.status != GameStatus::Running || self.direction_changed {
            return false;
        }
        self.direction_changed = true;

        if requested.is_reverse_of(self.direction) {
            trace!(current = ?self.direction, ?requested, "reverse turn ignored");
            return false;
        }

        let changed = requested != self.direction;
        self.direction = requested;
        changed
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }
        self.direction_changed = false;

        let new_head = self.snake.head().offset(self.direction.step(self.board.cell_size()));

        if let Some(reason) = self.collision_at(new_head) {
            return self.end(reason);
        }

        if new_head != self.food {
            self.snake.advance(new_head, false);
            return TickOutcome::Moved;
        }

        self.snake.advance(new_head, true);
        self.score += FOOD_REWARD;

        match self.place_food() {
            Some(food) => {
                self.food = food;
                TickOutcome::Ate
            }
            None => self.end(EndReason::BoardFull),
        }
    }

    pub fn state(&self) -> GameState<'_> {
        GameState {
            snake: self.snake.body(),
            food: self.food,
            score: self.score,
            status: self.status,
            direction: self.direction,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Why the last game ended, if it has.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    ///////////////////////////////////////////////////////////////////////////

    fn collision_at(&self, new_head: Position) -> Option<EndReason> {
        if !self.board.contains(new_head) {
            Some(EndReason::Wall)
        } else if self.snake.hits_body(new_head, SELF_COLLISION_SKIP) {
            Some(EndReason::SelfCollision)
        } else {
            None
        }
    }

    fn end(&mut self, reason: EndReason) -> TickOutcome {
        self.status = GameStatus::Over;
        self.end_reason = Some(reason);

        info!(?reason, score = self.score, length = self.snake.len(), "game over");
        TickOutcome::Over(reason)
    }

    fn place_food(&mut self) -> Option<Position> {
        for _ in 0..MAX_FOOD_ATTEMPTS {
            let x = random_cell(&mut self.rng, self.board.width(), self.board.cell_size());
            let y = random_cell(&mut self.rng, self.board.height(), self.board.cell_size());
            let candidate = Position::new(x, y);

            if !self.snake.contains(candidate) {
                debug!(food = ?candidate, "food placed");
                return Some(candidate);
            }
        }

        let free: Vec<Position> = self.board.cells().filter(|pos| !self.snake.contains(*pos)).collect();
        debug!(free = free.len(), "food sampling exhausted, picking a free cell");

        free.choose(&mut self.rng).copied()
    }
}

fn initial_snake(board: &BoardConfig) -> Snake {
    let cell = board.cell_size();
    let head = Position::new(INITIAL_HEAD_CELL.0 * cell, INITIAL_HEAD_CELL.1 * cell);

    Snake::new(head, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION, cell)
}

fn random_cell<R: Rng>(rng: &mut R, dimension: i32, cell_size: i32) -> i32 {
    snap_to_grid(rng.gen::<f64>(), 0, dimension - cell_size, cell_size)
}

/// Maps `sample` in [0, 1) onto a multiple of `cell_size` in [min, max] by
/// rounding to the nearest cell. The two end cells only get half the weight
/// of the others.
pub fn snap_to_grid(sample: f64, min: i32, max: i32, cell_size: i32) -> i32 {
    let value = sample * f64::from(max - min) + f64::from(min);
    (value / f64::from(cell_size)).round() as i32 * cell_size
}
