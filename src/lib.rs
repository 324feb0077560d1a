//! Classic grid snake.
//!
//! [`GameEngine`] owns the whole game: the snake, the food, the score and
//! the running status. It does no I/O. A driver calls [`GameEngine::tick`]
//! at a fixed cadence, forwards key presses to
//! [`GameEngine::set_direction`], and draws [`GameEngine::state`] after
//! every tick.

pub mod config;
pub mod engine;
pub mod snake;

pub use config::{BoardConfig, RenderConfig};
pub use engine::{EndReason, GameEngine, GameState, GameStatus, TickOutcome};
pub use snake::{Direction, Position};
