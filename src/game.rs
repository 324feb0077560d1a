use std::{thread::sleep, time::{Duration, Instant}};

use crate::{Coords, TermInt};
use crate::term::TermManager;
use arcade_snake::{BoardConfig, Direction::{*, self}, EndReason, GameEngine, Position, RenderConfig, TickOutcome};

use anyhow::{bail, Result};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use crossterm::style::Color;
use tracing::info;

const INPUT_POLL_MS: u64 = 5;

// Every board cell is two terminal columns wide, so it looks roughly square
const SNAKE_CELL: [char; 2] = ['█', '█'];
const FOOD_CELL: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CELL: [char; 2] = ['X', 'X'];
const EMPTY_CELL: [char; 2] = [' ', ' '];

/// Whether to keep playing after a game ends.
enum Flow {
    Again,
    Quit,
}

/// The terminal driver: feeds keys to the engine, ticks it at a fixed
/// cadence, and draws whatever it reports.
pub struct SnakeGame {
    engine: GameEngine,
    term: TermManager,
    colors: RenderConfig,
    tick_interval: Duration,
    paused: bool,
    drawn: Vec<Position>,
}

impl SnakeGame {
    pub fn new(engine: GameEngine, term: TermManager, colors: RenderConfig, tick_interval: Duration) -> Self {
        SnakeGame { engine, term, colors, tick_interval, paused: false, drawn: vec![] }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    pub fn run(&mut self) -> Result<()> {
        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        while let Flow::Again = self.play()? {
            info!("restarting");
        }

        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<Flow> {
        // The engine already holds the starting layout, draw it as a preview
        self.draw_board()?;

        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Again)
    }

    fn play(&mut self) -> Result<Flow> {
        self.engine.start();
        self.paused = false;
        self.draw_board()?;

        let mut last_tick = Instant::now();

        loop {
            sleep(Duration::from_millis(INPUT_POLL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match &key_ev {
                    ev if is_ctrl_c(ev) => return Ok(Flow::Quit),
                    KeyEvent { code: KeyCode::Esc, modifiers: _ } => self.toggle_pause()?,
                    KeyEvent { code, modifiers: _ } => {
                        if let (Some(dir), false) = (key_direction(*code), self.paused) {
                            // The engine only honours the first turn per tick
                            self.engine.set_direction(dir);
                        }
                    }
                }
            }

            if self.paused || last_tick.elapsed() < self.tick_interval {
                continue;
            }
            last_tick = Instant::now();

            match self.engine.tick() {
                TickOutcome::Moved | TickOutcome::Ate => self.draw_update()?,
                TickOutcome::Over(reason) => {
                    self.game_over(reason)?;
                    break;
                }
                TickOutcome::Idle => break,
            }
        }

        // Drop keys mashed right before the crash so they don't skip the message
        self.term.read_key_events_queue()?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Again)
    }

    fn game_over(&mut self, reason: EndReason) -> Result<()> {
        let state = self.engine.state();
        let cell_size = self.engine.board().cell_size();

        if reason != EndReason::BoardFull {
            for pos in state.snake {
                draw_cell(&mut self.term, cell_size, *pos, DEAD_SNAKE_CELL, self.colors.snake)?;
            }
        }

        let headline = match reason {
            EndReason::BoardFull => "You won!",
            EndReason::Wall | EndReason::SelfCollision => "Game over!",
        };

        self.term.show_message(&[
            headline,
            &*format!("Score: {}", state.score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])
    }

    /// Clears the screen and draws the whole board from the engine state.
    fn draw_board(&mut self) -> Result<()> {
        let board = *self.engine.board();

        self.term.clear()?;
        self.term.draw_borders(board_frame(&board)?, self.colors.border)?;
        self.drawn.clear();

        self.draw_update()
    }

    /// Draws the difference between the last frame and the engine state.
    fn draw_update(&mut self) -> Result<()> {
        let state = self.engine.state();
        let cell_size = self.engine.board().cell_size();

        for pos in self.drawn.iter().filter(|pos| !state.snake.contains(*pos) && **pos != state.food) {
            draw_cell(&mut self.term, cell_size, *pos, EMPTY_CELL, Color::Reset)?;
        }

        draw_cell(&mut self.term, cell_size, state.food, FOOD_CELL, self.colors.food)?;

        for (i, pos) in state.snake.iter().enumerate().rev() {
            let color = if i == 0 {self.colors.head} else {self.colors.snake};
            draw_cell(&mut self.term, cell_size, *pos, SNAKE_CELL, color)?;
        }

        self.term.print_text((2, 0), &format!(" Score: {} ", state.score), Some(self.colors.border))?;
        self.term.flush()?;

        self.drawn.clear();
        self.drawn.extend_from_slice(state.snake);
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Terminal size of the bordered board. Fails if it can't be addressed
/// with terminal coordinates at all.
pub fn board_frame(board: &BoardConfig) -> Result<Coords> {
    let width = board.columns().checked_mul(2).and_then(|w| w.checked_add(2));
    let height = board.rows().checked_add(2);

    match (width.and_then(to_term), height.and_then(to_term)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => bail!("a {}x{} cell board is too large for a terminal", board.columns(), board.rows()),
    }
}

/// Terminal position of the left half of a cell, if it has one.
fn cell_coords(cell_size: i32, pos: Position) -> Option<Coords> {
    let (col, row) = (pos.x / cell_size, pos.y / cell_size);
    let x = col.checked_mul(2)?.checked_add(1)?;
    let y = row.checked_add(1)?;

    Some((to_term(x)?, to_term(y)?))
}

fn to_term(value: i32) -> Option<TermInt> {
    TermInt::try_from(value).ok()
}

fn draw_cell(term: &mut TermManager, cell_size: i32, pos: Position, glyphs: [char; 2], color: Color) -> Result<()> {
    let (x, y) = match cell_coords(cell_size, pos) {
        Some(coords) => coords,
        None => return Ok(()),
    };
    term.print_at((x, y), glyphs[0], Some(color))?;
    term.print_at((x.saturating_add(1), y), glyphs[1], Some(color))
}

fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(key_direction(KeyCode::Up), Some(Up));
        assert_eq!(key_direction(KeyCode::Char('a')), Some(Left));
        assert_eq!(key_direction(KeyCode::Char('S')), Some(Down));
        assert_eq!(key_direction(KeyCode::Right), Some(Right));
        assert_eq!(key_direction(KeyCode::Char('x')), None);
        assert_eq!(key_direction(KeyCode::Esc), None);
    }

    #[test]
    fn ctrl_c_is_detected() {
        assert!(is_ctrl_c(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_ctrl_c(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn cells_are_two_columns_inside_the_border() {
        assert_eq!(cell_coords(10, Position::new(0, 0)), Some((1, 1)));
        assert_eq!(cell_coords(10, Position::new(150, 150)), Some((31, 16)));
        assert_eq!(cell_coords(10, Position::new(290, 290)), Some((59, 30)));
    }

    #[test]
    fn cells_past_terminal_range_have_no_coords() {
        assert_eq!(cell_coords(10, Position::new(327_680, 0)), None);
        assert_eq!(cell_coords(10, Position::new(0, 655_350)), None);
        assert_eq!(cell_coords(1, Position::new(32_766, 0)), Some((65_533, 1)));
    }

    #[test]
    fn frame_wraps_the_board() {
        assert_eq!(board_frame(&BoardConfig::default()).unwrap(), (62, 32));
    }

    #[test]
    fn oversized_frame_is_an_error() {
        let wide = BoardConfig::new(400_000, 300, 10).unwrap();
        assert!(board_frame(&wide).is_err());

        let tall = BoardConfig::new(300, 700_000, 10).unwrap();
        assert!(board_frame(&tall).is_err());
    }
}
