mod game;
mod term;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use arcade_snake::{config::{DEFAULT_BOARD_SIZE, DEFAULT_CELL_SIZE}, BoardConfig, GameEngine, RenderConfig};
use clap::Parser;
use crossterm::style::Color;
use tracing_subscriber::EnvFilter;

use game::{board_frame, SnakeGame};
use term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser, Debug)]
#[command(name = "arcade-snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Board width in board units (default: as wide as the terminal allows)
    #[arg(long)]
    width: Option<i32>,

    /// Board height in board units (default: as tall as the terminal allows)
    #[arg(long)]
    height: Option<i32>,

    /// Size of one grid cell in board units
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: i32,

    /// Milliseconds between snake moves
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    #[arg(long, default_value = "green", value_parser = parse_color)]
    snake_color: Color,

    #[arg(long, default_value = "dark_green", value_parser = parse_color)]
    head_color: Color,

    #[arg(long, default_value = "red", value_parser = parse_color)]
    food_color: Color,

    #[arg(long, default_value = "white", value_parser = parse_color)]
    border_color: Color,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            snake: self.snake_color,
            head: self.head_color,
            food: self.food_color,
            border: self.border_color,
        }
    }

    /// Picks the board size, filling in missing dimensions from what fits on
    /// a terminal of `term_size`.
    fn board_config(&self, term_size: Coords) -> Result<BoardConfig> {
        ensure!(self.cell_size > 0, "cell size must be positive, got {}", self.cell_size);

        // Leave room for the border; a cell is two columns wide
        let max_columns = (i32::from(term_size.0) - 2) / 2;
        let max_rows = i32::from(term_size.1) - 2;
        let default_cells = DEFAULT_BOARD_SIZE / DEFAULT_CELL_SIZE;

        let fill = |cells: i32| {
            cells.checked_mul(self.cell_size)
                .with_context(|| format!("cell size {} is too large", self.cell_size))
        };

        let width = match self.width {
            Some(width) => width,
            None => fill(max_columns.min(default_cells))?,
        };
        let height = match self.height {
            Some(height) => height,
            None => fill(max_rows.min(default_cells))?,
        };
        let board = BoardConfig::new(width, height, self.cell_size)
            .context("Board does not fit, try a bigger terminal or set --width/--height")?;

        let (frame_w, frame_h) = board_frame(&board)?;
        ensure!(
            frame_w <= term_size.0 && frame_h <= term_size.1,
            "a {}x{} board needs a {}x{} terminal, this one is {}x{}",
            board.width(), board.height(), frame_w, frame_h, term_size.0, term_size.1
        );

        Ok(board)
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::try_from(s).map_err(|_| format!("unknown color `{}`", s))
}

/// The game owns the terminal, so logs only go to a file when asked for.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let term = TermManager::new()?;
    let board = cli.board_config(term.get_terminal_size())?;
    tracing::info!(?board, tick_ms = cli.tick_ms, "configured");

    let engine = GameEngine::new(board);
    let mut game = SnakeGame::new(engine, term, cli.render_config(), Duration::from_millis(cli.tick_ms));

    game.initialize()?;

    // The game loop returns on CTRL+C; restore the terminal even if it failed
    let result = game.run();
    let restored = game.restore();

    result.and(restored)
}
