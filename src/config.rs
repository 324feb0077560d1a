//! Board geometry for the engine and colors for the terminal renderer.

use anyhow::{ensure, Result};
use crossterm::style::Color;

use crate::snake::Position;

pub const DEFAULT_CELL_SIZE: i32 = 10;
pub const DEFAULT_BOARD_SIZE: i32 = 300;

/// The starting snake sits on cells 11..=15 of row 15, so the board needs
/// at least this many cells in each direction.
pub const MIN_BOARD_CELLS: i32 = 16;

/// Board dimensions in board units. Both dimensions are multiples of the
/// cell size; positions run from 0 to `dimension - cell_size`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl BoardConfig {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self> {
        ensure!(cell_size > 0, "cell size must be positive, got {}", cell_size);
        ensure!(
            width % cell_size == 0 && height % cell_size == 0,
            "board {}x{} is not a multiple of the cell size {}",
            width, height, cell_size
        );
        ensure!(
            width / cell_size >= MIN_BOARD_CELLS && height / cell_size >= MIN_BOARD_CELLS,
            "board {}x{} is smaller than {}x{} cells",
            width, height, MIN_BOARD_CELLS, MIN_BOARD_CELLS
        );

        Ok(BoardConfig { width, height, cell_size })
    }

    pub fn with_cells(columns: i32, rows: i32, cell_size: i32) -> Result<Self> {
        Self::new(columns.saturating_mul(cell_size), rows.saturating_mul(cell_size), cell_size)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Anything outside of this is a wall hit.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x <= self.width - self.cell_size
            && pos.y <= self.height - self.cell_size
    }

    /// Every cell on the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (columns, cell) = (self.columns(), self.cell_size);

        (0..self.rows()).flat_map(move |row| {
            (0..columns).map(move |col| Position::new(col * cell, row * cell))
        })
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: DEFAULT_BOARD_SIZE,
            height: DEFAULT_BOARD_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Colors used by the terminal renderer. The engine never sees these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderConfig {
    pub snake: Color,
    pub head: Color,
    pub food: Color,
    pub border: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            snake: Color::Green,
            head: Color::DarkGreen,
            food: Color::Red,
            border: Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_is_thirty_by_thirty() {
        let board = BoardConfig::default();
        assert_eq!((board.columns(), board.rows()), (30, 30));
        assert_eq!(BoardConfig::new(300, 300, 10).unwrap(), board);
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(BoardConfig::new(300, 300, 0).is_err());
        assert!(BoardConfig::new(305, 300, 10).is_err());
        assert!(BoardConfig::new(150, 300, 10).is_err());
        assert!(BoardConfig::new(160, 160, 10).is_ok());
    }

    #[test]
    fn with_cells_scales_by_cell_size() {
        let board = BoardConfig::with_cells(20, 18, 10).unwrap();
        assert_eq!((board.width(), board.height()), (200, 180));
        assert!(BoardConfig::with_cells(15, 20, 10).is_err());
    }

    #[test]
    fn contains_matches_wall_rule() {
        let board = BoardConfig::default();

        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(290, 290)));
        assert!(!board.contains(Position::new(-10, 150)));
        assert!(!board.contains(Position::new(300, 150)));
        assert!(!board.contains(Position::new(150, -10)));
        assert!(!board.contains(Position::new(150, 300)));
    }

    #[test]
    fn cells_cover_the_board() {
        let board = BoardConfig::new(160, 170, 10).unwrap();
        let cells: Vec<Position> = board.cells().collect();

        assert_eq!(cells.len(), 16 * 17);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[cells.len() - 1], Position::new(150, 160));
        assert!(cells.iter().all(|p| board.contains(*p) && p.is_aligned(10)));
    }
}
