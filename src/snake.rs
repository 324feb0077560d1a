use Direction::*;

/// A point on the board, in board units. Every position the engine produces
/// is a multiple of the cell size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }

    /// True if both coordinates are non-negative multiples of `cell_size`.
    pub fn is_aligned(self, cell_size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x % cell_size == 0 && self.y % cell_size == 0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// The (dx, dy) a single move covers, one cell wide.
    pub fn step(self, cell_size: i32) -> (i32, i32) {
        match self {
            Up => (0, -cell_size),
            Down => (0, cell_size),
            Left => (-cell_size, 0),
            Right => (cell_size, 0),
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// The snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Lays out `size` segments in a straight line behind `head`, so the
    /// snake starts out moving in `direction`.
    pub fn new(head: Position, size: usize, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.step(cell_size);

        let body = (0..size.max(1) as i32)
            .map(|i| head.offset((-dx * i, -dy * i)))
            .collect();
        Snake { body }
    }

    #[cfg(test)]
    pub(crate) fn from_segments(body: Vec<Position>) -> Self {
        assert!(!body.is_empty());
        Snake { body }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Whether `pos` lands on a segment at index `skip` or later. The
    /// segments before `skip` are never considered.
    pub fn hits_body(&self, pos: Position, skip: usize) -> bool {
        self.body.iter().skip(skip).any(|segment| *segment == pos)
    }

    /// Pushes a new head. Unless `grow` is set, the tail is dropped and
    /// returned.
    pub fn advance(&mut self, new_head: Position, grow: bool) -> Option<Position> {
        self.body.insert(0, new_head);

        if grow {
            None
        } else {
            self.body.pop()
        }
    }
}
