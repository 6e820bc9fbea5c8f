//! Board representation and the analysis grids layered on top of it.
//!
//! The board is a plain row-major grid of [`Cell`] values seen from the
//! engine's perspective: our stones are `Friendly`, the opponent's are
//! `Enemy`. The same `'.'`/`'X'`/`'O'` text form used by the host game is
//! accepted by [`Board::from_rows`] and produced by the `Display` impl, which
//! keeps test positions readable.

use std::fmt;

use crate::error::EngineError;

/// A point on the board as `(x, y)`, both in `0..size`.
pub type Point = (usize, usize);

/// State of one board cell, from the engine's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Friendly,
    Enemy,
}

impl Cell {
    /// The other player's color. `Empty` stays `Empty`.
    pub fn opposite(self) -> Cell {
        match self {
            Cell::Friendly => Cell::Enemy,
            Cell::Enemy => Cell::Friendly,
            Cell::Empty => Cell::Empty,
        }
    }

    fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::Friendly),
            'O' => Some(Cell::Enemy),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Friendly => 'X',
            Cell::Enemy => 'O',
        }
    }
}

/// Ownership estimate for an empty point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Control {
    Friendly,
    Enemy,
    #[default]
    Neutral,
}

/// A square Go board snapshot.
///
/// Equality is over the full cell contents, which is what the single-step ko
/// check compares.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Parse a board from one string per row, top row first.
    ///
    /// Rows use `'.'` for empty, `'X'` for friendly and `'O'` for enemy.
    pub fn from_rows(rows: &[&str]) -> Result<Self, EngineError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.chars().count() != size {
                return Err(EngineError::InvalidBoardState(format!(
                    "row {:?} does not match board size {}",
                    row, size
                )));
            }
            for c in row.chars() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    EngineError::InvalidBoardState(format!("unknown cell marker {:?}", c))
                })?;
                cells.push(cell);
            }
        }
        Ok(Self { size, cells })
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, (x, y): Point) -> usize {
        y * self.size + x
    }

    /// Cell at `p`. `p` must be in bounds.
    #[inline]
    pub fn get(&self, p: Point) -> Cell {
        self.cells[self.idx(p)]
    }

    /// Overwrite the cell at `p`.
    #[inline]
    pub fn set(&mut self, p: Point, cell: Cell) {
        let i = self.idx(p);
        self.cells[i] = cell;
    }

    /// Iterate over all points in row-major order.
    ///
    /// Row-major is load-bearing: the finders return the *first* match, so
    /// scan order is part of their behavior.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
    }

    /// Number of non-empty cells.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                write!(f, "{} ", self.get((x, y)).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board({}x{})", self.size, self.size)?;
        fmt::Display::fmt(self, f)
    }
}

/// A square grid of per-point analysis values (valid-move mask, liberty
/// counts, chain ids, territory control).
#[derive(Clone, Debug)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a grid filled with `T::default()`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `p`. `p` must be in bounds.
    #[inline]
    pub fn get(&self, (x, y): Point) -> T {
        self.cells[y * self.size + x]
    }

    /// Overwrite the value at `p`.
    #[inline]
    pub fn set(&mut self, (x, y): Point, value: T) {
        self.cells[y * self.size + x] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        let rows = [". X .", "O . X", ". . ."].map(|r| r.replace(' ', ""));
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.get((1, 0)), Cell::Friendly);
        assert_eq!(board.get((0, 1)), Cell::Enemy);
        assert_eq!(board.get((2, 2)), Cell::Empty);

        let text = board.to_string();
        let reparsed: Vec<String> = text
            .lines()
            .map(|l| l.split_whitespace().collect())
            .collect();
        let reparsed: Vec<&str> = reparsed.iter().map(String::as_str).collect();
        assert_eq!(Board::from_rows(&reparsed).unwrap(), board);
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert!(Board::from_rows(&["..", "...", "..."]).is_err());
        assert!(Board::from_rows(&["..?", "...", "..."]).is_err());
    }

    #[test]
    fn points_are_row_major() {
        let board = Board::new(3);
        let pts: Vec<Point> = board.points().collect();
        assert_eq!(pts[0], (0, 0));
        assert_eq!(pts[1], (1, 0));
        assert_eq!(pts[3], (0, 1));
        assert_eq!(pts.len(), 9);
    }

    #[test]
    fn board_equality_sees_every_cell() {
        let mut a = Board::new(5);
        let b = a.clone();
        assert_eq!(a, b);
        a.set((4, 4), Cell::Enemy);
        assert_ne!(a, b);
    }
}
