//! Shared cell matrix.
//!
//! The grid uses a doubled coordinate scheme: rooms sit at even/even
//! positions, passages have exactly one odd coordinate and posts have both
//! odd. A ring of `Path` cells surrounds the interior so neighbour lookups
//! from any interior room stay in bounds.
//!
//! Every cell is an `AtomicU8`. Tasks never take a lock on the grid; they
//! read with [`Grid::get`], take ownership of a cell with
//! [`Grid::try_claim`] (compare-and-swap on the value they observed) and
//! give it back with [`Grid::restore`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::direction::Direction;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    Path = 0,
    Wall = 1,
    Solved = 2,
    Tried = 3,
    /// Transient reservation held by a lookahead probe.
    Checking = 4,
}

impl Cell {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Cell::Path,
            1 => Cell::Wall,
            2 => Cell::Solved,
            3 => Cell::Tried,
            _ => Cell::Checking,
        }
    }
}

/// A position in grid coordinates (not room coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Grid position of the room at zero-based room coordinates.
    pub const fn room(room_row: usize, room_col: usize) -> Self {
        Self::new(2 * (room_row + 1), 2 * (room_col + 1))
    }

    pub fn is_room(&self) -> bool {
        self.row % 2 == 0 && self.col % 2 == 0
    }

    pub fn is_post(&self) -> bool {
        self.row % 2 == 1 && self.col % 2 == 1
    }

    pub fn is_passage(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Offset by a signed delta, `None` when it would leave the first quadrant.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Pos> {
        Some(Pos::new(
            self.row.checked_add_signed(d_row)?,
            self.col.checked_add_signed(d_col)?,
        ))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The shared maze grid.
pub struct Grid {
    height: usize,
    width: usize,
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU8>,
}

impl Grid {
    /// Build a grid of `height` x `width` rooms with every interior cell set to
    /// `Wall` and the outer ring set to `Path`.
    pub fn new(height: usize, width: usize) -> Self {
        let rows = 2 * (height + 1) + 1;
        let cols = 2 * (width + 1) + 1;
        let cells = (0..rows * cols)
            .map(|_| AtomicU8::new(Cell::Wall as u8))
            .collect();
        let grid = Self {
            height,
            width,
            rows,
            cols,
            cells,
        };
        grid.reset();
        grid
    }

    /// Return the grid to its freshly initialised state.
    pub fn reset(&self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let value = if self.is_border(Pos::new(row, col)) {
                    Cell::Path
                } else {
                    Cell::Wall
                };
                self.cells[row * self.cols + col].store(value as u8, Ordering::Release);
            }
        }
    }

    /// Number of room rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of room columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of grid rows including the border ring.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns including the border ring.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row == self.rows - 1 || pos.col == self.cols - 1
    }

    /// True for rooms inside the border ring.
    pub fn is_interior_room(&self, pos: Pos) -> bool {
        pos.is_room()
            && (2..=2 * self.height).contains(&pos.row)
            && (2..=2 * self.width).contains(&pos.col)
    }

    /// Grid row of the entrance openings (top edge).
    pub fn entrance_row(&self) -> usize {
        1
    }

    /// Grid row of the exit openings (bottom edge).
    pub fn exit_row(&self) -> usize {
        2 * self.height + 1
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(pos.row < self.rows && pos.col < self.cols, "{pos} outside grid");
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: Pos) -> Cell {
        Cell::from_u8(self.cells[self.index(pos)].load(Ordering::Acquire))
    }

    /// Unconditionally swap in `value`, returning whatever was there before.
    pub fn claim(&self, pos: Pos, value: Cell) -> Cell {
        Cell::from_u8(self.cells[self.index(pos)].swap(value as u8, Ordering::AcqRel))
    }

    /// Replace `expected` with `value`. On failure the cell is untouched and
    /// the value actually found is returned.
    pub fn try_claim(&self, pos: Pos, expected: Cell, value: Cell) -> Result<(), Cell> {
        self.cells[self.index(pos)]
            .compare_exchange(expected as u8, value as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(Cell::from_u8)
    }

    /// Revert a cell previously claimed by the caller.
    pub fn restore(&self, pos: Pos, value: Cell) {
        self.cells[self.index(pos)].store(value as u8, Ordering::Release);
    }

    /// Passage and room one step from `from` in direction `dir`, provided the
    /// room is an interior room.
    pub fn neighbor(&self, from: Pos, dir: &Direction) -> Option<(Pos, Pos)> {
        let room = from.offset(dir.d_row, dir.d_col)?;
        if !self.is_interior_room(room) {
            return None;
        }
        let passage = from.offset(dir.d_row / 2, dir.d_col / 2)?;
        Some((passage, room))
    }

    /// Turn every `Solved` or `Tried` cell back into `Path`.
    pub fn clear_solution(&self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Pos::new(row, col);
                for mark in [Cell::Solved, Cell::Tried] {
                    let _ = self.try_claim(pos, mark, Cell::Path);
                }
            }
        }
    }

    /// Iterate over every interior room position in row-major order.
    pub fn rooms(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |r| (0..self.width).map(move |c| Pos::room(r, c)))
    }

    /// Copy the current state of every cell, row by row.
    pub fn snapshot(&self) -> Vec<Vec<Cell>> {
        (0..self.rows)
            .map(|row| (0..self.cols).map(|col| self.get(Pos::new(row, col))).collect())
            .collect()
    }

    pub fn count(&self, value: Cell) -> usize {
        self.cells
            .iter()
            .filter(|c| Cell::from_u8(c.load(Ordering::Acquire)) == value)
            .count()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("height", &self.height)
            .field("width", &self.width)
            .finish()
    }
}
