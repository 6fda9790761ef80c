//! Settled-cell grid for the block-stacker
//!
//! Row 0 is the top. Only `merge` and `clear_full_rows` change cells.

use serde::{Deserialize, Serialize};

use super::piece::{Piece, ShapeKind};

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ShapeKind),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Fixed-size matrix of settled cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at `(x, y)`; out-of-range reads as `None`
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// True if any filled cell of `piece` lands outside the grid or on a settled cell
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| match self.get(x, y) {
            Some(cell) => cell.is_filled(),
            None => true,
        })
    }

    /// Write the piece's cells into the grid. Callers check `collides` first.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if let Some(cell) = self
                .rows
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = Cell::Filled(piece.kind);
            }
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|c| c.is_filled()))
    }

    pub fn full_row_count(&self) -> usize {
        (0..self.height).filter(|&y| self.is_row_full(y)).count()
    }

    /// Remove every full row and push the same number of empty rows on top.
    /// Returns how many rows were cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().all(|c| c.is_filled()));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, vec![Cell::Empty; self.width]);
        }
        cleared as u32
    }

    /// Copy of the rows with `piece` drawn over them
    pub fn with_overlay(&self, piece: Option<&Piece>) -> Vec<Vec<Cell>> {
        let mut rows = self.rows.clone();
        if let Some(piece) = piece {
            for (x, y) in piece.cells() {
                if let Some(cell) = rows
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = Cell::Filled(piece.kind);
                }
            }
        }
        rows
    }

    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, y: usize, kind: ShapeKind) {
        for cell in self.rows[y].iter_mut() {
            *cell = Cell::Filled(kind);
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }
}
