//! Piece shapes as small boolean matrices

use serde::{Deserialize, Serialize};

use crate::sim::rng::RandomSource;

/// The seven tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Uniform draw over all kinds
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.next_index(Self::ALL.len())]
    }

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            ShapeKind::I => &[&[1, 1, 1, 1]],
            ShapeKind::O => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            ShapeKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Shape::from_rows(rows)
    }
}

/// A row-major boolean matrix, `height` rows by `width` columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build from rows of 0/1; short rows are padded with empty cells
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                cells[y * width + x] = v != 0;
            }
        }
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Offsets `(dx, dy)` of every filled cell
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
    }

    /// 90° clockwise: `new[x][h-1-y] = old[y][x]`
    pub fn rotated(&self) -> Self {
        let h = self.height;
        let new_width = h;
        let new_height = self.width;
        let mut cells = vec![false; new_width * new_height];
        for (x, y) in self.occupied() {
            // new row = x, new column = h - 1 - y
            cells[x * new_width + (h - 1 - y)] = true;
        }
        Self {
            width: new_width,
            height: new_height,
            cells,
        }
    }

    /// 180° turn in one step
    pub fn half_turned(&self) -> Self {
        let (w, h) = (self.width, self.height);
        let mut cells = vec![false; w * h];
        for (x, y) in self.occupied() {
            cells[(h - 1 - y) * w + (w - 1 - x)] = true;
        }
        Self {
            width: w,
            height: h,
            cells,
        }
    }
}

/// The falling piece: a shape placed at a grid-relative origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    /// Column of the shape's left edge
    pub x: i32,
    /// Row of the shape's top edge
    pub y: i32,
}

impl Piece {
    pub fn new(kind: ShapeKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            x,
            y,
        }
    }

    /// Grid coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }

    /// Candidate moved by `(dx, dy)`
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Candidate rotated 90° clockwise about the same origin
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..self.clone()
        }
    }
}
