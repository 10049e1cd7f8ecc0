//! Grid coordinates and the dense hull mask.
//!
//! Positions are signed so neighborhood offsets can step off the grid and be
//! rejected by [`GridPos::index`] instead of wrapping. Membership tests go
//! through the packed `y * 64 + x` index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_CELLS, GRID_SIZE};

/// Orthogonal neighbor offsets: north, east, south, west.
pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// 8-connected neighbor offsets, orthogonal first, then diagonal.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// An integer cell coordinate on a deck grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a fractional point to the nearest cell.
    pub fn round(x: f32, y: f32) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Packed `y * 64 + x` index, `None` outside the grid.
    pub fn index(self) -> Option<usize> {
        if self.in_bounds() {
            Some((self.y * GRID_SIZE + self.x) as usize)
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        let i = index as i32;
        Self::new(i % GRID_SIZE, i / GRID_SIZE)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when `other` is exactly one orthogonal step away.
    pub fn is_orthogonal_neighbor(self, other: GridPos) -> bool {
        self.manhattan(other) == 1
    }

    /// Coordinate key used by the renderer output, `"x,y"`.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Dense boolean mask over the 64×64 grid.
///
/// Built once from a predicate and never mutated afterwards, which is what
/// lets a deck hand out `&HullMask` to every stage.
#[derive(Clone, PartialEq, Eq)]
pub struct HullMask {
    cells: Vec<bool>,
    count: usize,
}

impl HullMask {
    /// Mask with every cell for which `inside(x, y)` holds.
    pub fn from_fn(inside: impl Fn(i32, i32) -> bool) -> Self {
        let mut cells = vec![false; GRID_CELLS];
        let mut count = 0;
        for (index, cell) in cells.iter_mut().enumerate() {
            let pos = GridPos::from_index(index);
            if inside(pos.x, pos.y) {
                *cell = true;
                count += 1;
            }
        }
        Self { cells, count }
    }

    pub fn empty() -> Self {
        Self::from_fn(|_, _| false)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.index().is_some_and(|i| self.cells[i])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Cells inside the mask in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, inside)| **inside)
            .map(|(index, _)| GridPos::from_index(index))
    }
}

impl fmt::Debug for HullMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HullMask").field("cells", &self.count).finish()
    }
}
