//! Grid coordinates

use core::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::node::Direction;

/// A position on the layout grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Create a new position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position `dist` cells away along `dir`
    pub const fn offset(self, dir: Direction, dist: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * dist,
            y: self.y + dy * dist,
        }
    }

    /// The four unit-offset neighbor cells, in direction order
    pub fn neighbors(self) -> [GridPos; 4] {
        let mut out = [self; 4];
        for (slot, dir) in out.iter_mut().zip(Direction::iter()) {
            *slot = self.offset(dir, 1);
        }
        out
    }

    /// Euclidean distance to another position, in grid units
    pub fn distance(self, other: GridPos) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
