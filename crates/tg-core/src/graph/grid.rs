//! Fixed-size occupancy grid
//!
//! Stores at most one node id per integer cell. Collision on placement is
//! an expected outcome reported through the return value, not an error.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::pos::GridPos;

/// A `width x height` grid of optional node references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<NodeId>>,
}

impl Grid {
    /// Create an empty grid. Dimension validation happens at the config
    /// boundary; the grid itself only assumes both are positive.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check whether a position lies on the grid
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Check whether a position is on the grid and unoccupied
    pub fn is_empty(&self, pos: GridPos) -> bool {
        self.in_bounds(pos) && self.cells[self.idx(pos)].is_none()
    }

    /// Node occupying a cell, if any. Out-of-bounds reads are `None`.
    pub fn get(&self, pos: GridPos) -> Option<NodeId> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.idx(pos)]
    }

    /// Write `id` at `pos` iff the cell is on the grid and empty.
    /// Fails without mutating otherwise.
    pub fn place(&mut self, id: NodeId, pos: GridPos) -> bool {
        if !self.is_empty(pos) {
            return false;
        }
        let idx = self.idx(pos);
        self.cells[idx] = Some(id);
        true
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn idx(&self, pos: GridPos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }
}
