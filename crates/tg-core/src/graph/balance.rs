//! Quadrant balance analysis
//!
//! Counts placed rooms per half-plane to steer the direction selector
//! toward the sparsest part of the map. Counts are computed fresh on
//! every call; they change after every placement.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::node::Direction;
use super::pos::GridPos;

/// One half of the grid, split at `width / 2` or `height / 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Half {
    Left,
    Right,
    Top,
    Bottom,
}

impl Half {
    /// Whether expanding in `dir` pushes growth into this half
    pub const fn favors(self, dir: Direction) -> bool {
        matches!(
            (self, dir),
            (Half::Left, Direction::Left)
                | (Half::Right, Direction::Right)
                | (Half::Top, Direction::Up)
                | (Half::Bottom, Direction::Down)
        )
    }
}

/// Find the least populated half of the grid.
///
/// Rooms exactly on a midline count toward neither side. Ties resolve in
/// a fixed order: the left/right axis is checked before top/bottom, and
/// within an axis left before right, top before bottom.
pub fn least_populated_half(rooms: &[GridPos], width: i32, height: i32) -> Half {
    let x_mid = width / 2;
    let y_mid = height / 2;

    let mut left = 0usize;
    let mut right = 0usize;
    let mut top = 0usize;
    let mut bottom = 0usize;

    for pos in rooms {
        if pos.x < x_mid {
            left += 1;
        } else if pos.x > x_mid {
            right += 1;
        }
        if pos.y < y_mid {
            top += 1;
        } else if pos.y > y_mid {
            bottom += 1;
        }
    }

    let left_or_right = left.min(right);
    let top_or_bottom = top.min(bottom);

    if left_or_right.min(top_or_bottom) == left_or_right {
        if left_or_right == left {
            Half::Left
        } else {
            Half::Right
        }
    } else if top_or_bottom == top {
        Half::Top
    } else {
        Half::Bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_ties_to_left() {
        assert_eq!(least_populated_half(&[], 11, 11), Half::Left);
    }

    #[test]
    fn test_crowded_right_yields_left() {
        // All rooms right of the x midline, spread evenly across y.
        let rooms = vec![
            GridPos::new(8, 2),
            GridPos::new(8, 8),
            GridPos::new(10, 2),
            GridPos::new(10, 8),
        ];
        assert_eq!(least_populated_half(&rooms, 11, 11), Half::Left);
    }

    #[test]
    fn test_crowded_bottom_left_yields_top() {
        // Left/right axis balanced at 1 each, top empty: top wins only if
        // its count is strictly below the left/right minimum.
        let rooms = vec![
            GridPos::new(2, 8),
            GridPos::new(8, 8),
            GridPos::new(2, 9),
            GridPos::new(8, 9),
        ];
        // left = right = 2, top = 0, bottom = 4
        assert_eq!(least_populated_half(&rooms, 11, 11), Half::Top);
    }

    #[test]
    fn test_midline_rooms_count_nowhere() {
        let rooms = vec![GridPos::new(5, 5)];
        // Everything still zero, tie order picks Left.
        assert_eq!(least_populated_half(&rooms, 11, 11), Half::Left);
    }

    #[test]
    fn test_axis_tie_prefers_left_right() {
        // left = 0 ties with top = 0; the left/right axis is checked first.
        let rooms = vec![GridPos::new(8, 8)];
        assert_eq!(least_populated_half(&rooms, 11, 11), Half::Left);
    }

    #[test]
    fn test_favors() {
        assert!(Half::Left.favors(Direction::Left));
        assert!(Half::Top.favors(Direction::Up));
        assert!(Half::Bottom.favors(Direction::Down));
        assert!(!Half::Right.favors(Direction::Left));
    }
}
