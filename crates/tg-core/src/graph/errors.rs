//! Validation errors for layout generation
//!
//! Only configuration and precondition violations surface as errors.
//! Placement collisions during generation are expected outcomes reported
//! by [`super::Grid::place`] and handled by backtracking.

use thiserror::Error;

use super::pos::GridPos;

/// Errors surfaced at the generation call boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("map width must be at least 3, got {0}")]
    WidthTooSmall(i32),

    #[error("map height must be at least 3, got {0}")]
    HeightTooSmall(i32),

    #[error("start position {start} is outside the {width}x{height} grid")]
    StartOutOfBounds {
        start: GridPos,
        width: i32,
        height: i32,
    },
}
