//! Dungeon layout graph
//!
//! Rooms and hallways placed on a bounded grid and linked into a graph.
//! Directly connected rooms sit exactly two cells apart on one axis with
//! the hallway on the midpoint cell; dead-end detection and supplemental
//! hallway insertion both rely on that spacing.

mod balance;
mod errors;
mod generation;
mod grid;
mod node;
mod pos;

pub use balance::{Half, least_populated_half};
pub use errors::GraphError;
pub use generation::{DEFAULT_MAX_CONNECTIONS, GraphConfig, TileGraph};
pub use grid::Grid;
pub use node::{Direction, Hallway, Node, NodeId, Room, RoomFlags};
pub use pos::GridPos;
