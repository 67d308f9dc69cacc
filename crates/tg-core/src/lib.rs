//! tg-core: dungeon layout generation engine
//!
//! Builds a connected graph of rooms and hallways embedded in a bounded
//! integer grid. Generation is driven by a single seeded RNG, so a fixed
//! seed plus a fixed configuration reproduces the layout byte for byte.
//!
//! This crate contains no I/O. Rendering, input, and the command line
//! live in tg-tui.

pub mod graph;

mod rng;

pub use rng::MapRng;
