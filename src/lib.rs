//! Mazewalk core: a bit-packed perfect maze and the views derived from it.
//!
//!   - `domain` : BitGrid, directions/positions, the origin-shift lattice
//!   - `sim`    : Maze aggregate, generation, visibility, navigation,
//!                dead-end classification, and the player session
//!
//! Everything here is single-threaded and synchronous.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use domain::bitgrid::BitGrid;
pub use domain::direction::{Direction, Position};
pub use error::{MazeError, Result};
pub use sim::maze::Maze;
