/// Maze generation: origin-shift walk, then expansion to the wall grid.
///
/// A logical cell `(lx, ly)` sits at wall-grid `(2*lx + 1, 2*ly + 1)`.
/// The wall grid is `(logical_width + 1) * 2` by `(logical_height + 1) * 2`;
/// every even coordinate starts as wall, so the last two rows and columns
/// are always wall.
///
/// Expansion opens each logical cell, then opens the one wall cell between
/// it and its parent in the lattice. The lattice is a spanning tree, so the
/// result is a perfect maze.

use std::time::Instant;

use log::debug;
use rand::Rng;

use crate::domain::bitgrid::BitGrid;
use crate::domain::lattice::DirectionLattice;
use crate::error::{MazeError, Result};
use super::maze::Maze;

/// Walk length used when none is configured.
pub const DEFAULT_ITERATIONS: usize = 1_000_000;

#[derive(Clone, Debug)]
pub struct MazeGenerator {
    /// Accepted origin-shift steps.
    pub iterations: usize,
    /// Require the wall-grid width to be a multiple of 8.
    pub align_width: bool,
}

impl Default for MazeGenerator {
    fn default() -> Self {
        MazeGenerator { iterations: DEFAULT_ITERATIONS, align_width: true }
    }
}

impl MazeGenerator {
    pub fn new(iterations: usize) -> Self {
        MazeGenerator { iterations, ..Self::default() }
    }

    /// Wall-grid dimensions for a logical size, validated.
    pub fn wall_dimensions(&self, logical_width: usize, logical_height: usize) -> Result<(usize, usize)> {
        if logical_width == 0 || logical_height == 0 {
            return Err(MazeError::InvalidDimensions {
                width: logical_width,
                height: logical_height,
                reason: "logical dimensions must be at least 1",
            });
        }
        let too_large = MazeError::InvalidDimensions {
            width: logical_width,
            height: logical_height,
            reason: "logical dimensions are too large",
        };
        let width = wall_extent(logical_width).ok_or(too_large.clone())?;
        let height = wall_extent(logical_height).ok_or(too_large.clone())?;
        width.checked_mul(height).ok_or(too_large)?;
        if self.align_width && width % 8 != 0 {
            return Err(MazeError::InvalidDimensions {
                width,
                height,
                reason: "wall-grid width must be a multiple of 8",
            });
        }
        Ok((width, height))
    }

    /// Generate a fresh maze. Nothing is explored yet.
    pub fn generate<R: Rng>(&self, logical_width: usize, logical_height: usize, rng: &mut R) -> Result<Maze> {
        self.wall_dimensions(logical_width, logical_height)?;

        let started = Instant::now();
        let mut lattice = DirectionLattice::new(logical_width, logical_height);
        lattice.walk(self.iterations, rng);
        let walls = self.carve(&lattice)?;
        debug!(
            "generated {}x{} maze ({} iterations) in {:.3} ms",
            walls.width(),
            walls.height(),
            self.iterations,
            started.elapsed().as_secs_f64() * 1000.0,
        );

        Maze::from_walls(walls)
    }

    /// Expand a lattice into its wall grid.
    pub fn carve(&self, lattice: &DirectionLattice) -> Result<BitGrid> {
        let (width, height) = self.wall_dimensions(lattice.width(), lattice.height())?;
        let mut walls = BitGrid::filled(width, height, true)?;

        for ly in 0..lattice.height() {
            for lx in 0..lattice.width() {
                let (x, y) = (2 * lx + 1, 2 * ly + 1);
                walls.set(x, y, false)?;
                if let Some(dir) = lattice.direction_at(lx, ly) {
                    let (dx, dy) = dir.delta();
                    let px = (x as isize + dx) as usize;
                    let py = (y as isize + dy) as usize;
                    walls.set(px, py, false)?;
                }
            }
        }

        Ok(walls)
    }
}

/// Wall cells along one axis: `(logical + 1) * 2`.
fn wall_extent(logical: usize) -> Option<usize> {
    logical.checked_add(1)?.checked_mul(2)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
