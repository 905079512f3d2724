/// Maze: the aggregate every algorithm reads and mutates.
///
/// ## Layers
///
///   - `walls`    : `true` = impassable. Set once by the generator, never mutated.
///   - `explored` : `true` = seen by the player. Only ever set.
///   - `path`     : transient navigation overlay. Replaced wholesale or cleared.
///   - `dead`     : dead-end overlay. Created on first classification, then only grows.
///
/// All bit access goes through `BitGrid`; nothing here computes byte/bit indices.
/// Read accessors return `OutOfBounds` for coordinates outside the grid.

use crate::domain::bitgrid::BitGrid;
use crate::domain::direction::Position;
use crate::error::{MazeError, Result};

#[derive(Clone, Debug)]
pub struct Maze {
    walls: BitGrid,
    explored: BitGrid,
    path: Option<BitGrid>,
    dead: Option<BitGrid>,
}

// ── Construction ──

impl Maze {
    /// Wrap a wall grid. Explored starts all-false, no overlays.
    pub fn from_walls(walls: BitGrid) -> Result<Self> {
        let explored = BitGrid::new(walls.width(), walls.height())?;
        Ok(Maze { walls, explored, path: None, dead: None })
    }

    /// Build from ASCII rows: `#` is wall, anything else is open.
    /// All rows must have the same length.
    pub fn parse(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut walls = BitGrid::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MazeError::InvalidDimensions {
                    width,
                    height,
                    reason: "rows must all have the same length",
                });
            }
            for (x, ch) in row.chars().enumerate() {
                walls.set(x, y, ch == '#')?;
            }
        }
        Self::from_walls(walls)
    }
}

// ── Read accessors ──

impl Maze {
    #[inline]
    pub fn width(&self) -> usize {
        self.walls.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.walls.height()
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.walls.contains(pos.x, pos.y)
    }

    pub fn is_wall(&self, x: usize, y: usize) -> Result<bool> {
        self.walls.get(x, y)
    }

    pub fn is_explored(&self, x: usize, y: usize) -> Result<bool> {
        self.explored.get(x, y)
    }

    /// `false` everywhere when no path is active.
    pub fn is_on_path(&self, x: usize, y: usize) -> Result<bool> {
        match &self.path {
            Some(path) => path.get(x, y),
            None => self.bounds_check(x, y).map(|_| false),
        }
    }

    /// `false` everywhere until the first classification.
    pub fn is_dead(&self, x: usize, y: usize) -> Result<bool> {
        match &self.dead {
            Some(dead) => dead.get(x, y),
            None => self.bounds_check(x, y).map(|_| false),
        }
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn walls(&self) -> &BitGrid {
        &self.walls
    }

    pub fn explored(&self) -> &BitGrid {
        &self.explored
    }

    pub fn path_overlay(&self) -> Option<&BitGrid> {
        self.path.as_ref()
    }

    pub fn dead_overlay(&self) -> Option<&BitGrid> {
        self.dead.as_ref()
    }

    fn bounds_check(&self, x: usize, y: usize) -> Result<()> {
        if self.walls.contains(x, y) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }
}

// ── Mutation (crate-internal except for the explicit operations) ──

impl Maze {
    pub(crate) fn mark_explored(&mut self, x: usize, y: usize) -> Result<()> {
        self.explored.set(x, y, true)
    }

    /// Mark every cell explored.
    pub fn reveal_all(&mut self) {
        self.explored.fill(true);
    }

    /// Drop the navigation overlay.
    pub fn clear_path(&mut self) {
        self.path = None;
    }

    /// Install a fresh navigation overlay, replacing any previous one.
    pub(crate) fn replace_path(&mut self, overlay: BitGrid) {
        debug_assert_eq!((overlay.width(), overlay.height()), (self.width(), self.height()));
        self.path = Some(overlay);
    }

    /// Walls alongside the dead overlay, which is allocated all-false on
    /// first use. Classification reads one while writing the other.
    pub(crate) fn walls_and_dead_mut(&mut self) -> Result<(&BitGrid, &mut BitGrid)> {
        let grid = match self.dead.take() {
            Some(grid) => grid,
            None => BitGrid::new(self.width(), self.height())?,
        };
        Ok((&self.walls, self.dead.insert(grid)))
    }
}

// ── Progress ──

impl Maze {
    /// Cells in the playable area: everything but the last row and column.
    fn playable_cells(&self) -> usize {
        (self.width().saturating_sub(1) * self.height().saturating_sub(1)).max(1)
    }

    /// Explored cells relative to the playable area, in percent.
    /// Exceeds 100 after `reveal_all`, which also marks the outer row/column.
    pub fn explored_percent(&self) -> f64 {
        self.explored.count_set() as f64 / self.playable_cells() as f64 * 100.0
    }

    pub fn dead_percent(&self) -> f64 {
        let dead = self.dead.as_ref().map_or(0, |d| d.count_set());
        dead as f64 / self.playable_cells() as f64 * 100.0
    }

    /// Is every cell of the playable area explored?
    pub fn playable_area_explored(&self) -> bool {
        (0..self.height().saturating_sub(1)).all(|y| {
            (0..self.width().saturating_sub(1)).all(|x| self.explored.get(x, y).unwrap_or(false))
        })
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
