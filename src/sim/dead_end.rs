/// Dead-end classification.
///
/// A non-wall cell is dead if it has exactly one open 4-neighbour, or exactly
/// two open neighbours of which at least one is already dead. Walls are never
/// dead and a dead cell is never un-marked.
///
/// One pass is four in-place sweeps in complementary orders, so a chain gets
/// followed in whichever direction it runs. Four sweeps do not guarantee a
/// fixed point on arbitrary layouts; `classify_until_stable` keeps going
/// until a pass changes nothing.

use log::trace;

use crate::domain::bitgrid::BitGrid;
use crate::error::Result;
use super::maze::Maze;

/// Passes per `classify` call when none is configured.
pub const DEFAULT_PASSES: usize = 1;

/// Sweep orders: columns outermost, `(reverse x, reverse y)`.
const SWEEPS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

/// Run the default number of passes. Returns how many cells became dead.
pub fn classify(maze: &mut Maze) -> Result<usize> {
    classify_passes(maze, DEFAULT_PASSES)
}

pub fn classify_passes(maze: &mut Maze, passes: usize) -> Result<usize> {
    let mut marked = 0;
    for _ in 0..passes {
        marked += run_pass(maze)?;
    }
    Ok(marked)
}

/// Run passes until one marks nothing, or `max_passes` is reached.
/// Returns the number of passes run.
pub fn classify_until_stable(maze: &mut Maze, max_passes: usize) -> Result<usize> {
    for pass in 1..=max_passes {
        if run_pass(maze)? == 0 {
            return Ok(pass);
        }
    }
    Ok(max_passes)
}

fn run_pass(maze: &mut Maze) -> Result<usize> {
    let (w, h) = (maze.width(), maze.height());
    let (walls, dead) = maze.walls_and_dead_mut()?;

    let mut marked = 0;
    for (rev_x, rev_y) in SWEEPS {
        for i in 0..w {
            let x = if rev_x { w - 1 - i } else { i };
            for j in 0..h {
                let y = if rev_y { h - 1 - j } else { j };
                if !dead.get(x, y)? && is_dead_end(walls, dead, x, y)? {
                    dead.set(x, y, true)?;
                    marked += 1;
                }
            }
        }
    }
    trace!("dead-end pass marked {marked} cells");
    Ok(marked)
}

fn is_dead_end(walls: &BitGrid, dead: &BitGrid, x: usize, y: usize) -> Result<bool> {
    if walls.get(x, y)? {
        return Ok(false);
    }

    let (w, h) = (walls.width(), walls.height());
    let mut open = 0;
    let mut dead_neighbor = false;
    let candidates = [
        (x + 1 < w).then(|| (x + 1, y)),
        (x > 0).then(|| (x - 1, y)),
        (y + 1 < h).then(|| (x, y + 1)),
        (y > 0).then(|| (x, y - 1)),
    ];
    for (nx, ny) in candidates.into_iter().flatten() {
        if !walls.get(nx, ny)? {
            open += 1;
            dead_neighbor |= dead.get(nx, ny)?;
        }
    }

    Ok(open == 1 || (open == 2 && dead_neighbor))
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
