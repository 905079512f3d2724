/// Navigation: shortest path between two cells as an overlay.
///
/// BFS over open 4-neighbours; the first time a cell is reached fixes its
/// parent, which is the shortest route on an unweighted grid. In a perfect
/// maze that route is also the only simple one.
///
/// The overlay marks every cell on the path except `from` (the player is
/// already there) and including `to`.

use std::collections::VecDeque;

use log::debug;

use crate::domain::bitgrid::BitGrid;
use crate::domain::direction::Position;
use crate::error::{MazeError, Result};
use super::maze::Maze;

/// Compute the path `from -> to` and install it as the maze's path overlay.
///
/// Returns `Ok(false)` (overlay absent) when `to` is a wall, equals `from`,
/// is unexplored, or cannot be reached. Any previous overlay is dropped first.
pub fn find_path(maze: &mut Maze, from: Position, to: Position) -> Result<bool> {
    maze.clear_path();

    for p in [from, to] {
        if !maze.contains(p) {
            return Err(MazeError::OutOfBounds {
                x: p.x,
                y: p.y,
                width: maze.width(),
                height: maze.height(),
            });
        }
    }

    if maze.is_wall(to.x, to.y)? || to == from || !maze.is_explored(to.x, to.y)? {
        return Ok(false);
    }

    let parents = match search(maze, from, to)? {
        Some(parents) => parents,
        None => {
            debug!("no path from {from:?} to {to:?}");
            return Ok(false);
        }
    };

    let (w, h) = (maze.width(), maze.height());
    let mut overlay = BitGrid::new(w, h)?;
    let mut length = 0;
    let mut cursor = to;
    while cursor != from {
        overlay.set(cursor.x, cursor.y, true)?;
        length += 1;
        cursor = match parents[cursor.y * w + cursor.x] {
            Some(parent) => parent,
            None => break,
        };
    }

    debug!("path from {from:?} to {to:?}: {length} cells");
    maze.replace_path(overlay);
    Ok(true)
}

/// BFS parent table, or `None` if `to` is unreachable.
fn search(maze: &Maze, from: Position, to: Position) -> Result<Option<Vec<Option<Position>>>> {
    let (w, h) = (maze.width(), maze.height());
    let mut visited = BitGrid::new(w, h)?;
    let mut parents: Vec<Option<Position>> = vec![None; w * h];
    let mut queue: VecDeque<Position> = VecDeque::with_capacity(256);

    visited.set(from.x, from.y, true)?;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return Ok(Some(parents));
        }
        for next in current.neighbors(w, h) {
            if visited.get(next.x, next.y)? || maze.is_wall(next.x, next.y)? {
                continue;
            }
            visited.set(next.x, next.y, true)?;
            parents[next.y * w + next.x] = Some(current);
            queue.push_back(next);
        }
    }

    Ok(None)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
