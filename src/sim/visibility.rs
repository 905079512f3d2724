/// Visibility: marks what the viewer can see as explored.
///
/// ## One reveal
///
///   1. The 3x3 block around the viewer (clipped at the grid edge).
///   2. Four rays, one per cardinal direction. Each step marks the cell and
///      its two lateral neighbours; a ray stops on the first wall, which is
///      itself marked.
///
/// ## Dead-chain propagation
///
/// A dead-end corridor has no decision points, so once any of it is visible
/// the rest of it should be too. After the viewer's reveal, every cell that is
/// both dead and explored becomes a viewer for the next round. Rounds repeat
/// up to `max_hops` times; each cell is used as a viewer at most once per call.
/// Explored bits are only ever set.

use log::trace;

use crate::domain::bitgrid::BitGrid;
use crate::domain::direction::{Direction, Position};
use crate::error::{MazeError, Result};
use super::maze::Maze;

/// Propagation rounds when none is configured.
pub const DEFAULT_DEAD_CHAIN_HOPS: usize = 2;

pub fn reveal(maze: &mut Maze, viewer: Position) -> Result<()> {
    reveal_with_hops(maze, viewer, DEFAULT_DEAD_CHAIN_HOPS)
}

pub fn reveal_with_hops(maze: &mut Maze, viewer: Position, max_hops: usize) -> Result<()> {
    if !maze.contains(viewer) {
        return Err(MazeError::OutOfBounds {
            x: viewer.x,
            y: viewer.y,
            width: maze.width(),
            height: maze.height(),
        });
    }

    cast_from(maze, viewer)?;

    if maze.dead_overlay().is_none() {
        return Ok(());
    }

    let mut used = BitGrid::new(maze.width(), maze.height())?;
    used.set(viewer.x, viewer.y, true)?;

    let mut rounds = 0;
    while rounds < max_hops {
        let frontier = dead_frontier(maze, &used)?;
        if frontier.is_empty() {
            break;
        }
        for pos in frontier {
            used.set(pos.x, pos.y, true)?;
            cast_from(maze, pos)?;
        }
        rounds += 1;
    }
    trace!("reveal from {viewer:?}: {rounds} dead-chain rounds");

    Ok(())
}

/// Dead, explored cells not yet used as a viewer.
fn dead_frontier(maze: &Maze, used: &BitGrid) -> Result<Vec<Position>> {
    let dead = match maze.dead_overlay() {
        Some(dead) => dead,
        None => return Ok(vec![]),
    };
    let mut frontier = vec![];
    for (x, y) in dead.iter_set() {
        if maze.is_explored(x, y)? && !used.get(x, y)? {
            frontier.push(Position::new(x, y));
        }
    }
    Ok(frontier)
}

fn cast_from(maze: &mut Maze, viewer: Position) -> Result<()> {
    let (w, h) = (maze.width(), maze.height());

    for y in viewer.y.saturating_sub(1)..=(viewer.y + 1).min(h - 1) {
        for x in viewer.x.saturating_sub(1)..=(viewer.x + 1).min(w - 1) {
            maze.mark_explored(x, y)?;
        }
    }

    for dir in Direction::ALL {
        let mut cursor = viewer;
        while let Some(next) = cursor.step(dir, w, h) {
            maze.mark_explored(next.x, next.y)?;
            for side in dir.laterals() {
                if let Some(lat) = next.step(side, w, h) {
                    maze.mark_explored(lat.x, lat.y)?;
                }
            }
            if maze.is_wall(next.x, next.y)? {
                break;
            }
            cursor = next;
        }
    }

    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dead_end;
    use crate::sim::generator::MazeGenerator;
    use crate::domain::lattice::DirectionLattice;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn explored_rows(m: &Maze) -> Vec<String> {
        (0..m.height())
            .map(|y| {
                (0..m.width())
                    .map(|x| if m.is_explored(x, y).unwrap() { 'E' } else { '.' })
                    .collect()
            })
            .collect()
    }

    fn is_subset(before: &BitGrid, after: &BitGrid) -> bool {
        before.iter_set().all(|(x, y)| after.get(x, y).unwrap())
    }

    #[test]
    fn reveals_neighborhood_and_rays() {
        let mut m = Maze::parse(&[
            "#########",
            "#.......#",
            "#.#####.#",
            "#.#...#.#",
            "#########",
        ]).unwrap();
        reveal(&mut m, Position::new(1, 1)).unwrap();
        assert_eq!(explored_rows(&m), vec![
            "EEEEEEEEE",
            "EEEEEEEEE",
            "EEEEEEEEE",
            "EEE......",
            "EEE......",
        ]);
    }

    #[test]
    fn ray_stops_at_first_wall_inclusive() {
        let mut m = Maze::parse(&[
            "########",
            "#..#...#",
            "########",
        ]).unwrap();
        reveal(&mut m, Position::new(1, 1)).unwrap();
        assert!(m.is_explored(3, 1).unwrap());
        assert!(!m.is_explored(4, 1).unwrap());
        assert!(!m.is_explored(5, 1).unwrap());
    }

    #[test]
    fn neighborhood_is_clipped_at_edges() {
        let mut m = Maze::parse(&["....", "....", "...."]).unwrap();
        reveal(&mut m, Position::new(0, 0)).unwrap();
        assert!(m.is_explored(0, 0).unwrap());
        assert!(m.is_explored(1, 1).unwrap());
        // open grid: the rays run to the edge
        assert!(m.is_explored(3, 0).unwrap());
        assert!(m.is_explored(0, 2).unwrap());
    }

    #[test]
    fn viewer_outside_grid_is_rejected() {
        let mut m = Maze::parse(&["...."]).unwrap();
        assert!(matches!(
            reveal(&mut m, Position::new(4, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert_eq!(m.explored().count_set(), 0);
    }

    #[test]
    fn reveal_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut m = MazeGenerator::new(20_000).generate(11, 11, &mut rng).unwrap();
        let rooms: Vec<Position> = (0..11)
            .flat_map(|ly| (0..11).map(move |lx| Position::new(2 * lx + 1, 2 * ly + 1)))
            .collect();
        for (i, pos) in rooms.iter().enumerate().step_by(7) {
            let before = m.explored().clone();
            if i % 2 == 0 {
                dead_end::classify(&mut m).unwrap();
            }
            reveal(&mut m, *pos).unwrap();
            assert!(is_subset(&before, m.explored()));
            assert!(m.explored().count_set() >= before.count_set());
        }
    }

    #[test]
    fn reveal_from_origin_neighbor_sees_corridor() {
        let gen = MazeGenerator { iterations: 500, align_width: false };
        let mut rng = StdRng::seed_from_u64(21);
        let mut lattice = DirectionLattice::new(2, 2);
        lattice.walk(gen.iterations, &mut rng);
        let origin = lattice.origin();

        // some logical neighbour of the origin has its parent edge into the origin
        let (lx, ly, dir) = Direction::ALL
            .into_iter()
            .filter_map(|d| origin.step(d, 2, 2).map(|n| (n, d.opposite())))
            .find(|(n, back)| lattice.direction_at(n.x, n.y) == Some(*back))
            .map(|(n, back)| (n.x, n.y, back))
            .expect("origin has a child");

        let mut m = Maze::from_walls(gen.carve(&lattice).unwrap()).unwrap();
        assert_eq!((m.width(), m.height()), (6, 6));
        let viewer = Position::new(2 * lx + 1, 2 * ly + 1);
        reveal(&mut m, viewer).unwrap();

        for y in viewer.y - 1..=viewer.y + 1 {
            for x in viewer.x - 1..=viewer.x + 1 {
                assert!(m.is_explored(x, y).unwrap());
            }
        }
        let passage = viewer.step(dir, 6, 6).unwrap();
        let origin_cell = viewer.offset(dir, 2, 6, 6).unwrap();
        assert!(!m.is_wall(passage.x, passage.y).unwrap());
        assert!(m.is_explored(passage.x, passage.y).unwrap());
        assert!(m.is_explored(origin_cell.x, origin_cell.y).unwrap());
    }

    #[test]
    fn pocket_becomes_explored_once_mouth_is_seen() {
        // the pocket at (5,3) hangs off the corridor behind a bend
        let mut m = Maze::parse(&[
            "#######",
            "#.....#",
            "#####.#",
            "#####.#",
            "#######",
        ]).unwrap();
        dead_end::classify(&mut m).unwrap();
        assert!(m.is_dead(5, 3).unwrap());

        reveal(&mut m, Position::new(1, 1)).unwrap();
        assert!(m.is_explored(5, 3).unwrap());
        assert!(m.is_explored(5, 4).unwrap());
    }

    /// A corridor that turns every two cells; each turn hides the next leg.
    fn zigzag() -> Maze {
        Maze::parse(&[
            "###########",
            "#.#########",
            "#...#######",
            "###...#####",
            "#####...###",
            "#######...#",
            "###########",
        ]).unwrap()
    }

    #[test]
    fn hop_bound_limits_propagation() {
        let mut shallow = zigzag();
        dead_end::classify_until_stable(&mut shallow, 32).unwrap();
        reveal_with_hops(&mut shallow, Position::new(1, 1), 0).unwrap();
        assert!(!shallow.is_explored(9, 5).unwrap());

        let mut deep = zigzag();
        dead_end::classify_until_stable(&mut deep, 32).unwrap();
        reveal_with_hops(&mut deep, Position::new(1, 1), 16).unwrap();
        for y in 1..6 {
            for x in 0..11 {
                if !deep.is_wall(x, y).unwrap() {
                    assert!(deep.is_explored(x, y).unwrap(), "({x}, {y}) not explored");
                }
            }
        }
    }

    /// Explored cell count after revealing the classified zigzag from its top.
    fn zigzag_explored(hops: usize) -> usize {
        let mut m = zigzag();
        dead_end::classify_until_stable(&mut m, 32).unwrap();
        reveal_with_hops(&mut m, Position::new(1, 1), hops).unwrap();
        m.explored().count_set()
    }

    #[test]
    fn each_hop_uncovers_one_more_leg() {
        assert_eq!(zigzag_explored(0), 12);
        assert_eq!(zigzag_explored(1), 18);
        assert_eq!(zigzag_explored(2), 27);
        assert_eq!(zigzag_explored(3), 36);
    }

    #[test]
    fn default_reveal_uses_two_hops() {
        assert_eq!(DEFAULT_DEAD_CHAIN_HOPS, 2);

        let mut by_default = zigzag();
        dead_end::classify_until_stable(&mut by_default, 32).unwrap();
        reveal(&mut by_default, Position::new(1, 1)).unwrap();

        let mut two_hops = zigzag();
        dead_end::classify_until_stable(&mut two_hops, 32).unwrap();
        reveal_with_hops(&mut two_hops, Position::new(1, 1), 2).unwrap();

        assert_eq!(by_default.explored(), two_hops.explored());
        assert_eq!(by_default.explored().count_set(), 27);
    }

    #[test]
    fn no_propagation_without_dead_overlay() {
        let mut m = zigzag();
        reveal_with_hops(&mut m, Position::new(1, 1), 16).unwrap();
        assert!(!m.is_explored(9, 5).unwrap());
    }
}
