/// Logical direction lattice for origin-shift maze generation.
///
/// Every logical cell holds the direction of its parent edge in a spanning
/// tree; the root (the "origin") holds `None`. Shifting the origin one cell
/// re-points exactly one edge, so the lattice is a valid spanning tree after
/// every step.
///
/// Generation-time only: the lattice is expanded into a wall grid and then
/// dropped.

use rand::Rng;

use super::direction::{Direction, Position};

#[derive(Clone, Debug)]
pub struct DirectionLattice {
    width: usize,
    height: usize,
    cells: Vec<Option<Direction>>,
    origin: Position,
}

impl DirectionLattice {
    /// Seed tree: every cell points right, the last column points down,
    /// the bottom-right cell is the origin.
    ///
    /// Callers guarantee `width >= 1 && height >= 1`.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let dir = if x == width - 1 && y == height - 1 {
                    None
                } else if x == width - 1 {
                    Some(Direction::Down)
                } else {
                    Some(Direction::Right)
                };
                cells.push(dir);
            }
        }
        DirectionLattice {
            width,
            height,
            cells,
            origin: Position::new(width - 1, height - 1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Parent direction of a logical cell; `None` for the origin or out of range.
    pub fn direction_at(&self, x: usize, y: usize) -> Option<Direction> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Move the origin one step in `dir`.
    /// Returns `false` (and changes nothing) if the step leaves the lattice.
    pub fn shift_origin(&mut self, dir: Direction) -> bool {
        let next = match self.origin.step(dir, self.width, self.height) {
            Some(p) => p,
            None => return false,
        };
        let old = self.origin.y * self.width + self.origin.x;
        self.cells[old] = Some(dir);
        self.origin = next;
        self.cells[next.y * self.width + next.x] = None;
        true
    }

    /// Random-walk the origin for `iterations` accepted steps.
    ///
    /// Out-of-bounds draws are redrawn and do not count; equivalently the
    /// step is drawn uniformly from the in-bounds directions. A 1x1 lattice
    /// has no legal step and is left as is.
    pub fn walk<R: Rng>(&mut self, iterations: usize, rng: &mut R) {
        if self.width * self.height <= 1 {
            return;
        }
        let mut legal = Vec::with_capacity(4);
        for _ in 0..iterations {
            legal.clear();
            legal.extend(
                Direction::ALL
                    .into_iter()
                    .filter(|&d| self.origin.step(d, self.width, self.height).is_some()),
            );
            let dir = legal[rng.gen_range(0..legal.len())];
            self.shift_origin(dir);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Follow parent pointers from every cell; each chain must reach the
    /// origin within `width * height` hops (no cycles, nothing leaves the lattice).
    fn assert_rooted_tree(lat: &DirectionLattice) {
        let limit = lat.width() * lat.height();
        for y in 0..lat.height() {
            for x in 0..lat.width() {
                let mut p = Position::new(x, y);
                let mut hops = 0;
                while let Some(dir) = lat.direction_at(p.x, p.y) {
                    p = p
                        .step(dir, lat.width(), lat.height())
                        .expect("edge points outside the lattice");
                    hops += 1;
                    assert!(hops <= limit, "cycle from ({x}, {y})");
                }
                assert_eq!(p, lat.origin());
            }
        }
    }

    #[test]
    fn seed_tree_is_rooted_at_bottom_right() {
        let lat = DirectionLattice::new(5, 4);
        assert_eq!(lat.origin(), Position::new(4, 3));
        assert_eq!(lat.direction_at(0, 0), Some(Direction::Right));
        assert_eq!(lat.direction_at(4, 0), Some(Direction::Down));
        assert_eq!(lat.direction_at(4, 3), None);
        assert_rooted_tree(&lat);
    }

    #[test]
    fn shift_rejects_out_of_bounds() {
        let mut lat = DirectionLattice::new(3, 3);
        assert!(!lat.shift_origin(Direction::Right));
        assert!(!lat.shift_origin(Direction::Down));
        assert_eq!(lat.origin(), Position::new(2, 2));
    }

    #[test]
    fn shift_repoints_vacated_cell() {
        let mut lat = DirectionLattice::new(3, 3);
        assert!(lat.shift_origin(Direction::Left));
        assert_eq!(lat.origin(), Position::new(1, 2));
        assert_eq!(lat.direction_at(2, 2), Some(Direction::Left));
        assert_eq!(lat.direction_at(1, 2), None);
        assert_rooted_tree(&lat);
    }

    #[test]
    fn walk_keeps_a_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(7);
        for (w, h) in [(1, 5), (5, 1), (2, 2), (7, 3), (11, 11)] {
            let mut lat = DirectionLattice::new(w, h);
            lat.walk(2_000, &mut rng);
            assert_rooted_tree(&lat);
        }
    }

    #[test]
    fn single_cell_walk_terminates() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lat = DirectionLattice::new(1, 1);
        lat.walk(1_000, &mut rng);
        assert_eq!(lat.origin(), Position::new(0, 0));
        assert_eq!(lat.direction_at(0, 0), None);
    }
}
