/// Cardinal directions and grid positions.
///
/// `Down` is `+y` (screen order). All stepping is bounds-checked: a step that
/// would leave the grid yields `None` instead of wrapping.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    /// The two directions perpendicular to this one.
    pub fn laterals(self) -> [Direction; 2] {
        match self {
            Direction::Right | Direction::Left => [Direction::Up, Direction::Down],
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
        }
    }
}

/// An `(x, y)` pair in wall-grid coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Move `distance` cells in `dir`, staying inside `width x height`.
    pub fn offset(self, dir: Direction, distance: usize, width: usize, height: usize) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let nx = self.x as isize + dx * distance as isize;
        let ny = self.y as isize + dy * distance as isize;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            return None;
        }
        Some(Position::new(nx as usize, ny as usize))
    }

    #[inline]
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Position> {
        self.offset(dir, 1, width, height)
    }

    /// In-bounds 4-neighbours, in `Direction::ALL` order.
    pub fn neighbors(self, width: usize, height: usize) -> impl Iterator<Item = Position> {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(dir, width, height))
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_in_bounds() {
        let p = Position::new(0, 0);
        assert_eq!(p.step(Direction::Left, 4, 4), None);
        assert_eq!(p.step(Direction::Up, 4, 4), None);
        assert_eq!(p.step(Direction::Right, 4, 4), Some(Position::new(1, 0)));
        assert_eq!(p.step(Direction::Down, 4, 4), Some(Position::new(0, 1)));
        assert_eq!(Position::new(3, 3).step(Direction::Right, 4, 4), None);
    }

    #[test]
    fn offset_by_two() {
        let p = Position::new(1, 1);
        assert_eq!(p.offset(Direction::Right, 2, 8, 8), Some(Position::new(3, 1)));
        assert_eq!(p.offset(Direction::Up, 2, 8, 8), None);
    }

    #[test]
    fn corner_has_two_neighbors() {
        assert_eq!(Position::new(0, 0).neighbors(5, 5).count(), 2);
        assert_eq!(Position::new(2, 2).neighbors(5, 5).count(), 4);
    }

    #[test]
    fn laterals_are_perpendicular() {
        for dir in Direction::ALL {
            for lat in dir.laterals() {
                assert_ne!(lat, dir);
                assert_ne!(lat, dir.opposite());
            }
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
