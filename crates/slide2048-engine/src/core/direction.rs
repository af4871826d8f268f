use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Direction in which every tile on the grid slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum Direction {
    /// Toward column 0.
    Left = 0,
    /// Toward the last column.
    Right = 1,
    /// Toward row 0.
    Up = 2,
    /// Toward the last row.
    Down = 3,
}

/// Whether a direction processes rows or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Lines are rows; cells within a line vary by column.
    Row,
    /// Lines are columns; cells within a line vary by row.
    Column,
}

impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::LEN)]
    }
}

impl Direction {
    /// Number of directions (4).
    pub const LEN: usize = 4;

    /// All directions, in the order used by counters indexed with [`Self::as_index`].
    pub const ALL: [Direction; Self::LEN] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    #[must_use]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Returns the axis the lines of this direction run along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Row,
            Direction::Up | Direction::Down => Axis::Column,
        }
    }

    /// Returns `true` if tiles move toward the high-index edge.
    ///
    /// Lines of such directions are read back to front so that the resolver
    /// can always slide toward index 0.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    /// Returns the single character representation of this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use slide2048_engine::Direction;
    ///
    /// assert_eq!(Direction::Left.as_char(), 'L');
    /// assert_eq!(Direction::Down.as_char(), 'D');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Up => 'U',
            Direction::Down => 'D',
        }
    }

    /// Parses a direction from a single character, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use slide2048_engine::Direction;
    ///
    /// assert_eq!(Direction::from_char('u'), Some(Direction::Up));
    /// assert_eq!(Direction::from_char('R'), Some(Direction::Right));
    /// assert_eq!(Direction::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.as_index(), i);
        }
    }

    #[test]
    fn test_char_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_char(dir.as_char()), Some(dir));
            assert_eq!(
                Direction::from_char(dir.as_char().to_ascii_lowercase()),
                Some(dir)
            );
        }
    }

    #[test]
    fn test_random_covers_all_directions() {
        let mut rng = rand::rng();
        let mut counter = [0_usize; Direction::LEN];
        for _ in 0..1000 {
            let dir: Direction = rng.random();
            counter[dir.as_index()] += 1;
        }
        assert!(counter.iter().all(|&n| n > 0), "{counter:?}");
    }

    #[test]
    fn test_axis_and_orientation() {
        assert_eq!(Direction::Left.axis(), Axis::Row);
        assert_eq!(Direction::Right.axis(), Axis::Row);
        assert_eq!(Direction::Up.axis(), Axis::Column);
        assert_eq!(Direction::Down.axis(), Axis::Column);
        assert!(!Direction::Left.is_reversed());
        assert!(Direction::Right.is_reversed());
        assert!(!Direction::Up.is_reversed());
        assert!(Direction::Down.is_reversed());
    }
}
