use std::fmt::{self, Display};
use std::str::FromStr;

use crate::position::{GeometryError, Position};

/// One of the six faces of the cube, named by where it points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Front,
    Back,
    Up,
    Down,
    Right,
    Left,
}

/// A step taken on the surface of the cube while looking straight at a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The sense of a quarter turn, as seen when looking at the turned face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Clockwise,
    CounterClockwise,
}

// Indexed by `Orientation as usize`, then `Direction as usize`.
const NEIGHBORS: [[Orientation; 4]; 6] = {
    use Orientation::{Back, Down, Front, Left, Right, Up};
    [
        // Front
        [Up, Down, Left, Right],
        // Back: viewed from behind, its left edge borders Right
        [Up, Down, Right, Left],
        // Up: top row borders Back
        [Back, Front, Left, Right],
        // Down: top row borders Front
        [Front, Back, Left, Right],
        // Right: left column borders Front
        [Up, Down, Front, Back],
        // Left: left column borders Back
        [Up, Down, Back, Front],
    ]
};

impl Orientation {
    pub const ALL: [Self; 6] = {
        use Orientation::*;
        let v = [Front, Back, Up, Down, Right, Left];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The four faces that ring the equator when `Down` is the last layer.
    pub const SIDES: [Self; 4] = [
        Orientation::Front,
        Orientation::Right,
        Orientation::Back,
        Orientation::Left,
    ];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Front => Orientation::Back,
            Orientation::Back => Orientation::Front,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
            Orientation::Right => Orientation::Left,
            Orientation::Left => Orientation::Right,
        }
    }

    /// The face reached by stepping off `self` in `direction` while looking
    /// straight at `self`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        NEIGHBORS[self as usize][direction as usize]
    }

    /// The neighbor face that shares the border on which the edge `position`
    /// of this face lies.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::IllegalLocation`] unless `position` is an
    /// edge position.
    pub fn neighbor(self, position: Position) -> Result<Self, GeometryError> {
        position
            .direction()
            .map(|direction| self.step(direction))
            .ok_or(GeometryError::IllegalLocation {
                orientation: self,
                position,
                transform: "neighbor",
            })
    }

    /// The side from which `neighbor` is reached, if the two faces touch.
    #[must_use]
    pub fn direction_to(self, neighbor: Orientation) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == neighbor)
    }

    #[must_use]
    pub fn is_side(self) -> bool {
        !matches!(self, Orientation::Up | Orientation::Down)
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Orientation::Front => 'F',
            Orientation::Back => 'B',
            Orientation::Up => 'U',
            Orientation::Down => 'D',
            Orientation::Right => 'R',
            Orientation::Left => 'L',
        }
    }

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        Orientation::ALL
            .into_iter()
            .find(|orientation| orientation.letter() == letter)
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Orientation::from_letter(letter).ok_or(()),
            _ => Err(()),
        }
    }
}

impl Direction {
    pub const ALL: [Self; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// How many clockwise quarter turns carry `Up` onto this direction.
    #[must_use]
    pub fn quarters_from_up(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

impl Rotation {
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }

    /// The notation suffix for this sense of turn.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Rotation::Clockwise => "",
            Rotation::CounterClockwise => "'",
        }
    }

    /// How many clockwise quarter turns produce the same effect.
    #[must_use]
    pub fn clockwise_quarters(self) -> usize {
        match self {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => 3,
        }
    }
}
