use thiserror::Error;

use crate::orientation::{Direction, Orientation};

/// A named cell of a face grid. The same names are used regardless of the
/// cube's dimension; only the center and corners exist on every face, and
/// edges and the center only map to a single cell when the dimension is odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Center,
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    Center,
    Edge,
    Corner,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("cannot take the {transform} of {position:?} on the {orientation:?} face")]
    IllegalLocation {
        orientation: Orientation,
        position: Position,
        transform: &'static str,
    },
    #[error("{position:?} does not name a single cell on a face of dimension {dimension}")]
    NoSingleCell { position: Position, dimension: usize },
}

impl Position {
    pub const ALL: [Self; 9] = [
        Position::Center,
        Position::Top,
        Position::Right,
        Position::Bottom,
        Position::Left,
        Position::TopLeft,
        Position::TopRight,
        Position::BottomRight,
        Position::BottomLeft,
    ];

    /// Edge positions in clockwise order starting from the top.
    pub const EDGES: [Self; 4] = [
        Position::Top,
        Position::Right,
        Position::Bottom,
        Position::Left,
    ];

    /// Corner positions in clockwise order starting from the top left.
    pub const CORNERS: [Self; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomRight,
        Position::BottomLeft,
    ];

    #[must_use]
    pub fn kind(self) -> PositionKind {
        match self {
            Position::Center => PositionKind::Center,
            Position::Top | Position::Right | Position::Bottom | Position::Left => {
                PositionKind::Edge
            }
            Position::TopLeft
            | Position::TopRight
            | Position::BottomRight
            | Position::BottomLeft => PositionKind::Corner,
        }
    }

    #[must_use]
    pub fn is_edge(self) -> bool {
        self.kind() == PositionKind::Edge
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        self.kind() == PositionKind::Corner
    }

    /// The border of the face an edge position lies on.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Position::Top => Some(Direction::Up),
            Position::Right => Some(Direction::Right),
            Position::Bottom => Some(Direction::Down),
            Position::Left => Some(Direction::Left),
            _ => None,
        }
    }

    /// Row-major index of this position in a face grid of side `dimension`.
    ///
    /// # Errors
    ///
    /// Edges and the center have no single cell when `dimension` is even.
    pub fn cell_index(self, dimension: usize) -> Result<usize, GeometryError> {
        let n = dimension;
        let m = n / 2;
        if n == 0 || (n % 2 == 0 && !self.is_corner()) {
            return Err(GeometryError::NoSingleCell {
                position: self,
                dimension,
            });
        }

        Ok(match self {
            Position::Center => m * n + m,
            Position::Top => m,
            Position::Right => m * n + n - 1,
            Position::Bottom => (n - 1) * n + m,
            Position::Left => m * n,
            Position::TopLeft => 0,
            Position::TopRight => n - 1,
            Position::BottomRight => n * n - 1,
            Position::BottomLeft => n * (n - 1),
        })
    }

    /// Where this position ends up after the face it lies on makes a
    /// clockwise quarter turn.
    #[must_use]
    pub fn rotated_clockwise(self) -> Self {
        match self {
            Position::Center => Position::Center,
            Position::Top => Position::Right,
            Position::Right => Position::Bottom,
            Position::Bottom => Position::Left,
            Position::Left => Position::Top,
            Position::TopLeft => Position::TopRight,
            Position::TopRight => Position::BottomRight,
            Position::BottomRight => Position::BottomLeft,
            Position::BottomLeft => Position::TopLeft,
        }
    }

    /// Where this position ends up after `quarters` clockwise quarter turns
    /// of its face.
    #[must_use]
    pub fn rotated_clockwise_by(self, quarters: usize) -> Self {
        (0..quarters % 4).fold(self, |position, _| position.rotated_clockwise())
    }

    /// The edge position lying on the border `direction`.
    #[must_use]
    pub fn edge(direction: Direction) -> Self {
        match direction {
            Direction::Up => Position::Top,
            Direction::Right => Position::Right,
            Direction::Down => Position::Bottom,
            Direction::Left => Position::Left,
        }
    }

    /// The position on the opposite face that lies straight across the cube
    /// from this position on `orientation`.
    #[must_use]
    pub fn across(self, orientation: Orientation) -> Self {
        if orientation.is_side() {
            match self {
                Position::Left => Position::Right,
                Position::Right => Position::Left,
                Position::TopLeft => Position::TopRight,
                Position::TopRight => Position::TopLeft,
                Position::BottomLeft => Position::BottomRight,
                Position::BottomRight => Position::BottomLeft,
                other => other,
            }
        } else {
            match self {
                Position::Top => Position::Bottom,
                Position::Bottom => Position::Top,
                Position::TopLeft => Position::BottomLeft,
                Position::BottomLeft => Position::TopLeft,
                Position::TopRight => Position::BottomRight,
                Position::BottomRight => Position::TopRight,
                other => other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_three_indices() {
        let indices = Position::ALL.map(|position| position.cell_index(3).unwrap());
        assert_eq!(indices, [4, 1, 5, 7, 3, 0, 2, 8, 6]);
    }

    #[test]
    fn five_by_five_indices() {
        assert_eq!(Position::Center.cell_index(5), Ok(12));
        assert_eq!(Position::Top.cell_index(5), Ok(2));
        assert_eq!(Position::Right.cell_index(5), Ok(14));
        assert_eq!(Position::BottomLeft.cell_index(5), Ok(20));
    }

    #[test]
    fn even_dimension_only_has_corners() {
        for position in Position::ALL {
            let index = position.cell_index(4);
            assert_eq!(index.is_ok(), position.is_corner(), "{position:?}");
        }
        assert_eq!(
            Position::Center.cell_index(2),
            Err(GeometryError::NoSingleCell {
                position: Position::Center,
                dimension: 2
            })
        );
    }

    #[test]
    fn four_clockwise_turns_are_identity() {
        for position in Position::ALL {
            let mut p = position;
            for _ in 0..4 {
                p = p.rotated_clockwise();
            }
            assert_eq!(p, position);
        }
    }

    #[test]
    fn rotation_by_quarters_wraps() {
        assert_eq!(Position::Top.rotated_clockwise_by(1), Position::Right);
        assert_eq!(Position::TopLeft.rotated_clockwise_by(2), Position::BottomRight);
        assert_eq!(Position::Left.rotated_clockwise_by(7), Position::Bottom);
        assert_eq!(Position::Center.rotated_clockwise_by(3), Position::Center);
    }

    #[test]
    fn edges_name_their_borders() {
        for direction in Direction::ALL {
            assert_eq!(Position::edge(direction).direction(), Some(direction));
        }
    }

    #[test]
    fn across_is_an_involution() {
        for orientation in Orientation::ALL {
            for position in Position::ALL {
                assert_eq!(position.across(orientation).across(orientation), position);
            }
        }
    }
}
