//! Classifiers for the pattern the last layer's color makes on the `Down`
//! face. Directions are named as seen looking at `Down` from below, with
//! north towards `Front`.

use itertools::Itertools;
use qube_core::{Orientation, Position, TwistyCube};

/// How many of the `Down` edges already show the `Down` center color, and
/// how they lie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFormation {
    Star,
    Dot,
    Hook,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownShape {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl DownShape {
    pub fn read<C: TwistyCube + ?Sized>(cube: &C) -> Self {
        let center = cube.color(Orientation::Down, Position::Center);
        let matches = |position| cube.color(Orientation::Down, position) == center;
        DownShape {
            north: matches(Position::Top),
            east: matches(Position::Right),
            south: matches(Position::Bottom),
            west: matches(Position::Left),
        }
    }

    /// The shape after `Down` turns clockwise `quarters` times.
    #[must_use]
    pub fn turned(self, quarters: usize) -> Self {
        (0..quarters % 4).fold(self, |shape, _| DownShape {
            north: shape.west,
            east: shape.north,
            south: shape.east,
            west: shape.south,
        })
    }

    /// `None` for patterns with an odd number of matching edges, which no
    /// sequence of legal turns produces.
    #[must_use]
    pub fn formation(self) -> Option<EdgeFormation> {
        let DownShape {
            north,
            east,
            south,
            west,
        } = self;
        let edges = [north, east, south, west];
        match edges.iter().filter(|&&x| x).count() {
            4 => Some(EdgeFormation::Star),
            0 => Some(EdgeFormation::Dot),
            2 if adjacent(edges) => Some(EdgeFormation::Hook),
            2 => Some(EdgeFormation::Line),
            _ => None,
        }
    }
}

/// How many of the `Down` corners already show the `Down` center color, and
/// how they lie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerFormation {
    Done,
    None,
    One,
    TwoLine,
    TwoAcross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownCorners {
    pub north_west: bool,
    pub north_east: bool,
    pub south_east: bool,
    pub south_west: bool,
}

impl DownCorners {
    pub fn read<C: TwistyCube + ?Sized>(cube: &C) -> Self {
        let center = cube.color(Orientation::Down, Position::Center);
        let matches = |position| cube.color(Orientation::Down, position) == center;
        DownCorners {
            north_west: matches(Position::TopLeft),
            north_east: matches(Position::TopRight),
            south_east: matches(Position::BottomRight),
            south_west: matches(Position::BottomLeft),
        }
    }

    /// `None` for three matching corners, which no sequence of legal turns
    /// produces.
    #[must_use]
    pub fn formation(self) -> Option<CornerFormation> {
        let DownCorners {
            north_west: nw,
            north_east: ne,
            south_east: se,
            south_west: sw,
        } = self;
        let corners = [nw, ne, se, sw];
        match corners.iter().filter(|&&x| x).count() {
            4 => Some(CornerFormation::Done),
            0 => Some(CornerFormation::None),
            1 => Some(CornerFormation::One),
            2 if adjacent(corners) => Some(CornerFormation::TwoLine),
            2 => Some(CornerFormation::TwoAcross),
            _ => None,
        }
    }
}

/// Whether two neighbors around the ring are both set.
fn adjacent(ring: [bool; 4]) -> bool {
    ring.into_iter()
        .circular_tuple_windows()
        .any(|(a, b)| a && b)
}

#[cfg(test)]
mod tests {
    use qube_core::{Puzzle, Rotation, TurnRequest, TwistyCube, parse_moves};

    use super::*;

    fn shape(north: bool, east: bool, south: bool, west: bool) -> DownShape {
        DownShape {
            north,
            east,
            south,
            west,
        }
    }

    #[test]
    fn edge_formations() {
        assert_eq!(shape(true, true, true, true).formation(), Some(EdgeFormation::Star));
        assert_eq!(shape(false, false, false, false).formation(), Some(EdgeFormation::Dot));
        assert_eq!(shape(true, false, false, true).formation(), Some(EdgeFormation::Hook));
        assert_eq!(shape(false, true, true, false).formation(), Some(EdgeFormation::Hook));
        assert_eq!(shape(true, false, true, false).formation(), Some(EdgeFormation::Line));
        assert_eq!(shape(true, false, false, false).formation(), None);
    }

    #[test]
    fn turning_matches_the_cube() {
        let puzzle = Puzzle::new(3);
        for mv in parse_moves("F2 R2").unwrap() {
            TwistyCube::turn(&puzzle, mv.request()).unwrap();
        }
        let start = DownShape::read(&puzzle);
        assert_eq!(start, shape(false, false, true, true));
        for quarters in 1..4 {
            let turn = TurnRequest::new(Orientation::Down, Rotation::Clockwise);
            TwistyCube::turn(&puzzle, turn).unwrap();
            assert_eq!(DownShape::read(&puzzle), start.turned(quarters));
        }
        assert_eq!(start.turned(4), start);
    }

    #[test]
    fn corner_formations() {
        let corners = |nw, ne, se, sw| DownCorners {
            north_west: nw,
            north_east: ne,
            south_east: se,
            south_west: sw,
        };
        assert_eq!(corners(true, true, true, true).formation(), Some(CornerFormation::Done));
        assert_eq!(corners(false, false, false, false).formation(), Some(CornerFormation::None));
        assert_eq!(corners(false, false, true, false).formation(), Some(CornerFormation::One));
        assert_eq!(corners(true, false, false, true).formation(), Some(CornerFormation::TwoLine));
        assert_eq!(corners(true, false, true, false).formation(), Some(CornerFormation::TwoAcross));
        assert_eq!(corners(true, true, true, false).formation(), None);
    }

    #[test]
    fn read_from_cube() {
        let puzzle = Puzzle::new(3);
        assert_eq!(DownShape::read(&puzzle).formation(), Some(EdgeFormation::Star));
        assert_eq!(DownCorners::read(&puzzle).formation(), Some(CornerFormation::Done));

        // Lifts the F-D and B-D edges out of the Down face, leaving a line
        for mv in parse_moves("F2 B2").unwrap() {
            TwistyCube::turn(&puzzle, mv.request()).unwrap();
        }
        let shape = DownShape::read(&puzzle);
        assert!(!shape.north && !shape.south && shape.east && shape.west);
        assert_eq!(shape.formation(), Some(EdgeFormation::Line));
    }
}
