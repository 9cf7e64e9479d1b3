use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

use crate::{
    orientation::{Orientation, Rotation},
    puzzle::TurnRequest,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("`{0}` does not name a face")]
    UnknownFace(String),
    #[error("`{0}` is not a valid move")]
    Malformed(String),
}

/// An outer layer move in the usual `F`, `F'`, `F2` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub orientation: Orientation,
    pub rotation: Rotation,
    pub count: usize,
}

impl Move {
    #[must_use]
    pub fn request(self) -> TurnRequest {
        TurnRequest::new(self.orientation, self.rotation).with_count(self.count)
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        Move {
            rotation: self.rotation.inverse(),
            ..self
        }
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .ok_or_else(|| NotationError::Malformed(s.to_owned()))?;
        let orientation = Orientation::from_letter(face)
            .ok_or_else(|| NotationError::UnknownFace(face.to_string()))?;

        let (rotation, count) = match chars.as_str() {
            "" => (Rotation::Clockwise, 1),
            "'" => (Rotation::CounterClockwise, 1),
            "2" => (Rotation::Clockwise, 2),
            "2'" => (Rotation::CounterClockwise, 2),
            _ => return Err(NotationError::Malformed(s.to_owned())),
        };

        Ok(Move {
            orientation,
            rotation,
            count,
        })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.orientation)?;
        if self.count != 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "{}", self.rotation.suffix())
    }
}

/// Parses a whitespace separated move sequence such as `"R U R' U2"`.
///
/// # Errors
///
/// Fails on the first token that is not a valid move.
pub fn parse_moves(moves: &str) -> Result<Vec<Move>, NotationError> {
    moves.split_whitespace().map(str::parse::<Move>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixes() {
        let moves = parse_moves("F R' U2 D2'").unwrap();
        assert_eq!(
            moves,
            vec![
                Move {
                    orientation: Orientation::Front,
                    rotation: Rotation::Clockwise,
                    count: 1
                },
                Move {
                    orientation: Orientation::Right,
                    rotation: Rotation::CounterClockwise,
                    count: 1
                },
                Move {
                    orientation: Orientation::Up,
                    rotation: Rotation::Clockwise,
                    count: 2
                },
                Move {
                    orientation: Orientation::Down,
                    rotation: Rotation::CounterClockwise,
                    count: 2
                },
            ]
        );
        assert_eq!(moves.iter().map(ToString::to_string).collect::<Vec<_>>(), [
            "F", "R'", "U2", "D2'"
        ]);
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(parse_moves("   "), Ok(vec![]));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_moves("F X"),
            Err(NotationError::UnknownFace("X".to_owned()))
        );
        assert_eq!(
            parse_moves("R3"),
            Err(NotationError::Malformed("R3".to_owned()))
        );
    }
}
