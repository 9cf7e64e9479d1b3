#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_panics_doc)]

pub mod color;
pub mod cube;
pub mod face;
pub mod location;
pub mod notation;
pub mod orientation;
pub mod position;
pub mod puzzle;
mod search;

pub use color::Color;
pub use cube::{Cube, TurnError};
pub use face::{Face, FaceError};
pub use location::LocationSpace;
pub use notation::{Move, NotationError, parse_moves};
pub use orientation::{Direction, Orientation, Rotation};
pub use position::{GeometryError, Position, PositionKind};
pub use puzzle::{AnimationFrame, AnimationMode, Puzzle, TurnHandle, TurnRequest, TwistyCube};
