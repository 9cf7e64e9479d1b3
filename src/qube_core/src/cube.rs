use std::collections::HashMap;

use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::{
    color::Color,
    face::Face,
    orientation::{Direction, Orientation, Rotation},
    position::{GeometryError, Position},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    #[error("slice {slice} is out of range for a cube of dimension {dimension}")]
    InvalidSlice { slice: usize, dimension: usize },
    #[error("another turn is still in flight")]
    ConcurrentTurnRejected,
    #[error("the turn was cancelled before it completed")]
    Cancelled,
}

/// One strip of stickers carried from a neighbor of the turned face to the
/// next neighbor around it during a clockwise quarter turn.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StripTransfer {
    pub from: Orientation,
    pub from_edge: Direction,
    pub to: Orientation,
    pub to_edge: Direction,
    pub reverse: bool,
}

const fn transfer(
    from: Orientation,
    from_edge: Direction,
    to: Orientation,
    to_edge: Direction,
    reverse: bool,
) -> StripTransfer {
    StripTransfer {
        from,
        from_edge,
        to,
        to_edge,
        reverse,
    }
}

/// Indexed by `Orientation as usize`. The strips are read from the neighbors
/// lying to the left, top, right and bottom of the turned face. Every entry
/// holds for any slice offset, with the strip taken that many cells in from
/// the named edge.
pub(crate) const STRIP_TRANSFERS: [[StripTransfer; 4]; 6] = {
    use Direction as E;
    use Orientation::{Back as B, Down as D, Front as F, Left as L, Right as R, Up as U};
    [
        // Front
        [
            transfer(L, E::Right, U, E::Down, true),
            transfer(U, E::Down, R, E::Left, false),
            transfer(R, E::Left, D, E::Up, true),
            transfer(D, E::Up, L, E::Right, false),
        ],
        // Back
        [
            transfer(R, E::Right, U, E::Up, false),
            transfer(U, E::Up, L, E::Left, true),
            transfer(L, E::Left, D, E::Down, false),
            transfer(D, E::Down, R, E::Right, true),
        ],
        // Up
        [
            transfer(L, E::Up, B, E::Up, false),
            transfer(B, E::Up, R, E::Up, false),
            transfer(R, E::Up, F, E::Up, false),
            transfer(F, E::Up, L, E::Up, false),
        ],
        // Down
        [
            transfer(L, E::Down, F, E::Down, false),
            transfer(F, E::Down, R, E::Down, false),
            transfer(R, E::Down, B, E::Down, false),
            transfer(B, E::Down, L, E::Down, false),
        ],
        // Right
        [
            transfer(F, E::Right, U, E::Right, false),
            transfer(U, E::Right, B, E::Left, true),
            transfer(B, E::Left, D, E::Right, true),
            transfer(D, E::Right, F, E::Right, false),
        ],
        // Left
        [
            transfer(B, E::Right, U, E::Left, true),
            transfer(U, E::Left, F, E::Left, false),
            transfer(F, E::Left, D, E::Left, false),
            transfer(D, E::Left, B, E::Right, true),
        ],
    ]
};

/// The logical state of an N x N x N cube: six face grids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    dimension: usize,
    faces: [Face; 6],
}

impl Cube {
    /// A solved cube whose faces take the first six palette colors in
    /// `Orientation::ALL` order.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Cube {
            dimension,
            faces: Orientation::ALL.map(|o| Face::new(dimension, Color::ALL[o as usize])),
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn face(&self, orientation: Orientation) -> &Face {
        &self.faces[orientation as usize]
    }

    #[must_use]
    pub fn color(&self, orientation: Orientation, position: Position) -> Option<Color> {
        self.face(orientation).color(position)
    }

    /// Like [`Cube::color`], but explains why a position has no color.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::NoSingleCell`] for a center or edge
    /// position on an even-dimension cube.
    pub fn try_color(
        &self,
        orientation: Orientation,
        position: Position,
    ) -> Result<Color, GeometryError> {
        let index = position.cell_index(self.dimension)?;
        Ok(self.face(orientation).colors()[index])
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.faces.iter().all(Face::is_uniform)
    }

    #[must_use]
    pub fn color_counts(&self) -> HashMap<Color, usize> {
        self.faces
            .iter()
            .flat_map(|face| face.colors().iter().copied())
            .counts()
    }

    /// The colors of the neighbor `side.step(edge)` along the border it
    /// shares with `side`, in the neighbor's own row or column order.
    #[must_use]
    pub fn edge_strip(&self, side: Orientation, edge: Direction) -> Vec<Color> {
        let neighbor = side.step(edge);
        // Neighbors always share a border
        let Some(border) = neighbor.direction_to(side) else {
            return vec![];
        };
        let face = self.face(neighbor);
        face.strip_indices(border, 0, false)
            .map(|indices| face.read_cells(&indices))
            .unwrap_or_default()
    }

    /// Turns the layer `slice` cells in from `orientation` by a quarter turn.
    ///
    /// # Errors
    ///
    /// Fails with [`TurnError::InvalidSlice`] if `slice` is not inside the
    /// cube, leaving the cube untouched.
    pub fn turn(
        &mut self,
        orientation: Orientation,
        rotation: Rotation,
        slice: usize,
    ) -> Result<(), TurnError> {
        if slice >= self.dimension {
            return Err(TurnError::InvalidSlice {
                slice,
                dimension: self.dimension,
            });
        }
        self.apply_turn(orientation, rotation, slice);
        Ok(())
    }

    fn apply_turn(&mut self, orientation: Orientation, rotation: Rotation, slice: usize) {
        trace!(target: "turn", "{orientation}{} slice {slice}", rotation.suffix());

        if slice == 0 {
            self.faces[orientation as usize].rotate(rotation);
        } else if slice == self.dimension - 1 {
            // The far layer carries the opposite face, which sees the turn reversed
            self.faces[orientation.opposite() as usize].rotate(rotation.inverse());
        }
        for _ in 0..rotation.clockwise_quarters() {
            self.exchange_strips(orientation, slice);
        }
    }

    fn exchange_strips(&mut self, orientation: Orientation, slice: usize) {
        let transfers = &STRIP_TRANSFERS[orientation as usize];
        let carried = transfers.map(|t| {
            let face = self.face(t.from);
            face.read_cells(&face.strip(t.from_edge, slice, false))
        });
        for (t, colors) in transfers.iter().zip(carried) {
            let face = &mut self.faces[t.to as usize];
            let indices = face.strip(t.to_edge, slice, t.reverse);
            face.write_cells(&indices, colors);
        }
    }

    /// The cells of the neighbor faces that a turn of `orientation` at
    /// `slice` writes into. `slice` must already be validated.
    pub(crate) fn moving_strips(
        &self,
        orientation: Orientation,
        slice: usize,
    ) -> [(Orientation, Vec<usize>); 4] {
        STRIP_TRANSFERS[orientation as usize]
            .map(|t| (t.to, self.face(t.to).strip(t.to_edge, slice, t.reverse)))
    }

    /// Applies between `min` and `max` random quarter turns (inclusive), each
    /// with a random face, sense and slice. Returns how many were applied.
    pub fn scramble(&mut self, rng: &mut fastrand::Rng, min: usize, max: usize) -> usize {
        if self.dimension == 0 {
            return 0;
        }
        let turns = rng.usize(min..=max.max(min));
        for _ in 0..turns {
            let orientation = Orientation::ALL[rng.usize(..Orientation::ALL.len())];
            let rotation = if rng.bool() {
                Rotation::Clockwise
            } else {
                Rotation::CounterClockwise
            };
            let slice = rng.usize(..self.dimension);
            self.apply_turn(orientation, rotation, slice);
        }
        turns
    }
}
