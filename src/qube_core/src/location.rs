use crate::{
    color::Color,
    orientation::Orientation,
    position::{GeometryError, Position},
};

/// A sticker on the cube: which face it is on, where on that face, and the
/// color it carried when it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationSpace {
    pub orientation: Orientation,
    pub position: Position,
    pub color: Color,
}

// Indexed by `Orientation as usize`, then by corner in `Position::CORNERS`
// order. Following an entry three times returns to the starting sticker.
const CORNER_CYCLE: [[(Orientation, Position); 4]; 6] = {
    use Orientation::{Back as B, Down as D, Front as F, Left as L, Right as R, Up as U};
    use Position::{BottomLeft as BL, BottomRight as BR, TopLeft as TL, TopRight as TR};
    [
        [(L, TR), (U, BR), (R, BL), (D, TL)],
        [(R, TR), (U, TL), (L, BL), (D, BR)],
        [(L, TL), (B, TL), (R, TL), (F, TL)],
        [(L, BR), (F, BR), (R, BR), (B, BR)],
        [(F, TR), (U, TR), (B, BL), (D, TR)],
        [(B, TR), (U, BL), (F, BL), (D, BL)],
    ]
};

// Indexed by `Orientation as usize`, then by edge in `Position::EDGES` order.
const EDGE_TWIN: [[(Orientation, Position); 4]; 6] = {
    use Orientation::{Back as B, Down as D, Front as F, Left as L, Right as R, Up as U};
    use Position::{Bottom, Left, Right, Top};
    [
        [(U, Bottom), (R, Left), (D, Top), (L, Right)],
        [(U, Top), (L, Left), (D, Bottom), (R, Right)],
        [(B, Top), (R, Top), (F, Top), (L, Top)],
        [(F, Bottom), (R, Bottom), (B, Bottom), (L, Bottom)],
        [(U, Right), (B, Left), (D, Right), (F, Right)],
        [(U, Left), (F, Left), (D, Left), (B, Right)],
    ]
};

impl LocationSpace {
    #[must_use]
    pub fn new(orientation: Orientation, position: Position, color: Color) -> Self {
        LocationSpace {
            orientation,
            position,
            color,
        }
    }

    fn illegal(&self, transform: &'static str) -> GeometryError {
        GeometryError::IllegalLocation {
            orientation: self.orientation,
            position: self.position,
            transform,
        }
    }

    /// The next sticker of the same corner piece. The carried color is kept,
    /// so look the twin up on the cube to learn its own color.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::IllegalLocation`] unless this sticker is
    /// on a corner.
    pub fn rotate_corner(&self) -> Result<Self, GeometryError> {
        let corner = Position::CORNERS
            .iter()
            .position(|&p| p == self.position)
            .ok_or_else(|| self.illegal("corner rotation"))?;
        let (orientation, position) = CORNER_CYCLE[self.orientation as usize][corner];
        Ok(LocationSpace {
            orientation,
            position,
            color: self.color,
        })
    }

    /// The other sticker of the same edge piece.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::IllegalLocation`] unless this sticker is
    /// on an edge.
    pub fn flip_edge(&self) -> Result<Self, GeometryError> {
        let edge = Position::EDGES
            .iter()
            .position(|&p| p == self.position)
            .ok_or_else(|| self.illegal("edge flip"))?;
        let (orientation, position) = EDGE_TWIN[self.orientation as usize][edge];
        Ok(LocationSpace {
            orientation,
            position,
            color: self.color,
        })
    }

    /// All three stickers of this corner piece, starting with this one.
    ///
    /// # Errors
    ///
    /// See [`LocationSpace::rotate_corner`].
    pub fn corner_stickers(&self) -> Result<[Self; 3], GeometryError> {
        let second = self.rotate_corner()?;
        let third = second.rotate_corner()?;
        Ok([*self, second, third])
    }
}
