use itertools::Itertools;
use thiserror::Error;

use crate::{
    color::Color,
    orientation::{Direction, Rotation},
    position::Position,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceError {
    #[error("expected {expected} colors to scatter into {expected} cells but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("cell {index} is outside a face of {cells} cells")]
    CellOutOfBounds { index: usize, cells: usize },
    #[error("no strip lies {offset} cells in on a face of dimension {dimension}")]
    OffsetOutOfRange { offset: usize, dimension: usize },
}

/// An N x N grid of sticker colors stored row-major, so the cell at row `r`
/// and column `c` lives at index `r * N + c` as seen looking at the face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    dimension: usize,
    colors: Box<[Color]>,
}

impl Face {
    #[must_use]
    pub fn new(dimension: usize, color: Color) -> Self {
        Face {
            dimension,
            colors: vec![color; dimension * dimension].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The color at a named position, if it maps to a single cell.
    #[must_use]
    pub fn color(&self, position: Position) -> Option<Color> {
        position
            .cell_index(self.dimension)
            .ok()
            .map(|index| self.colors[index])
    }

    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.colors.iter().all_equal()
    }

    /// The cells of the square ring `depth` cells in from the border, walked
    /// clockwise from its top left cell: top row, right column, bottom row,
    /// then left column, each stopping one short of the next corner.
    fn ring(&self, depth: usize) -> Vec<usize> {
        let n = self.dimension;
        let size = n.saturating_sub(2 * depth);
        if size < 2 {
            return vec![];
        }
        let first = depth;
        let last = depth + size - 1;

        let top = (first..last).map(|c| first * n + c);
        let right = (first..last).map(|r| r * n + last);
        let bottom = (first + 1..=last).rev().map(|c| last * n + c);
        let left = (first + 1..=last).rev().map(|r| r * n + first);
        top.chain(right).chain(bottom).chain(left).collect()
    }

    fn rotate_ring(&mut self, depth: usize, rotation: Rotation) {
        let ring = self.ring(depth);
        if ring.is_empty() {
            return;
        }
        let shift = ring.len() / 4;
        let mut colors = self.read_cells(&ring);
        match rotation {
            Rotation::Clockwise => colors.rotate_right(shift),
            Rotation::CounterClockwise => colors.rotate_left(shift),
        }
        for (&index, color) in ring.iter().zip(colors) {
            self.colors[index] = color;
        }
    }

    /// Rotates the outermost ring of the face by a quarter turn.
    pub fn rotate_border(&mut self, rotation: Rotation) {
        self.rotate_ring(0, rotation);
    }

    /// Rotates the whole face by a quarter turn, every concentric ring
    /// included.
    pub fn rotate(&mut self, rotation: Rotation) {
        for depth in 0..self.dimension / 2 {
            self.rotate_ring(depth, rotation);
        }
    }

    #[must_use]
    pub fn row_indices(&self, row: usize, reverse: bool) -> Vec<usize> {
        let n = self.dimension;
        let indices = (0..n).map(|c| row * n + c);
        if reverse {
            indices.rev().collect()
        } else {
            indices.collect()
        }
    }

    #[must_use]
    pub fn column_indices(&self, column: usize, reverse: bool) -> Vec<usize> {
        let n = self.dimension;
        let indices = (0..n).map(|r| r * n + column);
        if reverse {
            indices.rev().collect()
        } else {
            indices.collect()
        }
    }

    /// The line of cells parallel to the border `edge`, `offset` cells in
    /// from it. Rows run left to right and columns top to bottom unless
    /// `reverse` is set.
    ///
    /// # Errors
    ///
    /// Fails if `offset` does not lie inside the face.
    pub fn strip_indices(
        &self,
        edge: Direction,
        offset: usize,
        reverse: bool,
    ) -> Result<Vec<usize>, FaceError> {
        if offset >= self.dimension {
            return Err(FaceError::OffsetOutOfRange {
                offset,
                dimension: self.dimension,
            });
        }
        Ok(self.strip(edge, offset, reverse))
    }

    /// [`Face::strip_indices`] for an offset already known to be in range.
    pub(crate) fn strip(&self, edge: Direction, offset: usize, reverse: bool) -> Vec<usize> {
        let far = self.dimension - 1 - offset;
        match edge {
            Direction::Left => self.column_indices(offset, reverse),
            Direction::Right => self.column_indices(far, reverse),
            Direction::Up => self.row_indices(offset, reverse),
            Direction::Down => self.row_indices(far, reverse),
        }
    }

    fn check_cells(&self, indices: &[usize]) -> Result<(), FaceError> {
        match indices.iter().find(|&&index| index >= self.colors.len()) {
            Some(&index) => Err(FaceError::CellOutOfBounds {
                index,
                cells: self.colors.len(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn read_cells(&self, indices: &[usize]) -> Vec<Color> {
        indices.iter().map(|&index| self.colors[index]).collect()
    }

    /// Strips read from the same cube always match in length.
    pub(crate) fn write_cells(&mut self, indices: &[usize], colors: Vec<Color>) {
        debug_assert_eq!(indices.len(), colors.len());
        for (&index, color) in indices.iter().zip(colors) {
            self.colors[index] = color;
        }
    }

    /// Reads the cells at `indices`, in order.
    ///
    /// # Errors
    ///
    /// Fails if any index lies outside the face.
    pub fn get_at(&self, indices: &[usize]) -> Result<Vec<Color>, FaceError> {
        self.check_cells(indices)?;
        Ok(self.read_cells(indices))
    }

    /// Writes `colors` into the cells at `indices`, pairwise.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the two lengths differ or any index
    /// lies outside the face.
    pub fn set_at(&mut self, indices: &[usize], colors: &[Color]) -> Result<(), FaceError> {
        if indices.len() != colors.len() {
            return Err(FaceError::LengthMismatch {
                expected: indices.len(),
                actual: colors.len(),
            });
        }
        self.check_cells(indices)?;
        for (&index, &color) in indices.iter().zip(colors) {
            self.colors[index] = color;
        }
        Ok(())
    }
}
