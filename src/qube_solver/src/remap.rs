use qube_core::{
    Color, Direction, Face, LocationSpace, Orientation, Position, Rotation, TurnError,
    TurnRequest, TwistyCube,
};

/// A view of a cube whose face names are relabeled, so that an algorithm
/// written for one face can be played from any other.
///
/// A whole-cube reorientation also spins the grids of the faces it moves, so
/// alongside the relabeling every logical face keeps the number of clockwise
/// quarter turns that carry its grid onto the physical one. Positions, grids
/// and strips are translated through it in both directions.
pub struct Remapped<'a, C: ?Sized> {
    cube: &'a C,
    table: [Orientation; 6],
    quarters: [usize; 6],
}

impl<'a, C: TwistyCube + ?Sized> Remapped<'a, C> {
    /// The identity view.
    pub fn bind(cube: &'a C) -> Self {
        Remapped {
            cube,
            table: Orientation::ALL,
            quarters: [0; 6],
        }
    }

    /// A whole-cube reorientation that carries the logical face `from` onto
    /// the physical face `to`, with every neighbor of `from` following along.
    pub fn rebase(cube: &'a C, from: Orientation, to: Orientation) -> Self {
        let mut table = Orientation::ALL;
        table[from as usize] = to;
        table[from.opposite() as usize] = to.opposite();
        for direction in Direction::ALL {
            table[from.step(direction) as usize] = to.step(direction);
        }
        let quarters = Orientation::ALL.map(|logical| {
            // Where the logical face's top border lands on the physical face
            table[logical as usize]
                .direction_to(table[logical.step(Direction::Up) as usize])
                .map_or(0, Direction::quarters_from_up)
        });
        Remapped {
            cube,
            table,
            quarters,
        }
    }

    /// Overrides a single entry of the relabeling. The face keeps the grid
    /// orientation of its physical counterpart.
    #[must_use]
    pub fn remap(mut self, from: Orientation, to: Orientation) -> Self {
        self.table[from as usize] = to;
        self.quarters[from as usize] = 0;
        self
    }

    #[must_use]
    pub fn physical(&self, logical: Orientation) -> Orientation {
        self.table[logical as usize]
    }

    /// The logical name of a physical face. Faces no entry maps onto keep
    /// their own name.
    #[must_use]
    pub fn logical(&self, physical: Orientation) -> Orientation {
        Orientation::ALL
            .into_iter()
            .find(|&logical| self.table[logical as usize] == physical)
            .unwrap_or(physical)
    }

    /// Where a position of the logical face `logical` lies on its physical
    /// face.
    #[must_use]
    pub fn physical_position(&self, logical: Orientation, position: Position) -> Position {
        position.rotated_clockwise_by(self.quarters[logical as usize])
    }

    /// Inverse of [`Remapped::physical_position`].
    #[must_use]
    pub fn logical_position(&self, logical: Orientation, position: Position) -> Position {
        position.rotated_clockwise_by(4 - self.quarters[logical as usize])
    }

    fn to_logical(&self, location: LocationSpace) -> LocationSpace {
        let orientation = self.logical(location.orientation);
        LocationSpace {
            orientation,
            position: self.logical_position(orientation, location.position),
            ..location
        }
    }
}

impl<C: TwistyCube + ?Sized> TwistyCube for Remapped<'_, C> {
    fn dimension(&self) -> usize {
        self.cube.dimension()
    }

    fn turn(&self, request: TurnRequest) -> Result<(), TurnError> {
        self.cube.turn(TurnRequest {
            orientation: self.physical(request.orientation),
            ..request
        })
    }

    fn color(&self, orientation: Orientation, position: Position) -> Option<Color> {
        self.cube.color(
            self.physical(orientation),
            self.physical_position(orientation, position),
        )
    }

    fn face(&self, orientation: Orientation) -> Face {
        let mut face = self.cube.face(self.physical(orientation));
        for _ in 0..self.quarters[orientation as usize] {
            face.rotate(Rotation::CounterClockwise);
        }
        face
    }

    fn edge_strip(&self, side: Orientation, edge: Direction) -> Vec<Color> {
        let neighbor = side.step(edge);
        let Some(border) = neighbor.direction_to(side) else {
            return vec![];
        };
        let face = self.face(neighbor);
        face.strip_indices(border, 0, false)
            .and_then(|indices| face.get_at(&indices))
            .unwrap_or_default()
    }

    fn find<P>(&self, mut predicate: P) -> Option<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.cube
            .find(|o, p, c| {
                let logical = self.logical(o);
                predicate(logical, self.logical_position(logical, p), c)
            })
            .map(|location| self.to_logical(location))
    }

    fn find_all<P>(&self, mut predicate: P) -> Vec<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.cube
            .find_all(|o, p, c| {
                let logical = self.logical(o);
                predicate(logical, self.logical_position(logical, p), c)
            })
            .into_iter()
            .map(|location| self.to_logical(location))
            .collect()
    }

    fn is_solved(&self) -> bool {
        self.cube.is_solved()
    }
}
