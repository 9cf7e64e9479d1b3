use std::ops::ControlFlow;

use log::trace;

use crate::{
    color::Color, cube::Cube, location::LocationSpace, orientation::Orientation,
    position::Position,
};

impl Cube {
    /// Visits every sticker that maps to a single cell, faces in a random
    /// order and positions within each face in a random order, so repeated
    /// searches do not favor one corner of the cube.
    fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(LocationSpace) -> ControlFlow<()>,
    {
        let mut orientations = Orientation::ALL;
        fastrand::shuffle(&mut orientations);
        for orientation in orientations {
            let mut positions = Position::ALL;
            fastrand::shuffle(&mut positions);
            for position in positions {
                let Some(color) = self.color(orientation, position) else {
                    continue;
                };
                if visitor(LocationSpace::new(orientation, position, color)).is_break() {
                    return;
                }
            }
        }
    }

    /// Some sticker satisfying `predicate`, if any does.
    pub fn find<P>(&self, mut predicate: P) -> Option<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        let mut found = None;
        self.visit(|ls| {
            if predicate(ls.orientation, ls.position, ls.color) {
                found = Some(ls);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        trace!(target: "search", "find -> {found:?}");
        found
    }

    /// Every sticker satisfying `predicate`, in visiting order.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        let mut found = vec![];
        self.visit(|ls| {
            if predicate(ls.orientation, ls.position, ls.color) {
                found.push(ls);
            }
            ControlFlow::Continue(())
        });
        trace!(target: "search", "find_all -> {} matches", found.len());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Rotation;

    #[test]
    fn centers_are_found() {
        let cube = Cube::new(3);
        let found = cube.find_all(|_, p, _| p == Position::Center);
        assert_eq!(found.len(), 6);

        let white = cube.find(|_, p, c| p == Position::Center && c == Color::White);
        assert_eq!(
            white,
            Some(LocationSpace::new(Orientation::Up, Position::Center, Color::White))
        );
    }

    #[test]
    fn nothing_matches() {
        let cube = Cube::new(3);
        assert!(cube.find(|_, _, c| c == Color::Purple).is_none());
        assert!(cube.find_all(|_, _, c| c == Color::Purple).is_empty());
    }

    #[test]
    fn found_stickers_satisfy_the_predicate() {
        let mut cube = Cube::new(3);
        cube.turn(Orientation::Front, Rotation::Clockwise, 0).unwrap();
        for _ in 0..20 {
            let ls = cube
                .find(|o, p, c| o != Orientation::Up && p.is_edge() && c == Color::White)
                .unwrap();
            assert_eq!(ls.orientation, Orientation::Right);
            assert_eq!(ls.position, Position::Left);
        }
        let white = cube.find_all(|_, _, c| c == Color::White);
        assert_eq!(white.len(), 9);
    }

    #[test]
    fn even_cubes_only_report_corners() {
        let cube = Cube::new(4);
        let found = cube.find_all(|_, _, _| true);
        assert_eq!(found.len(), 24);
        assert!(found.iter().all(|ls| ls.position.is_corner()));
    }
}
