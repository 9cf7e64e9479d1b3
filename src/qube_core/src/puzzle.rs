//! The shared, thread-safe puzzle that solvers, renderers and animation
//! drivers all talk to.
//!
//! A turn mutates the logical cube as soon as it is admitted, then stays "in
//! flight" until the animation driver has swept it past ninety degrees. Only
//! one turn may be in flight at a time; callers either block until the gate
//! opens ([`Puzzle::turn`]) or are told to come back later
//! ([`Puzzle::try_turn`]).

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::{
    color::Color,
    cube::{Cube, TurnError},
    face::Face,
    location::LocationSpace,
    orientation::{Direction, Orientation, Rotation},
    position::{GeometryError, Position},
};

/// Everything the solving layer needs from a cube, so that it can run
/// against the live puzzle or against a relabeled view of it.
pub trait TwistyCube {
    fn dimension(&self) -> usize;

    /// Performs the turn and returns once every repetition has visibly
    /// completed.
    ///
    /// # Errors
    ///
    /// Fails if the turn is invalid or the puzzle is shut down while
    /// waiting.
    fn turn(&self, request: TurnRequest) -> Result<(), TurnError>;

    fn color(&self, orientation: Orientation, position: Position) -> Option<Color>;

    fn face(&self, orientation: Orientation) -> Face;

    /// See [`Cube::edge_strip`].
    fn edge_strip(&self, side: Orientation, edge: Direction) -> Vec<Color>;

    fn find<P>(&self, predicate: P) -> Option<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool;

    fn find_all<P>(&self, predicate: P) -> Vec<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool;

    fn is_solved(&self) -> bool;

    /// The live color of `location`, ignoring the color it carries.
    fn color_at(&self, location: LocationSpace) -> Option<Color> {
        self.color(location.orientation, location.position)
    }
}

/// A quarter turn of one layer, repeated `count` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRequest {
    pub orientation: Orientation,
    pub rotation: Rotation,
    pub count: usize,
    pub slice: usize,
}

impl TurnRequest {
    #[must_use]
    pub fn new(orientation: Orientation, rotation: Rotation) -> Self {
        TurnRequest {
            orientation,
            rotation,
            count: 1,
            slice: 0,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_slice(mut self, slice: usize) -> Self {
        self.slice = slice;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Every turn completes the moment it is admitted.
    #[default]
    Instant,
    /// Turns complete only once [`Puzzle::advance_animation`] sweeps them
    /// past ninety degrees.
    Animated,
}

/// A snapshot of the turn currently being animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub orientation: Orientation,
    pub rotation: Rotation,
    pub slice: usize,
    pub degrees: f32,
}

struct InFlight {
    id: u64,
    frame: AnimationFrame,
    /// The face whose whole grid spins with this turn, if the slice is an
    /// outer layer.
    spinning: Option<Orientation>,
    moving: [(Orientation, Vec<usize>); 4],
}

struct State {
    cube: Cube,
    in_flight: Option<InFlight>,
    admitted: u64,
    completed: u64,
    cancelled: bool,
}

pub struct Puzzle {
    state: Mutex<State>,
    settled: Condvar,
    mode: AnimationMode,
}

/// Returned by an admitted turn; waits for that turn to visibly complete.
#[must_use]
pub struct TurnHandle<'a> {
    puzzle: &'a Puzzle,
    id: u64,
}

impl Puzzle {
    /// A solved puzzle whose turns complete instantly.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Puzzle::from_cube(Cube::new(dimension), AnimationMode::Instant)
    }

    #[must_use]
    pub fn from_cube(cube: Cube, mode: AnimationMode) -> Self {
        Puzzle {
            state: Mutex::new(State {
                cube,
                in_flight: None,
                admitted: 0,
                completed: 0,
                cancelled: false,
            }),
            settled: Condvar::new(),
            mode,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, TurnError> {
        self.state.lock().map_err(|_| TurnError::Cancelled)
    }

    // Queries only read plain data, so they keep working on a poisoned lock
    fn read(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// A copy of the logical cube as it stands right now.
    #[must_use]
    pub fn snapshot(&self) -> Cube {
        self.read().cube.clone()
    }

    /// # Errors
    ///
    /// See [`Cube::try_color`].
    pub fn current_color(
        &self,
        orientation: Orientation,
        position: Position,
    ) -> Result<Color, GeometryError> {
        self.read().cube.try_color(orientation, position)
    }

    /// Admits the turn, blocking before each repetition until no other turn
    /// is in flight. The returned handle waits for the last repetition to
    /// complete.
    ///
    /// # Errors
    ///
    /// Fails with [`TurnError::InvalidSlice`] before anything moves, or with
    /// [`TurnError::Cancelled`] if the puzzle shuts down while waiting.
    pub fn turn(&self, request: TurnRequest) -> Result<TurnHandle<'_>, TurnError> {
        let mut state = self.lock()?;
        Self::check_slice(&state, request.slice)?;

        let mut id = state.admitted;
        for _ in 0..request.count {
            state = self
                .settled
                .wait_while(state, |s| s.in_flight.is_some() && !s.cancelled)
                .map_err(|_| TurnError::Cancelled)?;
            id = self.admit(&mut state, request)?;
            // Let other callers in between repetitions
            drop(state);
            state = self.lock()?;
        }

        Ok(TurnHandle { puzzle: self, id })
    }

    /// Like [`Puzzle::turn`], but refuses instead of blocking when another
    /// turn is still in flight at submission.
    ///
    /// # Errors
    ///
    /// Fails with [`TurnError::ConcurrentTurnRejected`] when the gate is
    /// closed, otherwise as [`Puzzle::turn`].
    pub fn try_turn(&self, request: TurnRequest) -> Result<TurnHandle<'_>, TurnError> {
        {
            let state = self.lock()?;
            Self::check_slice(&state, request.slice)?;
            if state.cancelled {
                return Err(TurnError::Cancelled);
            }
            if state.in_flight.is_some() {
                return Err(TurnError::ConcurrentTurnRejected);
            }
        }
        self.turn(request)
    }

    fn check_slice(state: &State, slice: usize) -> Result<(), TurnError> {
        let dimension = state.cube.dimension();
        if slice >= dimension {
            return Err(TurnError::InvalidSlice { slice, dimension });
        }
        Ok(())
    }

    fn admit(&self, state: &mut State, request: TurnRequest) -> Result<u64, TurnError> {
        if state.cancelled {
            return Err(TurnError::Cancelled);
        }
        let TurnRequest {
            orientation,
            rotation,
            slice,
            ..
        } = request;

        state.cube.turn(orientation, rotation, slice)?;
        state.admitted += 1;
        let id = state.admitted;
        debug!(target: "turn", "Admitted turn #{id}: {orientation}{} slice {slice}", rotation.suffix());

        match self.mode {
            AnimationMode::Instant => {
                state.completed = id;
                self.settled.notify_all();
            }
            AnimationMode::Animated => {
                let dimension = state.cube.dimension();
                let spinning = if slice == 0 {
                    Some(orientation)
                } else if slice == dimension - 1 {
                    Some(orientation.opposite())
                } else {
                    None
                };
                state.in_flight = Some(InFlight {
                    id,
                    frame: AnimationFrame {
                        orientation,
                        rotation,
                        slice,
                        degrees: 0.0,
                    },
                    spinning,
                    moving: state.cube.moving_strips(orientation, slice),
                });
            }
        }
        Ok(id)
    }

    /// Sweeps the in-flight turn forward. Returns whether this completed it.
    pub fn advance_animation(&self, degrees: f32) -> bool {
        let mut state = self.read();
        let Some(in_flight) = &mut state.in_flight else {
            return false;
        };
        in_flight.frame.degrees += degrees;
        if in_flight.frame.degrees <= 90.0 {
            return false;
        }

        let id = in_flight.id;
        state.in_flight = None;
        state.completed = id;
        debug!(target: "turn", "Completed turn #{id}");
        self.settled.notify_all();
        true
    }

    #[must_use]
    pub fn animation_frame(&self) -> Option<AnimationFrame> {
        self.read().in_flight.as_ref().map(|in_flight| in_flight.frame)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.read().in_flight.is_some()
    }

    /// Whether the cell at `index` of the `orientation` face is part of the
    /// turn in flight, and so should be drawn by the animation rather than
    /// from the logical state.
    #[must_use]
    pub fn is_blacklisted(&self, orientation: Orientation, index: usize) -> bool {
        let state = self.read();
        let Some(in_flight) = &state.in_flight else {
            return false;
        };
        in_flight.spinning == Some(orientation)
            || in_flight
                .moving
                .iter()
                .any(|(face, cells)| *face == orientation && cells.contains(&index))
    }

    /// Shuts the puzzle down. Anyone waiting for the gate or for a turn to
    /// complete wakes up with [`TurnError::Cancelled`].
    pub fn cancel(&self) {
        let mut state = self.read();
        state.cancelled = true;
        state.in_flight = None;
        self.settled.notify_all();
    }
}

impl TurnHandle<'_> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.puzzle.read().completed >= self.id
    }

    /// Blocks until the turn has visibly completed.
    ///
    /// # Errors
    ///
    /// Fails with [`TurnError::Cancelled`] if the puzzle shuts down first.
    pub fn wait(self) -> Result<(), TurnError> {
        let state = self.puzzle.lock()?;
        let state = self
            .puzzle
            .settled
            .wait_while(state, |s| s.completed < self.id && !s.cancelled)
            .map_err(|_| TurnError::Cancelled)?;
        if state.completed >= self.id {
            Ok(())
        } else {
            Err(TurnError::Cancelled)
        }
    }
}

impl TwistyCube for Puzzle {
    fn dimension(&self) -> usize {
        self.read().cube.dimension()
    }

    fn turn(&self, request: TurnRequest) -> Result<(), TurnError> {
        Puzzle::turn(self, request)?.wait()
    }

    fn color(&self, orientation: Orientation, position: Position) -> Option<Color> {
        self.read().cube.color(orientation, position)
    }

    fn face(&self, orientation: Orientation) -> Face {
        self.read().cube.face(orientation).clone()
    }

    fn edge_strip(&self, side: Orientation, edge: Direction) -> Vec<Color> {
        self.read().cube.edge_strip(side, edge)
    }

    // Searches run on a snapshot so predicates can query the puzzle freely
    fn find<P>(&self, predicate: P) -> Option<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.snapshot().find(predicate)
    }

    fn find_all<P>(&self, predicate: P) -> Vec<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.snapshot().find_all(predicate)
    }

    fn is_solved(&self) -> bool {
        self.read().cube.is_solved()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::*;

    fn animated() -> Puzzle {
        Puzzle::from_cube(Cube::new(3), AnimationMode::Animated)
    }

    #[test]
    fn instant_turns_complete_immediately() {
        let puzzle = Puzzle::new(3);
        let handle = puzzle
            .turn(TurnRequest::new(Orientation::Right, Rotation::Clockwise))
            .unwrap();
        assert!(handle.is_complete());
        handle.wait().unwrap();
        assert!(!TwistyCube::is_solved(&puzzle));

        TwistyCube::turn(
            &puzzle,
            TurnRequest::new(Orientation::Right, Rotation::CounterClockwise),
        )
        .unwrap();
        assert!(TwistyCube::is_solved(&puzzle));
    }

    #[test]
    fn count_repeats_the_turn() {
        let puzzle = Puzzle::new(3);
        TwistyCube::turn(
            &puzzle,
            TurnRequest::new(Orientation::Up, Rotation::Clockwise).with_count(4),
        )
        .unwrap();
        assert!(TwistyCube::is_solved(&puzzle));
    }

    #[test]
    fn logical_state_changes_before_animation_ends() {
        let puzzle = animated();
        let handle = puzzle
            .turn(TurnRequest::new(Orientation::Front, Rotation::Clockwise))
            .unwrap();
        assert!(!handle.is_complete());
        assert_eq!(
            puzzle.current_color(Orientation::Right, Position::Left),
            Ok(Color::White)
        );

        assert!(!puzzle.advance_animation(45.0));
        assert!(!puzzle.advance_animation(45.0));
        assert!(puzzle.advance_animation(1.0));
        assert!(handle.is_complete());
        handle.wait().unwrap();
    }

    #[test]
    fn second_turn_is_rejected_while_in_flight() {
        let puzzle = animated();
        let _first = puzzle
            .turn(TurnRequest::new(Orientation::Up, Rotation::Clockwise))
            .unwrap();
        assert_eq!(
            puzzle
                .try_turn(TurnRequest::new(Orientation::Down, Rotation::Clockwise))
                .err(),
            Some(TurnError::ConcurrentTurnRejected)
        );
        puzzle.advance_animation(100.0);
        assert!(
            puzzle
                .try_turn(TurnRequest::new(Orientation::Down, Rotation::Clockwise))
                .is_ok()
        );
    }

    #[test]
    fn blacklist_covers_moving_cells_only() {
        let puzzle = animated();
        assert!(!puzzle.is_blacklisted(Orientation::Up, 0));

        let _handle = puzzle
            .turn(TurnRequest::new(Orientation::Up, Rotation::Clockwise))
            .unwrap();
        for index in 0..9 {
            assert!(puzzle.is_blacklisted(Orientation::Up, index));
            assert!(!puzzle.is_blacklisted(Orientation::Down, index));
        }
        for side in Orientation::SIDES {
            assert!(puzzle.is_blacklisted(side, 0));
            assert!(puzzle.is_blacklisted(side, 2));
            assert!(!puzzle.is_blacklisted(side, 3));
            assert!(!puzzle.is_blacklisted(side, 8));
        }

        puzzle.advance_animation(91.0);
        assert!(!puzzle.is_blacklisted(Orientation::Up, 0));
    }

    #[test]
    fn middle_slice_does_not_spin_a_face() {
        let puzzle = animated();
        let _handle = puzzle
            .turn(TurnRequest::new(Orientation::Right, Rotation::Clockwise).with_slice(1))
            .unwrap();
        assert!(!puzzle.is_blacklisted(Orientation::Right, 0));
        assert!(!puzzle.is_blacklisted(Orientation::Left, 0));
        assert!(puzzle.is_blacklisted(Orientation::Front, 1));
        assert!(puzzle.is_blacklisted(Orientation::Front, 4));
        assert_eq!(
            puzzle.animation_frame().map(|frame| frame.slice),
            Some(1)
        );
    }

    #[test]
    fn invalid_slice_never_moves() {
        let puzzle = animated();
        assert_eq!(
            puzzle
                .turn(TurnRequest::new(Orientation::Up, Rotation::Clockwise).with_slice(7))
                .err(),
            Some(TurnError::InvalidSlice {
                slice: 7,
                dimension: 3
            })
        );
        assert!(!puzzle.is_animating());
    }

    #[test]
    fn blocked_turn_waits_for_the_driver() {
        let puzzle = Arc::new(animated());
        let _first = puzzle
            .turn(TurnRequest::new(Orientation::Up, Rotation::Clockwise))
            .unwrap();

        let solver = {
            let puzzle = Arc::clone(&puzzle);
            thread::spawn(move || {
                TwistyCube::turn(
                    &*puzzle,
                    TurnRequest::new(Orientation::Up, Rotation::CounterClockwise),
                )
            })
        };

        // Drive the animation until both turns have played out
        while !solver.is_finished() {
            puzzle.advance_animation(30.0);
            thread::sleep(Duration::from_millis(1));
        }
        solver.join().unwrap().unwrap();
        assert!(TwistyCube::is_solved(&*puzzle));
    }

    #[test]
    fn cancel_wakes_waiters() {
        let puzzle = Arc::new(animated());
        let handle = {
            let puzzle = Arc::clone(&puzzle);
            thread::spawn(move || {
                TwistyCube::turn(
                    &*puzzle,
                    TurnRequest::new(Orientation::Left, Rotation::Clockwise),
                )
            })
        };
        while !puzzle.is_animating() {
            thread::sleep(Duration::from_millis(1));
        }
        puzzle.cancel();
        assert_eq!(handle.join().unwrap(), Err(TurnError::Cancelled));
        assert_eq!(
            puzzle
                .turn(TurnRequest::new(Orientation::Left, Rotation::Clockwise))
                .err(),
            Some(TurnError::Cancelled)
        );
    }

    #[test]
    fn find_sees_the_current_state() {
        let puzzle = Puzzle::new(3);
        TwistyCube::turn(
            &puzzle,
            TurnRequest::new(Orientation::Front, Rotation::Clockwise),
        )
        .unwrap();
        let found = puzzle.find(|o, p, c| {
            o == Orientation::Right && p.is_edge() && c == Color::White
        });
        assert_eq!(found.map(|ls| ls.position), Some(Position::Left));
    }
}
