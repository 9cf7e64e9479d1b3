//! A layer-by-layer solver for the 3x3x3 cube.
//!
//! The `Up` face is solved first and the `Down` face is the last layer. Every
//! stage is a loop of search, pick a short macro, play it and look again.
//! Macros are written for a cube held with the slot being worked on in
//! front and are played through a [`Remapped`] view that carries `Front`
//! onto the real slot.

use std::{
    cell::Cell,
    fmt::{self, Display},
    time::{Duration, Instant},
};

use log::{debug, info, trace};
use qube_core::{
    Color, Direction, Face, GeometryError, LocationSpace, NotationError, Orientation,
    Position, Rotation, TurnError, TurnRequest, TwistyCube, parse_moves,
};
use thiserror::Error;

use crate::{
    config::SolverConfig,
    remap::Remapped,
    shapes::{CornerFormation, DownCorners, DownShape, EdgeFormation},
    start, success, working,
};

use Orientation::{Back, Down, Front, Up};

/// Moves a corner out of the top layer, into the slot below `Front`/`Right`.
/// Played with a corner below that slot whose white sticker faces `Right`,
/// the same moves insert it.
const LIFT_CORNER: &str = "R' D' R";
const CORNER_FROM_DOWN: &str = "R' D2 R D";
const CORNER_FROM_FRONT: &str = "F D F'";
/// Inserts the `Front`/`Down` edge into the `Front`/`Right` slot.
const INSERT_RIGHT: &str = "D' R' D R D F D' F'";
/// Inserts the `Front`/`Down` edge into the `Front`/`Left` slot.
const INSERT_LEFT: &str = "D L D' L' D' F' D F";
const ORIENT_EDGES: &str = "B R D R' D' B'";
const PLACE_CORNERS: &str = "L D L' D L D2 L'";
const SWAP_CORNERS: &str = "L' F L' B2 L F' L' B2 L2";
/// Cycles the `Front`, `Left` and `Right` edges of the last layer, keeping
/// the `Back` one.
const CYCLE_EDGES: &str = "F2 D R L' F2 R' L D F2";
const CYCLE_EDGES_REVERSED: &str = "F2 D' R L' F2 R' L D' F2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Cross,
    FirstLayerCorners,
    SecondLayerEdges,
    LastLayerEdgeOrientation,
    LastLayerCornerPlacement,
    LastLayerCornerOrientation,
    LastLayerEdgePermutation,
}

impl Stage {
    pub const ALL: [Self; 7] = [
        Stage::Cross,
        Stage::FirstLayerCorners,
        Stage::SecondLayerEdges,
        Stage::LastLayerEdgeOrientation,
        Stage::LastLayerCornerPlacement,
        Stage::LastLayerCornerOrientation,
        Stage::LastLayerEdgePermutation,
    ];
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Cross => "cross",
            Stage::FirstLayerCorners => "first layer corners",
            Stage::SecondLayerEdges => "second layer edges",
            Stage::LastLayerEdgeOrientation => "last layer edge orientation",
            Stage::LastLayerCornerPlacement => "last layer corner placement",
            Stage::LastLayerCornerOrientation => "last layer corner orientation",
            Stage::LastLayerEdgePermutation => "last layer edge permutation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("the {stage} stage did not finish within {iterations} iterations")]
    Stuck { stage: Stage, iterations: usize },
    #[error("only the 3x3x3 cube can be solved, not a cube of dimension {0}")]
    UnsupportedDimension(usize),
    #[error("the {0} stage found a pattern that no legal cube can show")]
    Unsolvable(Stage),
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Notation(#[from] NotationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// Passes through the stage's main loop.
    pub iterations: usize,
    pub quarter_turns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveReport {
    pub stages: Vec<StageReport>,
    pub elapsed: Duration,
}

impl SolveReport {
    #[must_use]
    pub fn quarter_turns(&self) -> usize {
        self.stages.iter().map(|stage| stage.quarter_turns).sum()
    }
}

pub struct LayerSolver<'a, C: ?Sized> {
    cube: &'a C,
    config: SolverConfig,
}

impl<'a, C: TwistyCube + ?Sized> LayerSolver<'a, C> {
    pub fn new(cube: &'a C) -> Self {
        LayerSolver {
            cube,
            config: SolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs every stage in order, waiting for each turn to complete before
    /// looking at the cube again.
    pub fn solve(&self) -> Result<SolveReport, SolverError> {
        let dimension = self.cube.dimension();
        if dimension != 3 {
            return Err(SolverError::UnsupportedDimension(dimension));
        }

        let started = Instant::now();
        let cube = Counted::new(self.cube);
        let mut report = SolveReport::default();
        if cube.is_solved() {
            info!(target: "solver", "Cube is already solved");
            return Ok(report);
        }

        info!(target: "solver", start!("Solving the cube layer by layer"));
        let limit = self.config.stage_iteration_limit;
        for stage in Stage::ALL {
            let before = cube.quarter_turns();
            let iterations = match stage {
                Stage::Cross => cross(&cube, limit),
                Stage::FirstLayerCorners => first_layer_corners(&cube, limit),
                Stage::SecondLayerEdges => second_layer_edges(&cube, limit),
                Stage::LastLayerEdgeOrientation => orient_last_layer_edges(&cube, limit),
                Stage::LastLayerCornerPlacement => place_last_layer_corners(&cube, limit),
                Stage::LastLayerCornerOrientation => orient_last_layer_corners(&cube, limit),
                Stage::LastLayerEdgePermutation => permute_last_layer_edges(&cube, limit),
            }?;
            let quarter_turns = cube.quarter_turns() - before;
            debug!(
                target: "solver",
                working!("Finished the {} stage: {} iterations, {} quarter turns"),
                stage,
                iterations,
                quarter_turns
            );
            report.stages.push(StageReport {
                stage,
                iterations,
                quarter_turns,
            });
        }

        report.elapsed = started.elapsed();
        info!(
            target: "solver",
            success!("Solved in {} quarter turns in {:.3}s"),
            report.quarter_turns(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

/// Bounds one loop of a stage.
struct Guard {
    stage: Stage,
    limit: usize,
    iterations: usize,
}

impl Guard {
    fn new(stage: Stage, limit: usize) -> Self {
        Guard {
            stage,
            limit,
            iterations: 0,
        }
    }

    fn tick(&mut self) -> Result<(), SolverError> {
        self.iterations += 1;
        if self.iterations > self.limit {
            return Err(SolverError::Stuck {
                stage: self.stage,
                iterations: self.limit,
            });
        }
        Ok(())
    }
}

/// Tallies the quarter turns played through it.
struct Counted<'a, C: ?Sized> {
    cube: &'a C,
    quarter_turns: Cell<usize>,
}

impl<'a, C: TwistyCube + ?Sized> Counted<'a, C> {
    fn new(cube: &'a C) -> Self {
        Counted {
            cube,
            quarter_turns: Cell::new(0),
        }
    }

    fn quarter_turns(&self) -> usize {
        self.quarter_turns.get()
    }
}

impl<C: TwistyCube + ?Sized> TwistyCube for Counted<'_, C> {
    fn dimension(&self) -> usize {
        self.cube.dimension()
    }

    fn turn(&self, request: TurnRequest) -> Result<(), TurnError> {
        self.cube.turn(request)?;
        self.quarter_turns.set(self.quarter_turns.get() + request.count);
        Ok(())
    }

    fn color(&self, orientation: Orientation, position: Position) -> Option<Color> {
        self.cube.color(orientation, position)
    }

    fn face(&self, orientation: Orientation) -> Face {
        self.cube.face(orientation)
    }

    fn edge_strip(&self, side: Orientation, edge: Direction) -> Vec<Color> {
        self.cube.edge_strip(side, edge)
    }

    fn find<P>(&self, predicate: P) -> Option<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.cube.find(predicate)
    }

    fn find_all<P>(&self, predicate: P) -> Vec<LocationSpace>
    where
        P: FnMut(Orientation, Position, Color) -> bool,
    {
        self.cube.find_all(predicate)
    }

    fn is_solved(&self) -> bool {
        self.cube.is_solved()
    }
}

fn perform<C: TwistyCube + ?Sized>(cube: &C, algorithm: &str) -> Result<(), SolverError> {
    trace!(target: "solver", "Playing {algorithm}");
    for mv in parse_moves(algorithm)? {
        cube.turn(mv.request())?;
    }
    Ok(())
}

/// Turns `Down` clockwise `quarters` times, as a single move.
fn turn_down_by<C: TwistyCube + ?Sized>(cube: &C, quarters: usize) -> Result<(), SolverError> {
    let request = match quarters % 4 {
        0 => return Ok(()),
        3 => TurnRequest::new(Down, Rotation::CounterClockwise),
        count => TurnRequest::new(Down, Rotation::Clockwise).with_count(count),
    };
    cube.turn(request)?;
    Ok(())
}

fn turn_twice<C: TwistyCube + ?Sized>(cube: &C, orientation: Orientation) -> Result<(), SolverError> {
    cube.turn(TurnRequest::new(orientation, Rotation::Clockwise).with_count(2))?;
    Ok(())
}

/// Quarter turns `turn_down_by` spends on `quarters`.
fn quarter_cost(quarters: usize) -> usize {
    match quarters % 4 {
        3 => 1,
        quarters => quarters,
    }
}

/// The fewest clockwise `Down` turns after which `aligned` holds.
fn down_quarters<F>(stage: Stage, aligned: F) -> Result<usize, SolverError>
where
    F: Fn(usize) -> bool,
{
    (0..4)
        .find(|&quarters| aligned(quarters))
        .ok_or(SolverError::Unsolvable(stage))
}

fn in_down_layer(orientation: Orientation, position: Position) -> bool {
    orientation == Down
        || (orientation.is_side()
            && matches!(
                position,
                Position::BottomLeft | Position::Bottom | Position::BottomRight
            ))
}

/// The color a sticker will show once `Down` has turned clockwise
/// `quarters` times, read without turning.
fn color_after_down<C: TwistyCube + ?Sized>(
    cube: &C,
    orientation: Orientation,
    position: Position,
    quarters: usize,
) -> Option<Color> {
    let (mut orientation, mut position) = (orientation, position);
    if in_down_layer(orientation, position) {
        for _ in 0..quarters % 4 {
            if orientation == Down {
                position = position.rotated_clockwise_by(3);
            } else {
                orientation = orientation.step(Direction::Left);
            }
        }
    }
    cube.color(orientation, position)
}

/// The side face one below it moves to after `quarters` clockwise `Down`
/// turns.
fn step_right(side: Orientation, quarters: usize) -> Orientation {
    (0..quarters % 4).fold(side, |side, _| side.step(Direction::Right))
}

/// The position on `face` that borders `side`.
fn toward(face: Orientation, side: Orientation) -> Result<Position, SolverError> {
    face.direction_to(side)
        .map(Position::edge)
        .ok_or(SolverError::Geometry(GeometryError::IllegalLocation {
            orientation: face,
            position: Position::Center,
            transform: "border",
        }))
}

fn center<C: TwistyCube + ?Sized>(cube: &C, orientation: Orientation) -> Result<Color, SolverError> {
    cube.color(orientation, Position::Center)
        .ok_or(SolverError::UnsupportedDimension(cube.dimension()))
}

/// Where a sticker in the `Down` layer goes when `Down` turns clockwise
/// `quarters` times.
fn follow_down_turns(location: LocationSpace, quarters: usize) -> LocationSpace {
    if location.orientation == Down {
        LocationSpace {
            position: location.position.rotated_clockwise_by(quarters),
            ..location
        }
    } else {
        LocationSpace {
            orientation: step_right(location.orientation, quarters),
            ..location
        }
    }
}

fn same_pair<T: PartialEq>([a, b]: [T; 2], [x, y]: [T; 2]) -> bool {
    (a == x && b == y) || (a == y && b == x)
}

/// The side face that has this top or bottom layer corner in its right
/// column.
fn slot_front(stickers: &[LocationSpace; 3]) -> Result<Orientation, SolverError> {
    stickers
        .iter()
        .find(|s| {
            s.orientation.is_side()
                && matches!(s.position, Position::TopRight | Position::BottomRight)
        })
        .map(|s| s.orientation)
        .ok_or(SolverError::Geometry(GeometryError::IllegalLocation {
            orientation: stickers[0].orientation,
            position: stickers[0].position,
            transform: "corner slot",
        }))
}

fn corner_solved<C: TwistyCube + ?Sized>(cube: &C, corner: LocationSpace) -> bool {
    if corner.orientation != Up {
        return false;
    }
    let Ok([_, a, b]) = corner.corner_stickers() else {
        return false;
    };
    [a, b]
        .iter()
        .all(|s| cube.color_at(*s) == cube.color(s.orientation, Position::Center))
}

fn edge_twin_color<C: TwistyCube + ?Sized>(cube: &C, edge: LocationSpace) -> Option<Color> {
    edge.flip_edge().ok().and_then(|twin| cube.color_at(twin))
}

fn cross<C: TwistyCube + ?Sized>(cube: &C, limit: usize) -> Result<usize, SolverError> {
    let stage = Stage::Cross;
    let white = center(cube, Up)?;

    // Gather the white edges around the Down center, white side down
    let mut daisy = Guard::new(stage, limit);
    while let Some(edge) =
        cube.find(|o, p, c| o != Down && p.is_edge() && c == white)
    {
        daisy.tick()?;
        let (side, landing) = if edge.orientation == Up {
            (Up.neighbor(edge.position)?, edge.position.across(Up))
        } else {
            let side = match edge.position {
                Position::Top | Position::Bottom => edge.orientation,
                position => edge.orientation.neighbor(position)?,
            };
            (side, toward(Down, side)?)
        };
        // Clear the spot the edge drops onto
        let quarters = down_quarters(stage, |k| {
            color_after_down(cube, Down, landing, k) != Some(white)
        })?;
        turn_down_by(cube, quarters)?;
        if edge.orientation == Up {
            turn_twice(cube, side)?;
        } else {
            cube.turn(TurnRequest::new(side, Rotation::Clockwise))?;
        }
    }

    // Raise each one under its own center, nearest first
    let mut flip = Guard::new(stage, limit);
    loop {
        let plans = cube
            .find_all(|o, p, c| o == Down && p.is_edge() && c == white)
            .into_iter()
            .map(|edge| -> Result<_, SolverError> {
                let side = Down.neighbor(edge.position)?;
                let color = cube.color(side, Position::Bottom);
                let quarters = down_quarters(stage, |k| {
                    cube.color(step_right(side, k), Position::Center) == color
                })?;
                Ok((quarters, step_right(side, quarters)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let Some((quarters, side)) = plans
            .into_iter()
            .min_by_key(|&(quarters, _)| quarter_cost(quarters))
        else {
            break;
        };
        flip.tick()?;
        turn_down_by(cube, quarters)?;
        turn_twice(cube, side)?;
    }

    Ok(daisy.iterations + flip.iterations)
}

/// Where the white sticker of a bottom layer corner faces once the corner
/// sits below its slot. Facing `Right` is the lift played again, so three
/// cases cover all eight ways a corner can wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CornerCase {
    FacingDown,
    FacingFront,
    FacingRight,
}

impl CornerCase {
    fn algorithm(self) -> &'static str {
        match self {
            CornerCase::FacingDown => CORNER_FROM_DOWN,
            CornerCase::FacingFront => CORNER_FROM_FRONT,
            CornerCase::FacingRight => LIFT_CORNER,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CornerPlan {
    /// Knock a top layer corner down into the bottom layer.
    Lift(Orientation),
    Insert {
        quarters: usize,
        white_sticker: LocationSpace,
    },
}

impl CornerPlan {
    fn cost(&self) -> usize {
        match self {
            CornerPlan::Lift(_) => usize::MAX,
            CornerPlan::Insert { quarters, .. } => quarter_cost(*quarters),
        }
    }
}

fn plan_corner<C: TwistyCube + ?Sized>(
    cube: &C,
    corner: LocationSpace,
) -> Result<CornerPlan, SolverError> {
    let stickers = corner.corner_stickers()?;
    if stickers.iter().any(|s| s.orientation == Up) {
        return Ok(CornerPlan::Lift(slot_front(&stickers)?));
    }

    let [_, a, b] = stickers;
    let colors = [cube.color_at(a), cube.color_at(b)];
    let below_slot = |quarters| -> Result<bool, SolverError> {
        let white_sticker = follow_down_turns(corner, quarters);
        let [_, a, b] = white_sticker.corner_stickers()?;
        let slot = slot_front(&[white_sticker, a, b])?;
        let wanted = [
            cube.color(slot, Position::Center),
            cube.color(slot.step(Direction::Right), Position::Center),
        ];
        Ok(same_pair(colors, wanted))
    };
    for quarters in 0..4 {
        if below_slot(quarters)? {
            return Ok(CornerPlan::Insert {
                quarters,
                white_sticker: corner,
            });
        }
    }
    Err(SolverError::Unsolvable(Stage::FirstLayerCorners))
}

fn first_layer_corners<C: TwistyCube + ?Sized>(cube: &C, limit: usize) -> Result<usize, SolverError> {
    let white = center(cube, Up)?;
    let mut guard = Guard::new(Stage::FirstLayerCorners, limit);

    loop {
        let plans = cube
            .find_all(|o, p, c| {
                p.is_corner() && c == white && !corner_solved(cube, LocationSpace::new(o, p, c))
            })
            .into_iter()
            .map(|corner| plan_corner(cube, corner))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(plan) = plans.into_iter().min_by_key(CornerPlan::cost) else {
            break;
        };
        guard.tick()?;

        match plan {
            CornerPlan::Lift(slot) => {
                trace!(target: "solver", "Lifting a misplaced corner out of the {slot} slot");
                perform(&Remapped::rebase(cube, Front, slot), LIFT_CORNER)?;
            }
            CornerPlan::Insert {
                quarters,
                white_sticker,
            } => {
                turn_down_by(cube, quarters)?;
                let white_sticker = follow_down_turns(white_sticker, quarters);
                let [_, a, b] = white_sticker.corner_stickers()?;
                let slot = slot_front(&[white_sticker, a, b])?;
                let case = if white_sticker.orientation == Down {
                    CornerCase::FacingDown
                } else if white_sticker.orientation == slot {
                    CornerCase::FacingFront
                } else {
                    CornerCase::FacingRight
                };
                trace!(target: "solver", "Inserting a corner into the {slot} slot: {case:?}");
                perform(&Remapped::rebase(cube, Front, slot), case.algorithm())?;
            }
        }
    }

    Ok(guard.iterations)
}

fn second_layer_edges<C: TwistyCube + ?Sized>(cube: &C, limit: usize) -> Result<usize, SolverError> {
    let stage = Stage::SecondLayerEdges;
    let yellow = center(cube, Down)?;
    let mut guard = Guard::new(stage, limit);

    loop {
        let plans = cube
            .find_all(|o, p, c| {
                o.is_side()
                    && p == Position::Bottom
                    && c != yellow
                    && edge_twin_color(cube, LocationSpace::new(o, p, c)) != Some(yellow)
            })
            .into_iter()
            .map(|edge| -> Result<_, SolverError> {
                let quarters = down_quarters(stage, |k| {
                    cube.color(step_right(edge.orientation, k), Position::Center)
                        == Some(edge.color)
                })?;
                Ok((quarters, step_right(edge.orientation, quarters)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some((quarters, face)) = plans
            .into_iter()
            .min_by_key(|&(quarters, _)| quarter_cost(quarters))
        else {
            // Nothing left to insert, but a middle edge may sit in the wrong
            // slot or be flipped; knock it back into the last layer
            let misplaced = cube.find(|o, p, c| {
                if !o.is_side() || p != Position::Right {
                    return false;
                }
                let edge = LocationSpace::new(o, p, c);
                let twin_center = edge
                    .flip_edge()
                    .ok()
                    .and_then(|twin| cube.color(twin.orientation, Position::Center));
                Some(c) != cube.color(o, Position::Center)
                    || edge_twin_color(cube, edge) != twin_center
            });
            let Some(edge) = misplaced else {
                break;
            };
            guard.tick()?;
            trace!(target: "solver", "Ejecting a misplaced middle edge from {}", edge.orientation);
            perform(&Remapped::rebase(cube, Front, edge.orientation), INSERT_RIGHT)?;
            continue;
        };

        guard.tick()?;
        turn_down_by(cube, quarters)?;
        let twin = LocationSpace::new(face, Position::Bottom, yellow).flip_edge()?;
        let algorithm = if cube.color_at(twin)
            == cube.color(face.step(Direction::Right), Position::Center)
        {
            INSERT_RIGHT
        } else {
            INSERT_LEFT
        };
        perform(&Remapped::rebase(cube, Front, face), algorithm)?;
    }

    Ok(guard.iterations)
}

fn orient_last_layer_edges<C: TwistyCube + ?Sized>(
    cube: &C,
    limit: usize,
) -> Result<usize, SolverError> {
    let stage = Stage::LastLayerEdgeOrientation;
    let mut guard = Guard::new(stage, limit);

    loop {
        let shape = DownShape::read(cube);
        let formation = shape.formation().ok_or(SolverError::Unsolvable(stage))?;
        trace!(target: "solver", "Down edges form a {formation:?}");

        let quarters = match formation {
            EdgeFormation::Star => break,
            EdgeFormation::Dot => 0,
            EdgeFormation::Hook => down_quarters(stage, |k| {
                let shape = shape.turned(k);
                shape.north && shape.west
            })?,
            EdgeFormation::Line => down_quarters(stage, |k| {
                let shape = shape.turned(k);
                shape.east && shape.west
            })?,
        };
        guard.tick()?;
        turn_down_by(cube, quarters)?;
        perform(cube, ORIENT_EDGES)?;
    }

    Ok(guard.iterations)
}

fn place_last_layer_corners<C: TwistyCube + ?Sized>(
    cube: &C,
    limit: usize,
) -> Result<usize, SolverError> {
    let stage = Stage::LastLayerCornerPlacement;
    let yellow = center(cube, Down)?;
    let mut guard = Guard::new(stage, limit);

    loop {
        let formation = DownCorners::read(cube)
            .formation()
            .ok_or(SolverError::Unsolvable(stage))?;
        trace!(target: "solver", "Down corners form {formation:?}");

        // The sticker that must be yellow before the macro is played
        let (face, position) = match formation {
            CornerFormation::Done => break,
            CornerFormation::One => (Down, Position::TopRight),
            CornerFormation::None => (Orientation::Right, Position::BottomLeft),
            CornerFormation::TwoLine | CornerFormation::TwoAcross => {
                (Front, Position::BottomRight)
            }
        };
        guard.tick()?;
        let quarters = down_quarters(stage, |k| {
            color_after_down(cube, face, position, k) == Some(yellow)
        })?;
        turn_down_by(cube, quarters)?;
        perform(cube, PLACE_CORNERS)?;
    }

    Ok(guard.iterations)
}

fn bottom_corners_match<C: TwistyCube + ?Sized>(cube: &C, side: Orientation) -> bool {
    cube.color(side, Position::BottomLeft) == cube.color(side, Position::BottomRight)
}

fn orient_last_layer_corners<C: TwistyCube + ?Sized>(
    cube: &C,
    limit: usize,
) -> Result<usize, SolverError> {
    let stage = Stage::LastLayerCornerOrientation;
    let mut guard = Guard::new(stage, limit);

    while !Orientation::SIDES
        .into_iter()
        .all(|side| bottom_corners_match(cube, side))
    {
        guard.tick()?;
        // Park a matching pair at the back if there is one
        let quarters = (0..4)
            .find(|&k| {
                color_after_down(cube, Back, Position::BottomLeft, k)
                    == color_after_down(cube, Back, Position::BottomRight, k)
            })
            .unwrap_or(0);
        turn_down_by(cube, quarters)?;
        perform(cube, SWAP_CORNERS)?;
    }

    let front = cube.color(Front, Position::Center);
    let quarters = down_quarters(stage, |k| {
        color_after_down(cube, Front, Position::BottomLeft, k) == front
    })?;
    turn_down_by(cube, quarters)?;

    Ok(guard.iterations)
}

fn permute_last_layer_edges<C: TwistyCube + ?Sized>(
    cube: &C,
    limit: usize,
) -> Result<usize, SolverError> {
    let stage = Stage::LastLayerEdgePermutation;
    let mut guard = Guard::new(stage, limit);

    while !cube.is_solved() {
        guard.tick()?;
        let headlights = Orientation::SIDES.into_iter().find(|&side| {
            cube.color(side, Position::Bottom) == cube.color(side, Position::Center)
        });

        let Some(solved_face) = headlights else {
            perform(cube, CYCLE_EDGES)?;
            continue;
        };
        trace!(target: "solver", "Headlights on {solved_face}");

        // Hold the solved edge at the back and cycle the other three
        let view = Remapped::rebase(cube, Front, solved_face.opposite());
        let algorithm = if view.color(Front, Position::Bottom)
            == view.color(Orientation::Left, Position::Center)
        {
            CYCLE_EDGES_REVERSED
        } else {
            CYCLE_EDGES
        };
        perform(&view, algorithm)?;
    }

    Ok(guard.iterations)
}

#[cfg(test)]
mod tests {
    use qube_core::{AnimationMode, Cube, Puzzle};

    use super::*;

    fn apply_moves<C: TwistyCube + ?Sized>(cube: &C, moves: &str) {
        perform(cube, moves).unwrap();
    }

    #[test]
    fn solved_cube_needs_no_turns() {
        let puzzle = Puzzle::new(3);
        let report = LayerSolver::new(&puzzle).solve().unwrap();
        assert!(report.stages.is_empty());
        assert_eq!(report.quarter_turns(), 0);
    }

    #[test]
    fn single_turn() {
        for mv in ["F", "B'", "U", "D2", "R'", "L"] {
            let puzzle = Puzzle::new(3);
            apply_moves(&puzzle, mv);
            LayerSolver::new(&puzzle).solve().unwrap();
            assert!(puzzle.is_solved(), "{mv}");
        }
    }

    #[test]
    fn report_covers_every_stage() {
        let puzzle = Puzzle::new(3);
        apply_moves(&puzzle, "R U R' U' F2 D L'");
        let report = LayerSolver::new(&puzzle).solve().unwrap();
        assert!(puzzle.is_solved());
        assert_eq!(
            report.stages.iter().map(|s| s.stage).collect::<Vec<_>>(),
            Stage::ALL
        );
        assert!(report.quarter_turns() > 0);
    }

    #[test]
    fn rejects_other_dimensions() {
        for dimension in [2, 4] {
            let puzzle = Puzzle::new(dimension);
            assert!(matches!(
                LayerSolver::new(&puzzle).solve(),
                Err(SolverError::UnsupportedDimension(d)) if d == dimension
            ));
        }
    }

    #[test]
    fn guard_trips_after_the_limit() {
        let mut guard = Guard::new(Stage::Cross, 2);
        guard.tick().unwrap();
        guard.tick().unwrap();
        assert!(matches!(
            guard.tick(),
            Err(SolverError::Stuck {
                stage: Stage::Cross,
                iterations: 2
            })
        ));
    }

    #[test]
    fn tiny_limit_reports_stuck() {
        let puzzle = Puzzle::new(3);
        apply_moves(&puzzle, "R U R' U' F2 D L' B U2 R");
        let result = LayerSolver::new(&puzzle)
            .with_config(SolverConfig {
                stage_iteration_limit: 0,
            })
            .solve();
        assert!(matches!(result, Err(SolverError::Stuck { .. })));
    }

    #[test]
    fn counted_tallies_repeats() {
        let puzzle = Puzzle::new(3);
        let counted = Counted::new(&puzzle);
        perform(&counted, "R2 U' F").unwrap();
        assert_eq!(counted.quarter_turns(), 4);
    }

    fn scrambled(seed: u64) -> Cube {
        let mut cube = Cube::new(3);
        cube.scramble(&mut fastrand::Rng::with_seed(seed), 20, 20);
        cube
    }

    #[test]
    fn follow_down_turns_matches_the_cube() {
        for quarters in 0..4 {
            let puzzle = Puzzle::from_cube(scrambled(5), AnimationMode::Instant);
            let stickers = puzzle.find_all(in_down_layer_filter);
            let before = puzzle.snapshot();
            turn_down_by(&puzzle, quarters).unwrap();
            for sticker in stickers {
                let moved = follow_down_turns(sticker, quarters);
                assert_eq!(
                    puzzle.color_at(moved),
                    before.color(sticker.orientation, sticker.position)
                );
            }
        }
    }

    fn in_down_layer_filter(o: Orientation, p: Position, _: Color) -> bool {
        in_down_layer(o, p)
    }

    #[test]
    fn lookahead_predicts_down_turns() {
        for quarters in 0..4 {
            let puzzle = Puzzle::from_cube(scrambled(6), AnimationMode::Instant);
            let stickers = puzzle.find_all(|_, _, _| true);
            let predicted = stickers
                .iter()
                .map(|s| color_after_down(&puzzle, s.orientation, s.position, quarters))
                .collect::<Vec<_>>();
            turn_down_by(&puzzle, quarters).unwrap();
            for (sticker, color) in stickers.into_iter().zip(predicted) {
                assert_eq!(puzzle.color(sticker.orientation, sticker.position), color);
            }
        }
    }

    #[test]
    fn down_turns_take_the_short_way() {
        let puzzle = Puzzle::new(3);
        let counted = Counted::new(&puzzle);
        turn_down_by(&counted, 3).unwrap();
        assert_eq!(counted.quarter_turns(), 1);
        turn_down_by(&counted, 1).unwrap();
        assert!(puzzle.is_solved());
        turn_down_by(&counted, 4).unwrap();
        assert_eq!(counted.quarter_turns(), 2);
        assert_eq!(
            (0..4).map(quarter_cost).collect::<Vec<_>>(),
            [0, 1, 2, 1]
        );
    }
}
