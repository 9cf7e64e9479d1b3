use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use log::info;
use qube_core::{
    AnimationMode, Cube, Orientation, Puzzle, Rotation, TurnRequest, TwistyCube, parse_moves,
};
use qube_solver::{LayerSolver, Remapped, SolverConfig, Stage};

fn apply_moves<C: TwistyCube + ?Sized>(cube: &C, moves: &str) {
    for mv in parse_moves(moves).unwrap() {
        cube.turn(mv.request()).unwrap();
    }
}

#[test_log::test]
fn test_short_scramble() {
    // Search order is random, so give the solver several goes at the same cube
    for _ in 0..20 {
        let puzzle = Puzzle::new(3);
        apply_moves(&puzzle, "F R U' R'");
        let report = LayerSolver::new(&puzzle).solve().unwrap();
        assert!(puzzle.is_solved());
        assert!(report.quarter_turns() < 200, "{}", report.quarter_turns());
        assert!(report.stages.iter().all(|stage| stage.iterations <= 64));
    }
}

#[test_log::test]
fn test_random_scrambles() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for i in 0..200 {
        let mut cube = Cube::new(3);
        cube.scramble(&mut rng, 20, 60);
        let puzzle = Puzzle::from_cube(cube, AnimationMode::Instant);

        let report = LayerSolver::new(&puzzle).solve().unwrap();
        assert!(puzzle.is_solved(), "scramble {i}");
        assert_eq!(report.stages.len(), Stage::ALL.len());
    }
}

#[test_log::test]
fn test_slice_scrambles_are_solved() {
    let puzzle = Puzzle::new(3);
    for orientation in [Orientation::Right, Orientation::Up, Orientation::Front] {
        puzzle
            .turn(TurnRequest::new(orientation, Rotation::Clockwise).with_slice(1))
            .unwrap()
            .wait()
            .unwrap();
    }
    apply_moves(&puzzle, "L' D2 B");
    LayerSolver::new(&puzzle).solve().unwrap();
    assert!(puzzle.is_solved());
}

#[test_log::test]
fn test_solve_through_a_remapped_view() {
    let puzzle = Puzzle::new(3);
    apply_moves(&puzzle, "R U2 F' L D B'");
    let view = Remapped::rebase(&puzzle, Orientation::Front, Orientation::Up);
    LayerSolver::new(&view).solve().unwrap();
    assert!(puzzle.is_solved());
}

#[test_log::test]
fn test_solve_through_every_rebase() {
    for from in Orientation::ALL {
        for to in Orientation::ALL {
            let puzzle = Puzzle::new(3);
            apply_moves(&puzzle, "R U2 F' L D B' R2 U'");
            let view = Remapped::rebase(&puzzle, from, to);
            let report = LayerSolver::new(&view).solve().unwrap();
            assert!(view.is_solved(), "{from} -> {to}");
            assert!(puzzle.is_solved(), "{from} -> {to}");
            assert_eq!(report.stages.len(), Stage::ALL.len());
        }
    }
}

#[test_log::test]
fn test_animated_solve() {
    let mut cube = Cube::new(3);
    cube.scramble(&mut fastrand::Rng::with_seed(3), 20, 30);
    let puzzle = Arc::new(Puzzle::from_cube(cube, AnimationMode::Animated));
    let done = Arc::new(AtomicBool::new(false));

    let driver = {
        let puzzle = Arc::clone(&puzzle);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut frames = 0_usize;
            while !done.load(Ordering::Acquire) {
                if puzzle.advance_animation(30.0) {
                    frames += 1;
                }
                thread::sleep(Duration::from_micros(50));
            }
            frames
        })
    };

    let report = LayerSolver::new(&*puzzle).solve().unwrap();
    done.store(true, Ordering::Release);
    let completed = driver.join().unwrap();

    assert!(puzzle.is_solved());
    assert!(!puzzle.is_animating());
    assert_eq!(completed, report.quarter_turns());
    info!("Animated {completed} quarter turns");
}

#[test_log::test]
fn test_config_limit_is_honored() {
    let puzzle = Puzzle::new(3);
    apply_moves(&puzzle, "F R U' R' B2 L D'");
    let result = LayerSolver::new(&puzzle)
        .with_config(SolverConfig {
            stage_iteration_limit: 1,
        })
        .solve();
    assert!(result.is_err());
}
