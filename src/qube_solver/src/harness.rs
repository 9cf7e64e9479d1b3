//! Solves many independent puzzles at once on a bounded pool of workers.

use std::{
    thread,
    time::{Duration, Instant},
};

use crossbeam::{channel, sync::WaitGroup};
use log::{debug, error, info, warn};
use qube_core::{AnimationMode, Cube, Puzzle, TwistyCube};
use thiserror::Error;

use crate::{
    config::{SolverConfig, StressConfig},
    solver::{LayerSolver, SolveReport, SolverError},
    start, success,
};

#[derive(Error, Debug)]
pub enum StressError {
    #[error("failed to spawn a stress worker")]
    Spawn(#[from] std::io::Error),
    #[error("a stress worker panicked")]
    WorkerPanicked,
}

#[derive(Debug)]
pub struct PuzzleOutcome {
    pub index: usize,
    pub scramble_turns: usize,
    pub elapsed: Duration,
    pub result: Result<SolveReport, SolverError>,
    pub solved: bool,
}

#[derive(Debug, Default)]
pub struct StressReport {
    /// Ordered by puzzle index.
    pub outcomes: Vec<PuzzleOutcome>,
    pub elapsed: Duration,
}

impl StressReport {
    #[must_use]
    pub fn solved(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.solved).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn all_solved(&self) -> bool {
        self.solved() == self.total()
    }
}

struct Job {
    index: usize,
    scramble_turns: usize,
    puzzle: Puzzle,
    // Dropped once the outcome is queued, counting the batch down
    pending: WaitGroup,
}

/// Scrambles `config.count` fresh puzzles and solves them on at most
/// `config.workers` threads, returning once every solve has finished,
/// successfully or not.
pub fn run_stress(
    config: &StressConfig,
    solver: &SolverConfig,
) -> Result<StressReport, StressError> {
    let started = Instant::now();
    let mut rng = config.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    info!(
        target: "stress",
        start!("Solving {} cubes on {} workers"),
        config.count,
        config.workers
    );

    let (jobs, job_queue) = channel::unbounded::<Job>();
    let (outcomes, outcome_queue) = channel::unbounded::<PuzzleOutcome>();
    let pending = WaitGroup::new();

    let total = config.count;
    let workers = config.workers.clamp(1, total.max(1));
    let handles = (0..workers)
        .map(|id| {
            let job_queue = job_queue.clone();
            let outcomes = outcomes.clone();
            let solver = solver.clone();
            thread::Builder::new()
                .name(format!("stress-{id}"))
                .spawn(move || {
                    for job in job_queue {
                        let outcome = solve_one(&job, &solver, total);
                        let sent = outcomes.send(outcome);
                        drop(job.pending);
                        if sent.is_err() {
                            break;
                        }
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    drop(job_queue);
    drop(outcomes);

    for index in 0..config.count {
        let mut cube = Cube::new(config.dimension);
        let scramble_turns =
            cube.scramble(&mut rng, config.scramble_min, config.scramble_max);
        // Every worker has hung up only if they all died
        jobs.send(Job {
            index,
            scramble_turns,
            puzzle: Puzzle::from_cube(cube, AnimationMode::Instant),
            pending: pending.clone(),
        })
        .map_err(|_| StressError::WorkerPanicked)?;
    }
    drop(jobs);

    pending.wait();
    debug!(target: "stress", "Every job has reported back");

    let mut panicked = false;
    for handle in handles {
        panicked |= handle.join().is_err();
    }
    if panicked {
        return Err(StressError::WorkerPanicked);
    }

    let mut outcomes = outcome_queue.try_iter().collect::<Vec<_>>();
    outcomes.sort_by_key(|outcome| outcome.index);
    let report = StressReport {
        outcomes,
        elapsed: started.elapsed(),
    };

    info!(
        target: "stress",
        "Cubes solved: ({}/{}).",
        report.solved(),
        report.total()
    );
    if report.all_solved() {
        info!(target: "stress", success!("All cubes solved!"));
    } else {
        warn!(
            target: "stress",
            "{} of {} cubes were left unsolved",
            report.total() - report.solved(),
            report.total()
        );
    }
    Ok(report)
}

fn solve_one(job: &Job, solver: &SolverConfig, total: usize) -> PuzzleOutcome {
    let started = Instant::now();
    let result = LayerSolver::new(&job.puzzle)
        .with_config(solver.clone())
        .solve();
    let elapsed = started.elapsed();
    let solved = job.puzzle.is_solved();

    match &result {
        Ok(_) if solved => info!(
            target: "stress",
            "Solved cube ({}/{}) in {:.6} seconds.",
            job.index + 1,
            total,
            elapsed.as_secs_f64()
        ),
        Ok(_) => warn!(
            target: "stress",
            "Cube {} finished every stage but is not solved",
            job.index + 1
        ),
        Err(e) => error!(target: "stress", "Cube {} failed: {e}", job.index + 1),
    }

    PuzzleOutcome {
        index: job.index,
        scramble_turns: job.scramble_turns,
        elapsed,
        result,
        solved,
    }
}
