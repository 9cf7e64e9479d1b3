#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod harness;
pub mod remap;
pub mod shapes;
pub mod solver;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

pub use config::{QubeConfig, SolverConfig, StressConfig};
pub use harness::{PuzzleOutcome, StressError, StressReport, run_stress};
pub use remap::Remapped;
pub use solver::{LayerSolver, SolveReport, SolverError, Stage, StageReport};
