use serde::{Deserialize, Serialize};

/// Tuning for [`crate::LayerSolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// How many times any one loop of a stage may run before the solver
    /// gives up on the cube.
    pub stage_iteration_limit: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            stage_iteration_limit: 64,
        }
    }
}

/// Tuning for [`crate::run_stress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub count: usize,
    pub workers: usize,
    pub dimension: usize,
    pub scramble_min: usize,
    pub scramble_max: usize,
    /// Seeds the scrambles; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            count: 50,
            workers: 16,
            dimension: 3,
            scramble_min: 20,
            scramble_max: 60,
            seed: None,
        }
    }
}

/// The configuration file read by the `qube` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QubeConfig {
    pub solver: SolverConfig,
    pub stress: StressConfig,
}
