//! Batch results.

use crate::sa::{RunResult, TrajectoryPoint};
use crate::tour::Tour;
use std::time::Duration;

/// Reference costs computed once per batch, for reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Baseline {
    /// Cost of one uniformly random tour.
    pub random_cost: f64,
    /// The nearest-neighbor tour.
    pub nearest_neighbor: Tour,
    pub nearest_neighbor_cost: f64,
}

/// Outcome of a batch of annealing runs.
#[derive(Debug, Clone)]
pub struct MultiRunResult {
    /// The winning tour.
    pub best: Tour,

    /// Its cost.
    pub best_cost: f64,

    /// Trajectory of the winning run; empty when disabled or when no run
    /// completed.
    pub trajectory: Vec<TrajectoryPoint>,

    /// Index of the winning run. `None` means no run completed and
    /// `best` is the nearest-neighbor tour.
    pub winner: Option<usize>,

    /// Every run, in run-index order, cancelled ones included.
    pub runs: Vec<RunResult>,

    pub baseline: Baseline,

    /// Wall-clock time of the whole batch.
    pub elapsed: Duration,
}

impl MultiRunResult {
    /// Number of runs that finished without being cancelled.
    pub fn completed(&self) -> usize {
        self.runs.iter().filter(|r| !r.cancelled).count()
    }

    /// Relative improvement of the winner over the nearest-neighbor tour.
    pub fn improvement_over_baseline(&self) -> f64 {
        let nn = self.baseline.nearest_neighbor_cost;
        if nn > 0.0 {
            (nn - self.best_cost) / nn
        } else {
            0.0
        }
    }

    /// The winning run, if any run completed.
    pub fn winning_run(&self) -> Option<&RunResult> {
        self.winner.map(|i| &self.runs[i])
    }
}
