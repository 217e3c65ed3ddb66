//! Moves, per-run state and results.

use crate::geo::DistanceMatrix;
use crate::tour::Tour;

/// A concrete perturbation of a visiting order, by position.
///
/// Both variants are involutions: applying a move twice restores the
/// original order, which is how rejected moves are undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Exchange positions `i` and `j`.
    Swap(usize, usize),
    /// Reverse positions `i..=j` (`i < j`).
    Reverse(usize, usize),
}

impl Move {
    /// Applies the move to `order`.
    pub fn apply(&self, order: &mut [usize]) {
        match *self {
            Move::Swap(i, j) => order.swap(i, j),
            Move::Reverse(i, j) => order[i..=j].reverse(),
        }
    }

    /// Applies the move and returns the resulting change in tour cost.
    ///
    /// Only the edges whose endpoints change are re-scored; interior edges
    /// of a reversed segment keep their length because the matrix is
    /// symmetric.
    pub fn apply_scored(&self, order: &mut [usize], matrix: &DistanceMatrix) -> f64 {
        let n = order.len();
        let prev = |k: usize| (k + n - 1) % n;

        let (mut edges, count) = match *self {
            Move::Swap(i, j) => ([prev(i), i, prev(j), j], 4),
            Move::Reverse(i, j) => ([prev(i), j, 0, 0], 2),
        };
        let edges = &mut edges[..count];
        edges.sort_unstable();
        let mut unique = 0;
        for k in 0..edges.len() {
            if k == 0 || edges[k] != edges[k - 1] {
                edges[unique] = edges[k];
                unique += 1;
            }
        }
        let edges = &edges[..unique];

        let score = |order: &[usize]| -> f64 {
            edges
                .iter()
                .map(|&k| matrix.get(order[k], order[(k + 1) % n]))
                .sum()
        };

        let before = score(&*order);
        self.apply(order);
        score(&*order) - before
    }
}

/// Mutable state owned by a single annealing run.
///
/// Invariant: `best_cost <= current_cost`.
#[derive(Debug, Clone)]
pub struct AnnealingState {
    /// Tour the search is currently at.
    pub current: Tour,
    pub current_cost: f64,
    /// Best tour seen so far.
    pub best: Tour,
    pub best_cost: f64,
    pub temperature: f64,
    /// Iterations performed so far.
    pub iteration: usize,
}

impl AnnealingState {
    /// Starts a run at `tour`: best = current, temperature = `t0`.
    pub fn new(tour: Tour, matrix: &DistanceMatrix, t0: f64) -> Self {
        let cost = tour.cost(matrix);
        Self {
            best: tour.clone(),
            best_cost: cost,
            current: tour,
            current_cost: cost,
            temperature: t0,
            iteration: 0,
        }
    }

    /// Promotes the current tour to best if it is strictly better.
    ///
    /// The best cost is recomputed from scratch so that it matches
    /// [`Tour::cost`] exactly, not the running sum of move deltas.
    pub(crate) fn record_if_best(&mut self, matrix: &DistanceMatrix) -> bool {
        if self.current_cost >= self.best_cost {
            return false;
        }
        let exact = self.current.cost(matrix);
        self.current_cost = exact;
        if exact < self.best_cost {
            self.best.clone_from(&self.current);
            self.best_cost = exact;
            true
        } else {
            false
        }
    }
}

/// One `(temperature, best cost so far)` sample.
///
/// Taken after `iteration` iterations have run, so `temperature` is the
/// already-cooled value the next iteration will use. The first sample has
/// `iteration == 0` and the initial temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryPoint {
    pub iteration: usize,
    pub temperature: f64,
    pub best_cost: f64,
}

/// Outcome of one annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// The best tour found.
    pub best: Tour,

    /// Cost of the best tour, as computed by [`Tour::cost`].
    pub best_cost: f64,

    /// Cost of the tour the run started from.
    pub initial_cost: f64,

    /// Seed of the run's generator.
    pub seed: u64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Whether the run was stopped by cancellation.
    pub cancelled: bool,

    /// Sampled `(temperature, best cost)` trajectory; empty when disabled.
    pub trajectory: Vec<TrajectoryPoint>,
}
