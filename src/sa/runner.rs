//! SA execution loop.

use super::config::{NeighborMove, SaConfig, SeedTour};
use super::types::{AnnealingState, Move, RunResult, TrajectoryPoint};
use crate::error::{ensure_cities, Result};
use crate::geo::DistanceMatrix;
use crate::nearest::nearest_neighbor;
use crate::random::{create_rng, distinct_pair, fresh_seed};
use crate::tour::Tour;
use log::debug;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Metropolis acceptance criterion.
///
/// Moves that do not increase the cost are always accepted. A worsening
/// move is accepted when `draw < exp(-(candidate - current) / T)`, where
/// `draw` is uniform in `[0, 1)` from the caller's own generator.
pub fn metropolis_accept(current_cost: f64, candidate_cost: f64, temperature: f64, draw: f64) -> bool {
    let delta = candidate_cost - current_cost;
    if delta <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    draw < (-delta / temperature).exp()
}

/// Executes single annealing runs.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from the tour selected by `config.seed_tour`.
    pub fn run(matrix: &DistanceMatrix, config: &SaConfig) -> Result<RunResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs SA with an optional cancellation token.
    ///
    /// The flag is checked before every iteration; once set, the run stops
    /// and returns its best tour with `cancelled = true`.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult> {
        config.validate()?;
        ensure_cities(matrix.len())?;

        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut rng = create_rng(seed);
        let initial = match config.seed_tour {
            SeedTour::Random => Tour::random(matrix.len(), &mut rng),
            SeedTour::NearestNeighbor { start } => nearest_neighbor(matrix, start)?.0,
        };

        Ok(anneal(matrix, initial, config, seed, &mut rng, cancel.as_deref()))
    }

    /// Runs SA from an externally supplied tour, ignoring `config.seed_tour`.
    pub fn run_from(matrix: &DistanceMatrix, tour: Tour, config: &SaConfig) -> Result<RunResult> {
        Self::run_from_with_cancel(matrix, tour, config, None)
    }

    pub fn run_from_with_cancel(
        matrix: &DistanceMatrix,
        tour: Tour,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult> {
        config.validate()?;
        ensure_cities(matrix.len())?;
        tour.ensure_len(matrix.len())?;

        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut rng = create_rng(seed);
        Ok(anneal(matrix, tour, config, seed, &mut rng, cancel.as_deref()))
    }
}

/// The annealing loop proper. Inputs are already validated.
fn anneal<R: Rng>(
    matrix: &DistanceMatrix,
    initial: Tour,
    config: &SaConfig,
    seed: u64,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> RunResult {
    let n = matrix.len();
    let lo = usize::from(config.fix_start);

    let mut state = AnnealingState::new(initial, matrix, config.initial_temperature);
    let initial_cost = state.current_cost;
    debug!("sa start: seed={seed} cities={n} initial_cost={initial_cost:.3}");

    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut cancelled = false;

    let every = config.trajectory_interval;
    let mut trajectory = Vec::new();
    if every > 0 {
        trajectory.push(sample(&state));
    }

    while state.temperature > config.min_temperature {
        if config.max_iterations > 0 && state.iteration >= config.max_iterations {
            break;
        }
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        if let Some(mv) = propose(config.neighbor, lo, n, rng) {
            let delta = mv.apply_scored(state.current.as_mut_slice(), matrix);
            let candidate_cost = state.current_cost + delta;

            if metropolis_accept(state.current_cost, candidate_cost, state.temperature, rng.random()) {
                state.current_cost = candidate_cost;
                accepted_moves += 1;
                if delta < 0.0 {
                    improving_moves += 1;
                }
                state.record_if_best(matrix);
            } else {
                mv.apply(state.current.as_mut_slice());
            }
        }

        state.iteration += 1;
        state.temperature = config.cooling.next(state.temperature);

        if every > 0 && state.iteration % every == 0 {
            trajectory.push(sample(&state));
        }
    }

    if every > 0 && trajectory.last().is_none_or(|p| p.iteration != state.iteration) {
        trajectory.push(sample(&state));
    }

    debug!(
        "sa done: seed={seed} iterations={} best_cost={:.3} final_t={:.3e} cancelled={cancelled}",
        state.iteration, state.best_cost, state.temperature
    );

    RunResult {
        best: state.best,
        best_cost: state.best_cost,
        initial_cost,
        seed,
        iterations: state.iteration,
        final_temperature: state.temperature,
        accepted_moves,
        improving_moves,
        cancelled,
        trajectory,
    }
}

/// Draws a random move over positions `lo..n`.
///
/// `None` when fewer than two positions are free, in which case every
/// tour is the same cycle.
fn propose<R: Rng>(neighbor: NeighborMove, lo: usize, n: usize, rng: &mut R) -> Option<Move> {
    let (i, j) = distinct_pair(lo, n, rng)?;
    let reverse = match neighbor {
        NeighborMove::Swap => false,
        NeighborMove::Reverse => true,
        NeighborMove::Mixed {
            reverse_probability,
        } => rng.random_bool(reverse_probability),
    };
    Some(if reverse {
        Move::Reverse(i, j)
    } else {
        Move::Swap(i, j)
    })
}

fn sample(state: &AnnealingState) -> TrajectoryPoint {
    TrajectoryPoint {
        iteration: state.iteration,
        temperature: state.temperature,
        best_cost: state.best_cost,
    }
}
