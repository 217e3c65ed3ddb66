//! Concurrent execution of annealing runs.

use super::config::MultiRunConfig;
use super::types::{Baseline, MultiRunResult};
use crate::error::{ensure_cities, Error, Result};
use crate::geo::{Coordinate, DistanceMatrix};
use crate::nearest::nearest_neighbor;
use crate::random::{create_rng, derive_seed, fresh_seed};
use crate::sa::{RunResult, SaRunner, SeedTour};
use crate::tour::Tour;
use log::{info, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Index of the completed run with the lowest best cost.
///
/// Cancelled runs are skipped; on exact ties the lowest index wins. A NaN
/// cost loses to any number. Returns `None` when no run completed.
pub fn select_best(results: &[RunResult]) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (i, run) in results.iter().enumerate() {
        if run.cancelled {
            continue;
        }
        let replace = match winner {
            None => true,
            Some(w) => beats(run.best_cost, results[w].best_cost),
        };
        if replace {
            winner = Some(i);
        }
    }
    winner
}

fn beats(cost: f64, incumbent: f64) -> bool {
    cost < incumbent || (incumbent.is_nan() && !cost.is_nan())
}

/// Runs batches of independent annealing runs and reduces them to one tour.
pub struct MultiRunner;

impl MultiRunner {
    /// Builds the distance matrix for `coords`, then runs the batch.
    pub fn solve(coords: &[Coordinate], config: &MultiRunConfig) -> Result<MultiRunResult> {
        ensure_cities(coords.len())?;
        if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
            return Err(Error::InvalidCoordinate { index });
        }
        config.validate()?;
        let matrix = DistanceMatrix::from_coordinates(coords);
        Self::run(&matrix, config)
    }

    /// Runs the batch to completion or until `config.time_limit` expires.
    pub fn run(matrix: &DistanceMatrix, config: &MultiRunConfig) -> Result<MultiRunResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs the batch with an external cancellation token.
    ///
    /// Setting the flag stops every run at its next iteration. All runs
    /// share the one flag, so a time limit trips it for the whole batch.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &MultiRunConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MultiRunResult> {
        config.validate()?;
        let n = matrix.len();
        ensure_cities(n)?;

        let started = Instant::now();
        let base_seed = config.anneal.seed.unwrap_or_else(fresh_seed);

        let start = match config.anneal.seed_tour {
            SeedTour::NearestNeighbor { start } => start,
            SeedTour::Random => 0,
        };
        let (nn_tour, nn_cost) = nearest_neighbor(matrix, start)?;
        let mut baseline_rng = create_rng(derive_seed(base_seed, config.runs));
        let baseline = Baseline {
            random_cost: Tour::random(n, &mut baseline_rng).cost(matrix),
            nearest_neighbor: nn_tour,
            nearest_neighbor_cost: nn_cost,
        };

        let cancel = cancel.unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
        let watchdog = config
            .time_limit
            .map(|limit| Watchdog::spawn(limit, Arc::clone(&cancel)));

        let job = |index: usize| -> Result<RunResult> {
            let anneal = config
                .anneal
                .clone()
                .with_seed(derive_seed(base_seed, index));
            SaRunner::run_with_cancel(matrix, &anneal, Some(Arc::clone(&cancel)))
        };

        let runs = if !config.parallel {
            (0..config.runs).map(&job).collect::<Result<Vec<_>>>()
        } else if let Some(threads) = config.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            pool.install(|| {
                (0..config.runs)
                    .into_par_iter()
                    .map(&job)
                    .collect::<Result<Vec<_>>>()
            })
        } else {
            (0..config.runs)
                .into_par_iter()
                .map(&job)
                .collect::<Result<Vec<_>>>()
        };

        if let Some(watchdog) = watchdog {
            watchdog.finish();
        }
        let runs = runs?;

        let cancelled = runs.iter().filter(|r| r.cancelled).count();
        if cancelled > 0 {
            warn!("multirun: {cancelled}/{} runs cancelled", runs.len());
        }

        let winner = select_best(&runs);
        let (best, best_cost, trajectory) = match winner {
            Some(w) => (runs[w].best.clone(), runs[w].best_cost, runs[w].trajectory.clone()),
            None => {
                warn!("multirun: no run completed, falling back to nearest-neighbor tour");
                (baseline.nearest_neighbor.clone(), baseline.nearest_neighbor_cost, Vec::new())
            }
        };

        let elapsed = started.elapsed();
        info!(
            "multirun: cities={n} runs={} winner={winner:?} best_cost={best_cost:.3} \
             nn_cost={:.3} random_cost={:.3} elapsed={elapsed:?}",
            runs.len(),
            baseline.nearest_neighbor_cost,
            baseline.random_cost
        );

        Ok(MultiRunResult {
            best,
            best_cost,
            trajectory,
            winner,
            runs,
            baseline,
            elapsed,
        })
    }
}

/// Trips a cancellation flag once a time limit passes, unless finished
/// first.
struct Watchdog {
    done: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Watchdog {
    fn spawn(limit: Duration, flag: Arc<AtomicBool>) -> Self {
        let (done, rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(limit) {
                flag.store(true, Ordering::Relaxed);
            }
        });
        Self { done, handle }
    }

    fn finish(self) {
        // The receiver is gone if the limit already expired.
        let _ = self.done.send(());
        if self.handle.join().is_err() {
            warn!("multirun: time-limit watchdog panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::{CoolingSchedule, SaConfig};

    fn scattered(n: usize) -> DistanceMatrix {
        let coords: Vec<Coordinate> = (0..n)
            .map(|k| Coordinate::new((k as f64 * 13.7) % 40.0, (k as f64 * 23.1) % 80.0 - 40.0))
            .collect();
        DistanceMatrix::from_coordinates(&coords)
    }

    fn anneal() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(100.0)
            .with_max_iterations(20_000)
            .with_seed(11)
    }

    fn fake_run(cost: f64, cancelled: bool) -> RunResult {
        RunResult {
            best: Tour::identity(3),
            best_cost: cost,
            initial_cost: cost,
            seed: 0,
            iterations: 0,
            final_temperature: 1.0,
            accepted_moves: 0,
            improving_moves: 0,
            cancelled,
            trajectory: Vec::new(),
        }
    }

    #[test]
    fn test_select_best() {
        let runs = vec![fake_run(5.0, false), fake_run(3.0, false), fake_run(4.0, false)];
        assert_eq!(select_best(&runs), Some(1));
    }

    #[test]
    fn test_select_best_ties_lowest_index() {
        let runs = vec![fake_run(5.0, false), fake_run(3.0, false), fake_run(3.0, false)];
        assert_eq!(select_best(&runs), Some(1));
    }

    #[test]
    fn test_select_best_ignores_nan() {
        let runs = vec![
            fake_run(f64::NAN, false),
            fake_run(4.0, false),
            fake_run(f64::NAN, false),
            fake_run(4.0, false),
        ];
        assert_eq!(select_best(&runs), Some(1));
        let all_nan = vec![fake_run(f64::NAN, false), fake_run(f64::NAN, false)];
        assert_eq!(select_best(&all_nan), Some(0));
    }

    #[test]
    fn test_solve_rejects_non_finite_coordinates() {
        let coords = vec![
            Coordinate::new(1.0, 2.0),
            Coordinate::from_lon_lat(f64::NAN, 1.0),
            Coordinate::new(3.0, 4.0),
            Coordinate::new(5.0, f64::INFINITY),
        ];
        let config = MultiRunConfig::default().with_runs(3).with_anneal(anneal());
        let err = MultiRunner::solve(&coords, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { index: 1 }));
        assert!(err.is_config());
    }

    #[test]
    fn test_select_best_skips_cancelled() {
        let runs = vec![fake_run(1.0, true), fake_run(3.0, false)];
        assert_eq!(select_best(&runs), Some(1));
        assert_eq!(select_best(&[fake_run(1.0, true)]), None);
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_single_run_matches_direct() {
        let m = scattered(30);
        let config = MultiRunConfig::default()
            .with_runs(1)
            .with_anneal(anneal().with_trajectory_interval(10));
        let batch = MultiRunner::run(&m, &config).unwrap();
        let direct = SaRunner::run(&m, &config.anneal).unwrap();
        assert_eq!(batch.winner, Some(0));
        assert_eq!(batch.best, direct.best);
        assert_eq!(batch.best_cost, direct.best_cost);
        assert_eq!(batch.trajectory, direct.trajectory);
        assert_eq!(batch.runs[0], direct);
    }

    #[test]
    fn test_returns_minimum_of_runs() {
        let m = scattered(40);
        let config = MultiRunConfig::default().with_runs(6).with_anneal(anneal());
        let batch = MultiRunner::run(&m, &config).unwrap();
        assert_eq!(batch.runs.len(), 6);
        assert_eq!(batch.completed(), 6);
        let min = batch
            .runs
            .iter()
            .map(|r| r.best_cost)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(batch.best_cost, min);
        let w = batch.winner.unwrap();
        assert!(batch.runs[..w].iter().all(|r| r.best_cost > min));
        assert_eq!(batch.best_cost, batch.best.cost(&m));
    }

    #[test]
    fn test_runs_use_distinct_seeds() {
        let m = scattered(20);
        let config = MultiRunConfig::default().with_runs(4).with_anneal(anneal());
        let batch = MultiRunner::run(&m, &config).unwrap();
        let mut seeds: Vec<u64> = batch.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds[0], 11);
        seeds.dedup();
        assert_eq!(seeds.len(), 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let m = scattered(25);
        let config = MultiRunConfig::default().with_runs(4).with_anneal(anneal());
        let par = MultiRunner::run(&m, &config).unwrap();
        let seq = MultiRunner::run(&m, &config.clone().with_parallel(false)).unwrap();
        let pooled = MultiRunner::run(&m, &config.with_threads(2)).unwrap();
        assert_eq!(par.runs, seq.runs);
        assert_eq!(par.runs, pooled.runs);
        assert_eq!(par.winner, seq.winner);
    }

    #[test]
    fn test_baseline() {
        let m = scattered(15);
        let config = MultiRunConfig::default().with_runs(2).with_anneal(anneal());
        let batch = MultiRunner::run(&m, &config).unwrap();
        let (nn, nn_cost) = nearest_neighbor(&m, 0).unwrap();
        assert_eq!(batch.baseline.nearest_neighbor, nn);
        assert_eq!(batch.baseline.nearest_neighbor_cost, nn_cost);
        assert!(batch.baseline.random_cost > 0.0);
        assert!(batch.improvement_over_baseline() > -1.0);
    }

    #[test]
    fn test_cancelled_batch_falls_back_to_nearest_neighbor() {
        let m = scattered(12);
        let cancel = Arc::new(AtomicBool::new(true));
        let config = MultiRunConfig::default().with_runs(3).with_anneal(anneal());
        let batch = MultiRunner::run_with_cancel(&m, &config, Some(cancel)).unwrap();
        assert_eq!(batch.winner, None);
        assert_eq!(batch.completed(), 0);
        assert_eq!(batch.best, batch.baseline.nearest_neighbor);
        assert_eq!(batch.best_cost, batch.baseline.nearest_neighbor_cost);
        assert!(batch.trajectory.is_empty());
        assert!(batch.winning_run().is_none());
    }

    #[test]
    fn test_time_limit_cancels_long_runs() {
        let m = scattered(12);
        // Would take billions of iterations to reach the floor.
        let endless = SaConfig::default()
            .with_initial_temperature(1e10)
            .with_cooling(CoolingSchedule::Geometric {
                alpha: 0.999_999_999,
            })
            .with_max_iterations(0)
            .with_seed(3);
        let config = MultiRunConfig::default()
            .with_runs(2)
            .with_anneal(endless)
            .with_time_limit(Duration::from_millis(50));
        let batch = MultiRunner::run(&m, &config).unwrap();
        assert_eq!(batch.completed(), 0);
        assert_eq!(batch.best_cost, batch.baseline.nearest_neighbor_cost);
    }

    #[test]
    fn test_time_limit_not_hit() {
        let m = scattered(12);
        let config = MultiRunConfig::default()
            .with_runs(2)
            .with_anneal(anneal())
            .with_time_limit(Duration::from_secs(60));
        let batch = MultiRunner::run(&m, &config).unwrap();
        assert_eq!(batch.completed(), 2);
        assert!(batch.winner.is_some());
    }

    #[test]
    fn test_config_errors() {
        let m = scattered(5);
        let zero = MultiRunConfig::default().with_runs(0).with_anneal(anneal());
        assert!(matches!(
            MultiRunner::run(&m, &zero),
            Err(Error::InvalidRunCount(0))
        ));

        let single = DistanceMatrix::from_coordinates(&[Coordinate::new(1.0, 1.0)]);
        let config = MultiRunConfig::default().with_runs(2).with_anneal(anneal());
        assert!(matches!(
            MultiRunner::run(&single, &config),
            Err(Error::TooFewCities { count: 1 })
        ));

        let bad_start = MultiRunConfig::default()
            .with_runs(2)
            .with_anneal(anneal().with_seed_tour(SeedTour::NearestNeighbor { start: 9 }));
        assert!(matches!(
            MultiRunner::run(&m, &bad_start),
            Err(Error::InvalidStartCity { start: 9, len: 5 })
        ));
    }

    #[test]
    fn test_solve_from_coordinates() {
        let coords: Vec<Coordinate> = (0..20)
            .map(|k| Coordinate::new((k as f64 * 7.1) % 30.0, (k as f64 * 11.9) % 60.0))
            .collect();
        let config = MultiRunConfig::default().with_runs(2).with_anneal(anneal());
        let batch = MultiRunner::solve(&coords, &config).unwrap();
        assert_eq!(batch.best.len(), 20);
        assert!(batch.best_cost <= batch.baseline.random_cost);
    }
}
