//! Batch analyzer: many independent runs reduced to scenario statistics.

use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_RUNS, MIN_BATCH_RUNS};
use crate::rules::ProgressionTable;
use crate::seed::run_rng;
use crate::sim::{RunResult, SimConfigError, SimParams, SimulationError, simulate};
use crate::stats::{Distribution, StatsError, mean_u32, ratio};

/// How many runs to play and how to seed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub runs: usize,
    /// Batch seed; run `i` draws from a stream derived from `(seed, i)`.
    pub seed: u64,
    /// Spread runs across the rayon thread pool.
    pub parallel: bool,
}

impl BatchConfig {
    #[must_use]
    pub const fn new(runs: usize, seed: u64) -> Self {
        Self {
            runs,
            seed,
            parallel: true,
        }
    }

    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RUNS, 0)
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("a batch needs at least {min} runs to estimate spread, got {runs}")]
    TooFewRuns { runs: usize, min: usize },
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error("run {run} failed")]
    Simulation {
        run: usize,
        #[source]
        source: SimulationError,
    },
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Aggregate statistics for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStats {
    pub name: String,
    pub runs: usize,
    pub activity_mean: f64,
    pub activity_median: f64,
    pub activity_stdev: f64,
    pub activity_min: u64,
    pub activity_max: u64,
    pub activity_p25: f64,
    pub activity_p75: f64,
    pub bonus_mean: f64,
    pub bonus_median: f64,
    /// Total bonus drops over total activities.
    pub bonus_rate: f64,
    pub mean_final_account_power: f64,
}

/// Play every run of a batch, returning results in run order.
///
/// # Errors
///
/// Fails before simulating on too few runs or invalid parameters, and fails
/// the whole batch when any run does not converge.
pub fn run_batch(
    config: &BatchConfig,
    params: &SimParams,
    table: &ProgressionTable,
) -> Result<Vec<RunResult>, AnalysisError> {
    if config.runs < MIN_BATCH_RUNS {
        return Err(AnalysisError::TooFewRuns {
            runs: config.runs,
            min: MIN_BATCH_RUNS,
        });
    }
    params.validate()?;

    debug!(
        "simulating {} runs (seed {}, parallel {}) from {} to {}",
        config.runs, config.seed, config.parallel, params.starting_power, params.target_power
    );

    let play = |run: usize| play_run(config.seed, run, params, table);
    if config.parallel {
        (0..config.runs).into_par_iter().map(play).collect()
    } else {
        (0..config.runs).map(play).collect()
    }
}

fn play_run(
    batch_seed: u64,
    run: usize,
    params: &SimParams,
    table: &ProgressionTable,
) -> Result<RunResult, AnalysisError> {
    let mut rng = run_rng(batch_seed, u64::try_from(run).unwrap_or(u64::MAX));
    let result =
        simulate(params, table, &mut rng).map_err(|source| AnalysisError::Simulation {
            run,
            source,
        })?;
    trace!(
        "run {run}: {} activities, {} bonus drops, {} draws",
        result.activity_count,
        result.bonus_count,
        rng.draws()
    );
    Ok(result)
}

/// Reduce run results into scenario statistics.
///
/// # Errors
///
/// Returns [`AnalysisError::Stats`] for fewer than two results.
pub fn summarize(name: &str, results: &[RunResult]) -> Result<ScenarioStats, AnalysisError> {
    let activities = Distribution::from_samples(
        results.iter().map(|result| result.activity_count).collect(),
    )?;
    let bonuses =
        Distribution::from_samples(results.iter().map(|result| result.bonus_count).collect())?;
    let final_powers: Vec<u32> = results
        .iter()
        .map(RunResult::final_account_power)
        .collect();

    Ok(ScenarioStats {
        name: name.to_string(),
        runs: activities.count,
        activity_mean: activities.mean,
        activity_median: activities.median,
        activity_stdev: activities.std_dev,
        activity_min: activities.min,
        activity_max: activities.max,
        activity_p25: activities.p25,
        activity_p75: activities.p75,
        bonus_mean: bonuses.mean,
        bonus_median: bonuses.median,
        bonus_rate: ratio(bonuses.total, activities.total),
        mean_final_account_power: mean_u32(&final_powers),
    })
}

/// Run a batch and summarize it.
///
/// # Errors
///
/// See [`run_batch`] and [`summarize`].
pub fn analyze(
    name: &str,
    config: &BatchConfig,
    params: &SimParams,
    table: &ProgressionTable,
) -> Result<ScenarioStats, AnalysisError> {
    let results = run_batch(config, params, table)?;
    let stats = summarize(name, &results)?;
    debug!(
        "{name}: mean {:.1} activities, bonus rate {:.4}",
        stats.activity_mean, stats.bonus_rate
    );
    Ok(stats)
}
