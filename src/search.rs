//! Multi-run driver.
//!
//! A single genetic-algorithm run can settle on a local optimum of the Horton
//! error surface, so the search is repeated and every run's champion is
//! returned. Picking among them is left to the caller.

use crate::config::{ConfigError, GaConfig};
use crate::data::{DataError, ObservedSeries};
use crate::evaluation::fitness::FitnessError;
use crate::evolution::candidate::Candidate;
use crate::evolution::operators::HortonOperators;
use crate::evolution::{EvolutionEngine, SearchEngine};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Configuration error: {0}")]
    Data(#[from] DataError),
    #[error("Domain computation error: {0}")]
    Fitness(#[from] FitnessError),
    #[error("Run {run} finished without an evaluated individual")]
    NoResult { run: usize },
}

impl SearchError {
    /// Returns `true` for malformed input: bad settings or an unusable series.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, SearchError::Config(_) | SearchError::Data(_))
    }

    /// Returns `true` when a parameter value made the model non-computable.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, SearchError::Fitness(_))
    }
}

/// Best individual of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Position of the run in the session, starting at 0
    pub run: usize,
    /// Seed of the run's random source; replays the run via `FittingSession::run_once`
    pub seed: u64,
    pub fitness: f64,
    pub candidate: Candidate,
}

/// Fits one observed series with repeated, independent searches.
pub struct FittingSession<'a> {
    config: &'a GaConfig,
    operators: HortonOperators<'a>,
    /// Master source; hands out one seed per run
    rng: StdRng,
}

impl<'a> FittingSession<'a> {
    /// Creates a session whose randomness is seeded from the OS.
    ///
    /// # Errors
    /// A `Config` error for invalid GA settings, a `Data` error if no bounds can
    /// be derived from `series`.
    pub fn new(config: &'a GaConfig, series: &'a ObservedSeries) -> Result<Self, SearchError> {
        Self::with_rng(config, series, StdRng::from_os_rng())
    }

    /// Creates a session with a fixed master seed, making every run reproducible.
    pub fn with_seed(
        config: &'a GaConfig,
        series: &'a ObservedSeries,
        seed: u64,
    ) -> Result<Self, SearchError> {
        Self::with_rng(config, series, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: &'a GaConfig,
        series: &'a ObservedSeries,
        rng: StdRng,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            operators: HortonOperators::new(series)?,
            rng,
        })
    }

    pub fn operators(&self) -> &HortonOperators<'a> {
        &self.operators
    }

    /// Runs the search engine once from `seed`.
    pub fn run_once(&self, run: usize, seed: u64) -> Result<RunResult, SearchError> {
        let mut engine =
            EvolutionEngine::new(self.config, &self.operators, StdRng::seed_from_u64(seed));
        let best = engine.run()?.ok_or(SearchError::NoResult { run })?;
        let fitness = best.fitness.ok_or(SearchError::NoResult { run })?;

        Ok(RunResult {
            run,
            seed,
            fitness,
            candidate: best.genome,
        })
    }

    /// Runs the search `count` times and returns each run's best, in run order.
    ///
    /// The first error aborts the session; no partial results are returned.
    pub fn run_search(&mut self, count: usize) -> Result<Vec<RunResult>, SearchError> {
        let mut results = Vec::with_capacity(count);
        for run in 0..count {
            let seed: u64 = self.rng.random();
            info!("--- Starting Run {}/{} (seed {}) ---", run + 1, count, seed);
            let result = self.run_once(run, seed)?;
            info!(
                "Run {}: Best Fitness={:.6} | {}",
                run + 1,
                result.fitness,
                result.candidate
            );
            results.push(result);
        }
        Ok(results)
    }
}
