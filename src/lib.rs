//! Calibration of the Horton infiltration model with a genetic algorithm.
//!
//! Given an observed cumulative-infiltration series, the search looks for the
//! initial rate `fo`, asymptotic rate `fc` and decay constant `k` whose curve
//! `F(t) = fc·t + ((fo − fc) / k)·(1 − e^(−k·t))` best reproduces it in the
//! least-squares sense. The search is run several times from independent seeds
//! and every run's champion is reported.
//!
//! # Example
//! ```rust
//! use horton_fit::config::GaConfig;
//! use horton_fit::data::ObservedSeries;
//! use horton_fit::search::FittingSession;
//!
//! let series = ObservedSeries::new(
//!     vec![0.0, 5.0, 10.0, 15.0, 20.0],
//!     vec![0.0, 14.2, 22.9, 29.1, 34.0],
//! )
//! .unwrap();
//! let config = GaConfig {
//!     population_size: 20,
//!     num_generations: 10,
//!     ..GaConfig::default()
//! };
//! let mut session = FittingSession::with_seed(&config, &series, 42).unwrap();
//! let results = session.run_search(3).unwrap();
//! assert_eq!(results.len(), 3);
//! ```

pub mod config;
pub mod data;
pub mod evaluation;
pub mod evolution;
pub mod export;
pub mod search;
