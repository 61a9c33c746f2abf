use crate::data::{self, DataError, LoadConfig, ObservedSeries};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("No observed data: set either `data.file_path` or both `data.time` and `data.observed`")]
    MissingData,
}

/// Top-level configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub ga: GaConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub export: Option<ExportConfig>,
}

/// Where the observed series comes from.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DataConfig {
    /// CSV file with a time column and a cumulative infiltration column
    pub file_path: Option<String>,
    /// Explicit CSV column names; auto-detected when absent
    pub time_column: Option<String>,
    pub value_column: Option<String>,
    /// Inline series, used when no file is given
    #[serde(default)]
    pub time: Vec<f64>,
    #[serde(default)]
    pub observed: Vec<f64>,
}

/// Parameters handed to the search engine for every run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GaConfig {
    pub population_size: usize,
    pub num_generations: usize,
    /// Probability that each child is mutated
    pub mutation_rate: f64,
    /// Probability that a parent pair is recombined
    pub crossover_rate: f64,
    /// Contestants per tournament; one tenth of the population when absent
    pub tournament_size: Option<usize>,
    /// Carry the best individual into the next generation unchanged
    pub elitism: bool,
    /// Lower fitness is better
    pub minimize: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            num_generations: 100,
            mutation_rate: 0.2,
            crossover_rate: 0.8,
            tournament_size: None,
            elitism: true,
            minimize: true,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Independent runs of the search engine
    pub runs: usize,
    /// Master seed; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            seed: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ExportConfig {
    pub output_path: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks every section; data problems surface later, when the series is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ga.validate()?;
        self.search.validate()?;
        if self.data.file_path.is_none()
            && (self.data.time.is_empty() || self.data.observed.is_empty())
        {
            return Err(ConfigError::MissingData);
        }
        Ok(())
    }
}

/// Smallest tournament the population-derived default falls back to.
pub const MIN_TOURNAMENT_SIZE: usize = 2;

impl GaConfig {
    /// Contestants drawn for each tournament.
    ///
    /// An explicit `tournament_size` wins; otherwise one tenth of the
    /// population, but never fewer than `MIN_TOURNAMENT_SIZE`.
    pub fn effective_tournament_size(&self) -> usize {
        self.tournament_size
            .unwrap_or((self.population_size / 10).max(MIN_TOURNAMENT_SIZE))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ga.population_size",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.num_generations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ga.num_generations",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.tournament_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "ga.tournament_size",
                reason: "must be greater than 0".to_string(),
            });
        }
        for (field, rate) in [
            ("ga.mutation_rate", self.mutation_rate),
            ("ga.crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{} is not a probability in [0, 1]", rate),
                });
            }
        }
        Ok(())
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.runs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl DataConfig {
    /// Builds the observed series, from the CSV file if one is configured.
    pub fn load_series(&self) -> Result<ObservedSeries, DataError> {
        match &self.file_path {
            Some(path) => {
                let load_config = LoadConfig {
                    time_column: self.time_column.clone(),
                    value_column: self.value_column.clone(),
                };
                data::load_csv_with_config(Path::new(path), &load_config)
            }
            None => ObservedSeries::new(self.time.clone(), self.observed.clone()),
        }
    }
}
