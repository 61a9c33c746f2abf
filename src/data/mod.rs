use log::warn;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Smallest series the bounds policy can derive an `fo` range from.
pub const MIN_OBSERVATIONS: usize = 2;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read or parse CSV file: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file is missing required columns: '{0}'")]
    MissingColumns(String),
    #[error("Insufficient data: {points} observation(s), at least {required} required")]
    InsufficientData { points: usize, required: usize },
    #[error("Time column has {time} entries but there are {observed} observations")]
    LengthMismatch { time: usize, observed: usize },
    #[error("Time must be non-decreasing: row {row} has {current} after {previous}")]
    NonMonotonicTime {
        row: usize,
        previous: f64,
        current: f64,
    },
    #[error("Non-finite {column} value at row {row}: {value}")]
    NonFiniteValue {
        column: &'static str,
        row: usize,
        value: f64,
    },
    #[error("Found {count} null values in the time or observation columns")]
    NullDataError { count: usize },
    #[error("Largest observation ({upper}) is below the rate floor of {floor}, no valid fo range")]
    DegenerateRateBounds { upper: f64, floor: f64 },
}

/// Raw column pair, used when a series is read back from disk so that it goes
/// through the same validation as a freshly built one.
#[derive(Deserialize)]
struct SeriesColumns {
    time: Vec<f64>,
    observed: Vec<f64>,
}

impl TryFrom<SeriesColumns> for ObservedSeries {
    type Error = DataError;

    fn try_from(columns: SeriesColumns) -> Result<Self, Self::Error> {
        ObservedSeries::new(columns.time, columns.observed)
    }
}

/// An observed cumulative-infiltration record: `(time, value)` pairs in time order.
///
/// Values are expected to be non-negative and non-decreasing but this is not
/// enforced; field data often is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesColumns")]
pub struct ObservedSeries {
    time: Vec<f64>,
    observed: Vec<f64>,
}

impl ObservedSeries {
    /// Builds a validated series from a time column and an observation column.
    ///
    /// # Arguments
    /// * `time` - Elapsed time of each reading, non-decreasing
    /// * `observed` - Cumulative infiltration at each reading
    ///
    /// # Returns
    /// * `Result<Self, DataError>` - The series, or the first validation failure
    ///
    /// # Errors
    /// - fewer than [`MIN_OBSERVATIONS`] observations
    /// - fewer time entries than observations
    /// - a NaN or infinite value in either column
    /// - time going backwards
    ///
    /// A time column longer than the observations is accepted; the trailing
    /// times have no reading to pair with and are dropped.
    pub fn new(mut time: Vec<f64>, observed: Vec<f64>) -> Result<Self, DataError> {
        if observed.len() < MIN_OBSERVATIONS {
            return Err(DataError::InsufficientData {
                points: observed.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        if time.len() < observed.len() {
            return Err(DataError::LengthMismatch {
                time: time.len(),
                observed: observed.len(),
            });
        }
        if time.len() > observed.len() {
            warn!(
                "Time column has {} entries for {} observations; ignoring the trailing {}",
                time.len(),
                observed.len(),
                time.len() - observed.len()
            );
            time.truncate(observed.len());
        }

        for (row, (&t, &value)) in time.iter().zip(&observed).enumerate() {
            if !t.is_finite() {
                return Err(DataError::NonFiniteValue {
                    column: "time",
                    row,
                    value: t,
                });
            }
            if !value.is_finite() {
                return Err(DataError::NonFiniteValue {
                    column: "observed",
                    row,
                    value,
                });
            }
        }

        if let Some(row) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(DataError::NonMonotonicTime {
                row: row + 1,
                previous: time[row],
                current: time[row + 1],
            });
        }

        Ok(Self { time, observed })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Always false for a constructed series; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Iterates `(time, observed)` pairs in time order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.observed.iter().copied())
    }

    /// Observations in ascending order of value.
    pub fn sorted_observations(&self) -> Vec<f64> {
        let mut sorted = self.observed.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

/// Column selection for CSV loading. `None` means auto-detect.
#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    pub time_column: Option<String>,
    pub value_column: Option<String>,
}

const TIME_COLUMN_NAMES: [&str; 6] = ["time", "Time", "TIME", "t", "minutes", "min"];
const VALUE_COLUMN_NAMES: [&str; 8] = [
    "F_obs",
    "f_obs",
    "observed",
    "Observed",
    "cumulative",
    "infiltration",
    "Infiltration",
    "F",
];

/// Detects the time and observation columns for the CSV file
fn detect_columns(df: &DataFrame, config: &LoadConfig) -> Result<(String, String), DataError> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let pick = |explicit: &Option<String>, candidates: &[&str], label: &str| {
        match explicit {
            Some(name) => columns
                .iter()
                .find(|c| *c == name)
                .cloned()
                .ok_or_else(|| DataError::MissingColumns(name.clone())),
            None => candidates
                .iter()
                .find(|&&col| columns.iter().any(|c| c == col))
                .map(|s| s.to_string())
                .ok_or_else(|| DataError::MissingColumns(label.to_string())),
        }
    };

    let time_col = pick(&config.time_column, &TIME_COLUMN_NAMES[..], "time column")?;
    let value_col = pick(
        &config.value_column,
        &VALUE_COLUMN_NAMES[..],
        "cumulative infiltration column",
    )?;
    Ok((time_col, value_col))
}

/// Loads an observed series from a CSV file, auto-detecting the columns.
pub fn load_csv(file_path: &Path) -> Result<ObservedSeries, DataError> {
    load_csv_with_config(file_path, &LoadConfig::default())
}

/// Loads an observed series from a CSV file using the given column selection.
pub fn load_csv_with_config(
    file_path: &Path,
    config: &LoadConfig,
) -> Result<ObservedSeries, DataError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.into()))?
        .finish()?;

    let (time_col, value_col) = detect_columns(&df, config)?;

    // Integer columns (e.g. whole minutes) are widened to f64
    let time_series = df
        .column(&time_col)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let value_series = df
        .column(&value_col)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let time_data = time_series.f64()?;
    let value_data = value_series.f64()?;

    let null_count = time_data.null_count() + value_data.null_count();
    if null_count > 0 {
        return Err(DataError::NullDataError { count: null_count });
    }

    let time: Vec<f64> = time_data.iter().flatten().collect();
    let observed: Vec<f64> = value_data.iter().flatten().collect();
    ObservedSeries::new(time, observed)
}
