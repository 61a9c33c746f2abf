//! Session export for keeping a fitting session's results alongside its inputs.
//!
//! The export carries the GA settings, the observed series and every run's
//! champion, so a result can be re-scored or a run replayed from its seed.

use crate::config::{GaConfig, SearchConfig};
use crate::data::ObservedSeries;
use crate::search::RunResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version written into every export.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Complete record of one fitting session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionExport {
    /// Schema version for forward/backward compatibility
    pub schema_version: String,
    /// Unix timestamp when export was generated
    pub generated_at: i64,
    /// Snapshot of the search settings
    pub ga: GaConfig,
    pub search: SearchConfig,
    /// Series the session was fitted against
    pub series: ObservedSeries,
    /// Champion of every run, in run order
    pub results: Vec<RunResult>,
}

impl SessionExport {
    /// Creates a new export from a finished session.
    ///
    /// # Arguments
    /// * `ga` - GA configuration used for every run
    /// * `search` - Run count and master seed
    /// * `series` - Observed series the runs were scored against
    /// * `results` - Run results, in run order
    pub fn new(
        ga: GaConfig,
        search: SearchConfig,
        series: ObservedSeries,
        results: Vec<RunResult>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().timestamp(),
            ga,
            search,
            series,
            results,
        }
    }
}

/// Writes a session export to a JSON file.
pub fn write_export_to_json(
    export: &SessionExport,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

/// Reads a session export from a JSON file.
pub fn read_export_from_json(
    input_path: &Path,
) -> Result<SessionExport, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(input_path)?;
    let export: SessionExport = serde_json::from_str(&content)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::candidate::Candidate;
    use tempfile::tempdir;

    fn sample_export() -> SessionExport {
        let series = ObservedSeries::new(vec![0.0, 5.0, 10.0], vec![0.0, 9.0, 15.0]).unwrap();
        let results = vec![
            RunResult {
                run: 0,
                seed: 42,
                fitness: 1.25,
                candidate: Candidate::new(9.0, 1.0, 0.3),
            },
            RunResult {
                run: 1,
                seed: 43,
                fitness: 0.75,
                candidate: Candidate::new(10.0, 0.5, 0.4),
            },
        ];
        SessionExport::new(
            GaConfig::default(),
            SearchConfig::default(),
            series,
            results,
        )
    }

    #[test]
    fn test_write_then_read_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let export = sample_export();

        write_export_to_json(&export, &path).unwrap();
        let restored = read_export_from_json(&path).unwrap();

        assert_eq!(restored, export);
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        // run order is preserved, not sorted by fitness
        assert_eq!(restored.results[0].run, 0);
        assert_eq!(restored.results[1].run, 1);
    }

    #[test]
    fn test_export_is_timestamped() {
        let export = sample_export();
        assert!(export.generated_at > 1_600_000_000);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(read_export_from_json(&dir.path().join("absent.json")).is_err());
    }
}
