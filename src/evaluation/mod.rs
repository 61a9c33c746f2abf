//! Scoring of candidate parameter sets against an observed series.

pub mod fitness;
pub mod metrics;

use crate::data::ObservedSeries;
use crate::evolution::candidate::Candidate;
use fitness::FitnessError;

/// How well one parameter set reproduces the series, for display.
///
/// The first reading is left out, as in the objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub sum_squared_error: f64,
    pub rmse: f64,
    pub nse: f64,
    /// Fitted infiltration rate at the first and last reading
    pub initial_rate: f64,
    pub final_rate: f64,
}

impl FitReport {
    pub fn new(candidate: &Candidate, series: &ObservedSeries) -> Result<Self, FitnessError> {
        let predicted = fitness::predict(candidate, series)?;
        let observed = &series.observed()[1..];
        let simulated = &predicted[1..];
        let time = series.time();
        let first = time.first().copied().unwrap_or(0.0);
        let last = time.last().copied().unwrap_or(first);
        Ok(Self {
            sum_squared_error: fitness::evaluate(candidate, series)?,
            rmse: metrics::rmse(observed, simulated),
            nse: metrics::nse(observed, simulated),
            initial_rate: fitness::infiltration_rate(candidate, first),
            final_rate: fitness::infiltration_rate(candidate, last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_on_exact_curve() {
        let truth = Candidate::new(6.0, 1.0, 0.3);
        let time: Vec<f64> = (0..8).map(|i| i as f64 * 2.0).collect();
        let observed: Vec<f64> = time
            .iter()
            .map(|&t| fitness::cumulative_infiltration(&truth, t).unwrap())
            .collect();
        let series = ObservedSeries::new(time, observed).unwrap();

        let report = FitReport::new(&truth, &series).unwrap();
        assert_eq!(report.sum_squared_error, 0.0);
        assert_eq!(report.rmse, 0.0);
        assert!((report.nse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_rates_span_the_series() {
        let time: Vec<f64> = (0..13).map(|i| i as f64 * 5.0).collect();
        let observed = vec![
            72.2, 72.2, 68.8, 68.8, 61.9, 61.9, 55.0, 51.6, 41.3, 30.9, 30.9, 30.9,
        ];
        let series = ObservedSeries::new(time, observed).unwrap();
        let candidate = Candidate::new(72.2, 30.9, 0.1);

        let report = FitReport::new(&candidate, &series).unwrap();
        // readings start at t = 0, where the rate is fo
        assert_eq!(report.initial_rate, 72.2);
        // the last kept reading is at t = 55
        let expected = 30.9 + (72.2 - 30.9) * (-0.1_f64 * 55.0).exp();
        assert!((report.final_rate - expected).abs() < 1e-12);
        assert!(report.final_rate > 30.9 && report.final_rate < report.initial_rate);
    }

    #[test]
    fn test_report_rmse_consistent_with_sse() {
        let time: Vec<f64> = (0..13).map(|i| i as f64 * 5.0).collect();
        let observed = vec![
            72.2, 72.2, 68.8, 68.8, 61.9, 61.9, 55.0, 51.6, 41.3, 30.9, 30.9, 30.9,
        ];
        let series = ObservedSeries::new(time, observed).unwrap();

        let report = FitReport::new(&Candidate::new(72.2, 30.9, 0.1), &series).unwrap();
        let expected_rmse = (report.sum_squared_error / 11.0).sqrt();
        assert!((report.rmse - expected_rmse).abs() < 1e-9 * expected_rmse);
    }
}
