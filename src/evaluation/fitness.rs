//! Horton infiltration model and the least-squares objective used to calibrate it.
//!
//! The model predicts cumulative infiltration at elapsed time `t` as
//!
//! ```text
//! F(t) = fc·t + ((fo − fc) / k) · (1 − e^(−k·t))
//! ```
//!
//! which is the time integral of the rate curve `f(t) = fc + (fo − fc)·e^(−k·t)`.

use crate::data::ObservedSeries;
use crate::evolution::candidate::Candidate;
use thiserror::Error;

/// Decay constants with a magnitude below this are treated as zero.
pub const MIN_DECAY_CONSTANT: f64 = 1e-12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitnessError {
    #[error("Division by zero: decay constant k = {k} is too close to zero")]
    DivisionByZero { k: f64 },
    #[error("Fitness evaluation produced a non-finite value ({fitness}) for {candidate}")]
    NonFiniteResult { fitness: f64, candidate: Candidate },
}

/// Cumulative infiltration predicted by `candidate` at elapsed time `t`.
///
/// # Errors
/// `FitnessError::DivisionByZero` when `k` is zero or within [`MIN_DECAY_CONSTANT`] of it.
pub fn cumulative_infiltration(candidate: &Candidate, t: f64) -> Result<f64, FitnessError> {
    let Candidate { fo, fc, k } = *candidate;
    if k.abs() < MIN_DECAY_CONSTANT {
        return Err(FitnessError::DivisionByZero { k });
    }
    Ok(fc * t + ((fo - fc) / k) * (1.0 - (-k * t).exp()))
}

/// Instantaneous infiltration rate predicted by `candidate` at elapsed time `t`.
pub fn infiltration_rate(candidate: &Candidate, t: f64) -> f64 {
    candidate.fc + (candidate.fo - candidate.fc) * (-candidate.k * t).exp()
}

/// Model prediction at every time of the series, in series order.
pub fn predict(candidate: &Candidate, series: &ObservedSeries) -> Result<Vec<f64>, FitnessError> {
    series
        .time()
        .iter()
        .map(|&t| cumulative_infiltration(candidate, t))
        .collect()
}

/// Sum of squared residuals between the model and the observations.
///
/// The first reading is skipped: it is the initial condition and carries no
/// information about the parameters. Lower is better.
///
/// # Errors
/// - `DivisionByZero` if `k` is degenerate
/// - `NonFiniteResult` if the sum overflows (e.g. a large negative `k`)
pub fn evaluate(candidate: &Candidate, series: &ObservedSeries) -> Result<f64, FitnessError> {
    let mut squared_error = 0.0;
    for (t, observed) in series.points().skip(1) {
        let residual = observed - cumulative_infiltration(candidate, t)?;
        squared_error += residual * residual;
    }

    if !squared_error.is_finite() {
        return Err(FitnessError::NonFiniteResult {
            fitness: squared_error,
            candidate: *candidate,
        });
    }
    Ok(squared_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_series() -> ObservedSeries {
        let time: Vec<f64> = (0..13).map(|i| i as f64 * 5.0).collect();
        let observed = vec![
            72.2, 72.2, 68.8, 68.8, 61.9, 61.9, 55.0, 51.6, 41.3, 30.9, 30.9, 30.9,
        ];
        ObservedSeries::new(time, observed).unwrap()
    }

    #[test]
    fn test_reference_candidate_golden_value() {
        let series = reference_series();
        let candidate = Candidate::new(72.2, 30.9, 0.1);

        let fitness = evaluate(&candidate, &series).unwrap();

        let golden = 20_204_854.318_723_418;
        assert!(fitness.is_finite());
        assert!(
            ((fitness - golden) / golden).abs() < 1e-9,
            "fitness {} drifted from golden value {}",
            fitness,
            golden
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let series = reference_series();
        let candidate = Candidate::new(70.0, 25.0, 0.37);

        let first = evaluate(&candidate, &series).unwrap();
        for _ in 0..5 {
            assert_eq!(first.to_bits(), evaluate(&candidate, &series).unwrap().to_bits());
        }
    }

    #[test]
    fn test_first_point_is_ignored() {
        let candidate = Candidate::new(10.0, 2.0, 0.5);
        let t1 = 4.0;
        let exact = cumulative_infiltration(&candidate, t1).unwrap();

        // Wildly wrong initial reading, exact second reading
        let series = ObservedSeries::new(vec![0.0, t1], vec![1_000.0, exact]).unwrap();
        assert_eq!(evaluate(&candidate, &series).unwrap(), 0.0);
    }

    #[test]
    fn test_perfect_fit_scores_zero() {
        let truth = Candidate::new(8.0, 1.5, 0.2);
        let time: Vec<f64> = (0..10).map(|i| i as f64 * 3.0).collect();
        let observed: Vec<f64> = time
            .iter()
            .map(|&t| cumulative_infiltration(&truth, t).unwrap())
            .collect();
        let series = ObservedSeries::new(time, observed).unwrap();

        assert!(evaluate(&truth, &series).unwrap() < 1e-20);
        assert!(evaluate(&Candidate::new(8.0, 1.0, 0.2), &series).unwrap() > 0.0);
    }

    #[test]
    fn test_fitness_is_non_negative() {
        let series = reference_series();
        let candidates = [
            Candidate::new(72.2, 30.9, 0.1),
            Candidate::new(1.0, 5.0, 0.9),
            Candidate::new(-3.0, 2.0, 0.01),
            Candidate::new(100.0, 0.01, -0.05),
        ];
        for candidate in &candidates {
            assert!(evaluate(candidate, &series).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_zero_decay_constant_is_rejected() {
        let series = reference_series();
        let result = evaluate(&Candidate::new(72.2, 30.9, 0.0), &series);
        assert_eq!(result, Err(FitnessError::DivisionByZero { k: 0.0 }));
    }

    #[test]
    fn test_overflow_is_reported() {
        let series = reference_series();
        let result = evaluate(&Candidate::new(72.2, 30.9, -1_000.0), &series);
        assert!(matches!(result, Err(FitnessError::NonFiniteResult { .. })));
    }

    #[test]
    fn test_model_at_time_zero() {
        let candidate = Candidate::new(72.2, 30.9, 0.1);
        assert_eq!(cumulative_infiltration(&candidate, 0.0).unwrap(), 0.0);
        assert_eq!(infiltration_rate(&candidate, 0.0), 72.2);
    }

    #[test]
    fn test_rate_decays_towards_fc() {
        let candidate = Candidate::new(72.2, 30.9, 0.5);
        let late = infiltration_rate(&candidate, 200.0);
        assert!((late - 30.9).abs() < 1e-9);
    }

    #[test]
    fn test_predict_matches_series_length() {
        let series = reference_series();
        let predicted = predict(&Candidate::new(72.2, 30.9, 0.1), &series).unwrap();
        assert_eq!(predicted.len(), series.len());
        assert_eq!(predicted[0], 0.0);
    }
}
