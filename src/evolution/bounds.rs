//! Legal parameter ranges for sampling and mutation.
//!
//! Only the `fo` range comes from the data. The `fc` range is always relative
//! to the `fo` of the candidate being built, and `k` has a fixed range.

use crate::data::{DataError, ObservedSeries, MIN_OBSERVATIONS};
use crate::evolution::candidate::Candidate;
use log::debug;
use rand::Rng;

/// Lower bound shared by `fc` and `k`; keeps both strictly positive.
pub const RATE_FLOOR: f64 = 0.01;
/// Upper bound of the decay constant.
pub const DECAY_CEILING: f64 = 1.0;
/// Upper end of the `fo` mutation window, as a multiple of the candidate's `fo`.
pub const FO_MUTATION_UPPER: f64 = 1.5;

/// A closed interval `[low, high]` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Draws a value uniformly from the interval.
    ///
    /// A reversed interval (`low > high`) is sampled between the two ends
    /// rather than rejected, since candidates produced by crossover are not
    /// guaranteed to be ordered.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        let value = self.low + u * (self.high - self.low);
        if self.low <= self.high {
            value.clamp(self.low, self.high)
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Parameter ranges derived from one observed series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsPolicy {
    initial_rate: Range,
}

impl BoundsPolicy {
    /// Derives the `fo` range from the observations.
    ///
    /// `fo` spans from the second-smallest to the largest observed value. The
    /// smallest value is normally the reading at time zero and would anchor the
    /// range at a degenerate width.
    ///
    /// # Errors
    /// - `DataError::InsufficientData` with fewer than two observations
    /// - `DataError::DegenerateRateBounds` if every observation is below [`RATE_FLOOR`]
    pub fn from_series(series: &ObservedSeries) -> Result<Self, DataError> {
        let sorted = series.sorted_observations();
        if sorted.len() < MIN_OBSERVATIONS {
            return Err(DataError::InsufficientData {
                points: sorted.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        let high = sorted[sorted.len() - 1];
        if high < RATE_FLOOR {
            return Err(DataError::DegenerateRateBounds {
                upper: high,
                floor: RATE_FLOOR,
            });
        }

        // fo must stay above the fc floor or the fc range would be empty
        let low = sorted[1].max(RATE_FLOOR);
        if low > sorted[1] {
            debug!(
                "Raised fo lower bound from {} to the rate floor {}",
                sorted[1], RATE_FLOOR
            );
        }

        Ok(Self {
            initial_rate: Range::new(low, high),
        })
    }

    /// Range for `fo` in a freshly created candidate.
    pub fn initial_rate(&self) -> Range {
        self.initial_rate
    }

    /// Range for `fc` given the candidate's current `fo`.
    pub fn asymptotic_rate(fo: f64) -> Range {
        Range::new(RATE_FLOOR, fo)
    }

    /// Range for `k`, independent of everything else.
    pub fn decay_constant() -> Range {
        Range::new(RATE_FLOOR, DECAY_CEILING)
    }

    /// Range for re-sampling `fo` during mutation.
    ///
    /// The window `[fc, 1.5·fo]` follows the candidate's own genes so `fo`
    /// can drift outside the data-derived range as the search progresses.
    /// Starting at `fc` keeps `fc <= fo` after the draw.
    pub fn initial_rate_mutation(candidate: &Candidate) -> Range {
        Range::new(candidate.fc, FO_MUTATION_UPPER * candidate.fo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series(observed: Vec<f64>) -> ObservedSeries {
        let time = (0..observed.len()).map(|i| i as f64).collect();
        ObservedSeries::new(time, observed).unwrap()
    }

    #[test]
    fn test_fo_range_skips_smallest_observation() {
        let policy = BoundsPolicy::from_series(&series(vec![0.0, 4.0, 9.0, 2.5])).unwrap();
        assert_eq!(policy.initial_rate(), Range::new(2.5, 9.0));
    }

    #[test]
    fn test_fo_range_on_reference_data() {
        let observed = vec![
            72.2, 72.2, 68.8, 68.8, 61.9, 61.9, 55.0, 51.6, 41.3, 30.9, 30.9, 30.9,
        ];
        let policy = BoundsPolicy::from_series(&series(observed)).unwrap();
        // 30.9 appears three times, so the second-smallest is still 30.9
        assert_eq!(policy.initial_rate(), Range::new(30.9, 72.2));
    }

    #[test]
    fn test_two_points_collapse_fo_range() {
        let policy = BoundsPolicy::from_series(&series(vec![0.0, 12.0])).unwrap();
        assert_eq!(policy.initial_rate(), Range::new(12.0, 12.0));

        let policy = BoundsPolicy::from_series(&series(vec![3.0, 12.0])).unwrap();
        assert_eq!(policy.initial_rate(), Range::new(12.0, 12.0));
    }

    #[test]
    fn test_low_fo_bound_is_raised_to_floor() {
        let policy = BoundsPolicy::from_series(&series(vec![0.0, 0.0, 5.0])).unwrap();
        assert_eq!(policy.initial_rate(), Range::new(RATE_FLOOR, 5.0));
    }

    #[test]
    fn test_all_tiny_observations_are_rejected() {
        let result = BoundsPolicy::from_series(&series(vec![0.0, 0.001, 0.002]));
        assert!(matches!(
            result,
            Err(DataError::DegenerateRateBounds { .. })
        ));
    }

    #[test]
    fn test_relative_ranges() {
        assert_eq!(BoundsPolicy::asymptotic_rate(40.0), Range::new(0.01, 40.0));
        assert_eq!(BoundsPolicy::decay_constant(), Range::new(0.01, 1.0));

        let window = BoundsPolicy::initial_rate_mutation(&Candidate::new(60.0, 20.0, 0.3));
        assert_eq!(window, Range::new(20.0, 90.0));
    }

    #[test]
    fn test_fo_mutation_window_starts_at_fc() {
        for (fo, fc) in [(10.0, 0.01), (10.0, 4.0), (10.0, 10.0), (0.5, 0.3)] {
            let window = BoundsPolicy::initial_rate_mutation(&Candidate::new(fo, fc, 0.5));
            assert_eq!(window.low, fc);
            assert_eq!(window.high, FO_MUTATION_UPPER * fo);
        }
    }

    #[test]
    fn test_sample_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = Range::new(0.01, 0.02);
        for _ in 0..10_000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn test_sample_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Range::new(5.0, 5.0).sample(&mut rng), 5.0);
    }

    #[test]
    fn test_sample_reversed_range_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let value = Range::new(3.0, 1.0).sample(&mut rng);
            assert!((1.0..=3.0).contains(&value));
        }
    }
}
