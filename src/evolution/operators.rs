//! Genetic operators for the `[fo, fc, k]` encoding.

use crate::data::{DataError, ObservedSeries};
use crate::evaluation::fitness::{self, FitnessError};
use crate::evolution::bounds::BoundsPolicy;
use crate::evolution::candidate::{Candidate, Gene};
use crate::evolution::GeneticOperators;
use rand::Rng;

/// Operator set that fits a Horton curve to one observed series.
///
/// Holds the series and the bounds derived from it; every callback the
/// search engine makes goes through here.
#[derive(Debug, Clone)]
pub struct HortonOperators<'a> {
    series: &'a ObservedSeries,
    bounds: BoundsPolicy,
}

impl<'a> HortonOperators<'a> {
    /// # Errors
    /// Whatever [`BoundsPolicy::from_series`] rejects.
    pub fn new(series: &'a ObservedSeries) -> Result<Self, DataError> {
        Ok(Self {
            series,
            bounds: BoundsPolicy::from_series(series)?,
        })
    }

    pub fn series(&self) -> &ObservedSeries {
        self.series
    }

    pub fn bounds(&self) -> &BoundsPolicy {
        &self.bounds
    }
}

/// Re-samples a single gene of `candidate` in place.
///
/// * `fo` - from `[0.5·fc, 1.5·fo]` of the candidate's current values, clipped at `fc`
/// * `fc` - from `[0.01, fo]`
/// * `k` - from `[0.01, 1.0]`
pub fn mutate_gene<R: Rng + ?Sized>(candidate: &mut Candidate, gene: Gene, rng: &mut R) {
    let range = match gene {
        Gene::InitialRate => BoundsPolicy::initial_rate_mutation(candidate),
        Gene::AsymptoticRate => BoundsPolicy::asymptotic_rate(candidate.fo),
        Gene::DecayConstant => BoundsPolicy::decay_constant(),
    };
    candidate.set_gene(gene, range.sample(rng));
}

/// Exchanges genes between two parents with fixed cuts after `fo` and after `fc`.
///
/// Both children inherit `fo` from `parent_a`; `parent_b.fo` is never passed on.
pub fn crossover(parent_a: &Candidate, parent_b: &Candidate) -> (Candidate, Candidate) {
    let child_a = Candidate::new(parent_a.fo, parent_a.fc, parent_b.k);
    let child_b = Candidate::new(parent_a.fo, parent_b.fc, parent_b.k);
    (child_a, child_b)
}

impl GeneticOperators for HortonOperators<'_> {
    type Genome = Candidate;
    type Error = FitnessError;

    fn create<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let fo = self.bounds.initial_rate().sample(rng);
        let fc = BoundsPolicy::asymptotic_rate(fo).sample(rng);
        let k = BoundsPolicy::decay_constant().sample(rng);
        Candidate::new(fo, fc, k)
    }

    fn mutate<R: Rng + ?Sized>(&self, genome: &mut Candidate, rng: &mut R) {
        let gene = Gene::ALL[rng.random_range(0..Gene::ALL.len())];
        mutate_gene(genome, gene, rng);
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_a: &Candidate,
        parent_b: &Candidate,
        _rng: &mut R,
    ) -> (Candidate, Candidate) {
        crossover(parent_a, parent_b)
    }

    fn fitness(&self, genome: &Candidate) -> Result<f64, FitnessError> {
        fitness::evaluate(genome, self.series)
    }
}
