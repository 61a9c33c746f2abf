use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a parameter inside a [`Candidate`], in genome order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gene {
    /// `fo`, the initial infiltration rate
    InitialRate,
    /// `fc`, the asymptotic infiltration rate
    AsymptoticRate,
    /// `k`, the exponential decay constant
    DecayConstant,
}

impl Gene {
    pub const ALL: [Gene; 3] = [Gene::InitialRate, Gene::AsymptoticRate, Gene::DecayConstant];
}

/// One point in the search space: the Horton parameters `[fo, fc, k]`.
///
/// Sampling keeps `0.01 <= fc <= fo` and `0.01 <= k <= 1`, but nothing else
/// enforces it; the fitness function accepts any finite values with `k != 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub fo: f64,
    pub fc: f64,
    pub k: f64,
}

impl Candidate {
    pub fn new(fo: f64, fc: f64, k: f64) -> Self {
        Self { fo, fc, k }
    }

    pub fn gene(&self, gene: Gene) -> f64 {
        match gene {
            Gene::InitialRate => self.fo,
            Gene::AsymptoticRate => self.fc,
            Gene::DecayConstant => self.k,
        }
    }

    pub fn set_gene(&mut self, gene: Gene, value: f64) {
        match gene {
            Gene::InitialRate => self.fo = value,
            Gene::AsymptoticRate => self.fc = value,
            Gene::DecayConstant => self.k = value,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[fo={:.4}, fc={:.4}, k={:.4}]", self.fo, self.fc, self.k)
    }
}
