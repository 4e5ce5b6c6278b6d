//! Weighted choice from a discrete distribution.
//!
//! [`WeightedChoice`] turns a slice of non-negative weights into a sampler
//! that returns index `i` with probability `weights[i] / Σ weights`. The
//! sampling estimator draws every step of its walk through it.

use rand::{
    Rng,
    distributions::{Distribution, WeightedError, WeightedIndex},
};

use crate::error::RankError;

/// Sampler over the indices of a weight vector.
#[derive(Debug, Clone)]
pub struct WeightedChoice {
    index: WeightedIndex<f64>,
    len: usize,
}

impl WeightedChoice {
    /// Build a sampler from `weights`.
    ///
    /// Weights need not be normalized.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidWeights`] if `weights` is empty, contains
    /// a negative or non-finite value, or sums to zero.
    pub fn new(weights: &[f64]) -> Result<Self, RankError> {
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(RankError::InvalidWeights(format!("non-finite weight {bad}")));
        }
        let index = WeightedIndex::new(weights)
            .map_err(|err: WeightedError| RankError::InvalidWeights(err.to_string()))?;
        Ok(Self {
            index,
            len: weights.len(),
        })
    }

    /// Draw one index.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }

    /// Number of choices (including zero-weight ones).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
