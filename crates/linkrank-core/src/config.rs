use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RankError, check_damping};

/// Parameters for one ranking run, as read from `linkrank.toml`.
///
/// ```toml
/// [rank]
/// damping = 0.85
/// samples = 10000
/// tolerance = 0.001
/// max_iterations = 10000
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Seed for the sampler RNG; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            samples: default_samples(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            seed: None,
        }
    }
}

impl RankConfig {
    /// Check every value against the estimators' preconditions.
    ///
    /// # Errors
    ///
    /// Returns the first [`RankError`] an estimator would raise for these
    /// parameters.
    pub fn validate(&self) -> Result<(), RankError> {
        self.sampling().validate()?;
        self.iteration().validate()
    }

    /// Parameters for [`crate::sample_rank`].
    #[must_use]
    pub const fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            damping: self.damping,
            samples: self.samples,
        }
    }

    /// Parameters for [`crate::iterate_rank`].
    #[must_use]
    pub const fn iteration(&self) -> IterationConfig {
        IterationConfig {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// Configuration for the sampling estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Probability of following a link rather than jumping. Default: 0.85.
    pub damping: f64,
    /// Length of the walk, counting the starting node. Default: 10 000.
    pub samples: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        RankConfig::default().sampling()
    }
}

impl SamplingConfig {
    /// # Errors
    ///
    /// [`RankError::InvalidDamping`] or [`RankError::InvalidSampleCount`].
    pub fn validate(&self) -> Result<(), RankError> {
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(RankError::InvalidSampleCount(self.samples));
        }
        Ok(())
    }
}

/// Configuration for the iterative estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationConfig {
    /// Probability of following a link rather than jumping. Default: 0.85.
    pub damping: f64,
    /// Stop once no node moves by more than this. Default: 0.001.
    pub tolerance: f64,
    /// Safety cap on the number of passes. Default: 10 000.
    pub max_iterations: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        RankConfig::default().iteration()
    }
}

impl IterationConfig {
    /// # Errors
    ///
    /// [`RankError::InvalidDamping`], [`RankError::InvalidTolerance`] or
    /// [`RankError::InvalidIterationCap`].
    pub fn validate(&self) -> Result<(), RankError> {
        check_damping(self.damping)?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RankError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(RankError::InvalidIterationCap);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rank: RankConfig,
}

/// Load the `[rank]` table from `path`.
///
/// A missing file yields [`RankConfig::default`]. Values are not validated
/// here so that command-line overrides can still fix them.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<RankConfig> {
    if !path.exists() {
        return Ok(RankConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigFile>(&content)
        .map(|file| file.rank)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_samples() -> usize {
    10_000
}

const fn default_tolerance() -> f64 {
    0.001
}

const fn default_max_iterations() -> usize {
    10_000
}
