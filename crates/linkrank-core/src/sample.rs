//! Monte Carlo rank estimation by random walk.
//!
//! # Algorithm
//!
//! 1. Pick a starting node uniformly at random and count one visit.
//! 2. `samples - 1` times: build the transition row for the current node
//!    (see [`crate::transition`]), draw the next node from it with
//!    [`WeightedChoice`], count one visit, move there.
//! 3. rank(v) = visits(v) / samples.
//!
//! The random-jump term makes the chain irreducible and aperiodic, so the
//! visit frequencies converge to the stationary distribution as `samples`
//! grows. Visits are integer counts and the division happens once at the
//! end.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

use crate::choice::WeightedChoice;
use crate::config::SamplingConfig;
use crate::distribution::RankDistribution;
use crate::error::RankError;
use crate::graph::LinkGraph;
use crate::transition::fill_transition;

/// Estimate ranks from the visit frequencies of a random walk.
///
/// All randomness comes from `rng`; a seeded RNG gives a reproducible result.
///
/// # Errors
///
/// - [`RankError::EmptyGraph`] if `graph` has no nodes.
/// - [`RankError::InvalidSampleCount`] if `config.samples` is 0.
/// - [`RankError::InvalidDamping`] if `config.damping` is not in (0, 1).
#[instrument(skip(graph, rng), fields(nodes = graph.node_count()))]
pub fn sample_rank<R: Rng + ?Sized>(
    graph: &LinkGraph,
    config: &SamplingConfig,
    rng: &mut R,
) -> Result<RankDistribution, RankError> {
    if graph.is_empty() {
        return Err(RankError::EmptyGraph);
    }
    config.validate()?;

    let n = graph.node_count();
    let mut visits = vec![0_u64; n];
    let mut row = vec![0.0_f64; n];

    let mut current = rng.gen_range(0..n);
    visits[current] += 1;

    for _ in 1..config.samples {
        fill_transition(graph, current, config.damping, &mut row);
        current = WeightedChoice::new(&row)?.pick(rng);
        visits[current] += 1;
    }

    let total = config.samples as f64;
    let ranks: Vec<f64> = visits.iter().map(|&count| count as f64 / total).collect();

    debug!(samples = config.samples, "random walk complete");
    Ok(RankDistribution::from_dense(graph, &ranks))
}

/// [`sample_rank`] with an [`StdRng`] seeded from `seed`.
///
/// # Errors
///
/// Same as [`sample_rank`].
pub fn sample_rank_seeded(
    graph: &LinkGraph,
    damping: f64,
    samples: usize,
    seed: u64,
) -> Result<RankDistribution, RankError> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_rank(graph, &SamplingConfig { damping, samples }, &mut rng)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
