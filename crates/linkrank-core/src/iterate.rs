//! Rank estimation by fixed-point (power) iteration.
//!
//! # Algorithm
//!
//! Start from the uniform vector and repeatedly apply
//!
//! ```text
//! PR'(p) = (1 - d) / N + d * Σ contribution(i, p)
//!
//! contribution(i, p) = PR(i) / N           if i is dangling
//!                    = PR(i) / |out(i)|    if p ∈ out(i)
//!                    = 0                   otherwise
//! ```
//!
//! Every pass reads a frozen snapshot of the previous ranks and writes a
//! separate buffer, so the result never depends on node order.
//!
//! # Stopping rule
//!
//! Iteration stops once **every** node satisfies `|PR'(p) - PR(p)| ≤
//! tolerance`, and the pre-update snapshot `PR` is returned: the estimate
//! that was already within tolerance of its own refinement.
//!
//! `max_iterations` caps the number of passes. Hitting it is logged as a
//! warning and the latest estimate is returned with `converged = false`.

use tracing::{debug, instrument, trace, warn};

use crate::config::IterationConfig;
use crate::distribution::{RankDistribution, spread_uniform};
use crate::error::RankError;
use crate::graph::LinkGraph;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of an iterative rank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationOutcome {
    /// Rank per node id.
    pub ranks: RankDistribution,
    /// Number of update passes performed.
    pub iterations: usize,
    /// Whether the stopping rule was met before `max_iterations`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Iterative rank
// ---------------------------------------------------------------------------

/// Solve the rank equations by repeated substitution.
///
/// # Errors
///
/// - [`RankError::EmptyGraph`] if `graph` has no nodes.
/// - [`RankError::InvalidTolerance`] if `config.tolerance` is not positive.
/// - [`RankError::InvalidDamping`] if `config.damping` is not in (0, 1).
/// - [`RankError::InvalidIterationCap`] if `config.max_iterations` is 0.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn iterate_rank(
    graph: &LinkGraph,
    config: &IterationConfig,
) -> Result<IterationOutcome, RankError> {
    if graph.is_empty() {
        return Err(RankError::EmptyGraph);
    }
    config.validate()?;

    let n = graph.node_count();
    let mut ranks = vec![1.0 / n as f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;
        update_pass(graph, config.damping, &ranks, &mut new_ranks);

        let delta = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .fold(0.0_f64, f64::max);
        trace!(iteration = iterations, delta, "rank update pass");

        if delta <= config.tolerance {
            converged = true;
            break;
        }

        std::mem::swap(&mut ranks, &mut new_ranks);
    }

    if converged {
        debug!(iterations, "rank iteration converged");
    } else {
        warn!(
            iterations,
            tolerance = config.tolerance,
            "rank iteration hit max_iterations before converging"
        );
    }

    Ok(IterationOutcome {
        ranks: RankDistribution::from_dense(graph, &ranks),
        iterations,
        converged,
    })
}

/// Iterate with tolerance 0.001 and the default iteration cap.
///
/// # Errors
///
/// Same as [`iterate_rank`].
pub fn iterate_rank_default(
    graph: &LinkGraph,
    damping: f64,
) -> Result<RankDistribution, RankError> {
    let config = IterationConfig {
        damping,
        ..IterationConfig::default()
    };
    iterate_rank(graph, &config).map(|outcome| outcome.ranks)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// One Jacobi pass: read `prev`, write `next`.
fn update_pass(graph: &LinkGraph, damping: f64, prev: &[f64], next: &mut [f64]) {
    next.fill(0.0);
    spread_uniform(1.0 - damping, next);

    let mut dangling_mass = 0.0;
    for (idx, &rank) in prev.iter().enumerate() {
        if graph.is_dangling(idx) {
            dangling_mass += rank;
            continue;
        }
        let share = damping * rank / graph.out_degree(idx) as f64;
        for neighbor in graph.out_neighbors(idx) {
            next[neighbor] += share;
        }
    }

    spread_uniform(damping * dangling_mass, next);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
