//! Rank distributions: per-node probability mass keyed by node id.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::LinkGraph;

/// Normalized importance per node.
///
/// Values are non-negative and sum to 1.0 within floating-point tolerance.
/// Iteration is sorted by node id.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RankDistribution(BTreeMap<String, f64>);

impl RankDistribution {
    /// Pair a dense rank vector with the graph's node ids.
    ///
    /// `ranks[i]` belongs to the node at dense index `i`.
    pub(crate) fn from_dense(graph: &LinkGraph, ranks: &[f64]) -> Self {
        debug_assert_eq!(graph.node_count(), ranks.len());
        Self(
            graph
                .node_ids()
                .zip(ranks.iter().copied())
                .map(|(id, rank)| (id.to_string(), rank))
                .collect(),
        )
    }

    /// Rank of `id`, if it is part of the distribution.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// `(id, rank)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(id, rank)| (id.as_str(), *rank))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all ranks; 1.0 up to rounding for any estimator output.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Sum of absolute per-node differences against `other`.
    ///
    /// Nodes missing from one side count as rank 0 there.
    #[must_use]
    pub fn l1_distance(&self, other: &Self) -> f64 {
        self.abs_diffs(other).sum()
    }

    /// Largest absolute per-node difference against `other`.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.abs_diffs(other).fold(0.0_f64, f64::max)
    }

    fn abs_diffs<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = f64> + 'a {
        let only_other = other
            .0
            .iter()
            .filter(|(id, _)| !self.0.contains_key(*id))
            .map(|(_, rank)| rank.abs());
        self.0
            .iter()
            .map(|(id, rank)| (rank - other.get(id).unwrap_or(0.0)).abs())
            .chain(only_other)
    }
}

/// Add `mass / ranks.len()` to every entry.
///
/// Dangling-node mass goes through here in both the transition model and
/// the iterative solver.
pub(crate) fn spread_uniform(mass: f64, ranks: &mut [f64]) {
    if ranks.is_empty() {
        return;
    }
    let share = mass / ranks.len() as f64;
    for r in ranks.iter_mut() {
        *r += share;
    }
}
