//! Random-surfer transition model.
//!
//! # Model
//!
//! From the current node `p` over a graph of `N` nodes:
//!
//! ```text
//! P(next = n | p) = 1 / N                                   if p is dangling
//! P(next = n | p) = (1 - d) / N + [n ∈ out(p)] * d / |out(p)|   otherwise
//! ```
//!
//! where `d` is the damping factor. The first term is the random jump, the
//! second is following one of `p`'s links chosen uniformly. Every entry
//! receives at most two additions, so the row sums to 1.0 up to a couple of
//! ulps.

use tracing::instrument;

use crate::distribution::{RankDistribution, spread_uniform};
use crate::error::{RankError, check_damping};
use crate::graph::LinkGraph;

/// Probability distribution over the next node, given the current node.
///
/// # Errors
///
/// - [`RankError::EmptyGraph`] if `graph` has no nodes.
/// - [`RankError::UnknownNode`] if `current` is not a node of `graph`.
/// - [`RankError::InvalidDamping`] if `damping` is not in (0, 1).
#[instrument(skip(graph))]
pub fn transition(
    graph: &LinkGraph,
    current: &str,
    damping: f64,
) -> Result<RankDistribution, RankError> {
    if graph.is_empty() {
        return Err(RankError::EmptyGraph);
    }
    check_damping(damping)?;
    let idx = graph
        .node_index(current)
        .ok_or_else(|| RankError::UnknownNode(current.to_string()))?;

    let mut row = vec![0.0; graph.node_count()];
    fill_transition(graph, idx, damping, &mut row);
    Ok(RankDistribution::from_dense(graph, &row))
}

/// Write the transition row for dense node `idx` into `row`.
///
/// `row.len()` must equal `graph.node_count()`; inputs are assumed
/// validated by the caller.
pub(crate) fn fill_transition(graph: &LinkGraph, idx: usize, damping: f64, row: &mut [f64]) {
    debug_assert_eq!(row.len(), graph.node_count());

    row.fill(0.0);
    if graph.is_dangling(idx) {
        spread_uniform(1.0, row);
        return;
    }

    spread_uniform(1.0 - damping, row);

    let share = damping / graph.out_degree(idx) as f64;
    for neighbor in graph.out_neighbors(idx) {
        row[neighbor] += share;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus0() -> LinkGraph {
        LinkGraph::from_edges(
            &["1.html", "2.html", "3.html", "4.html"],
            &[
                ("1.html", "2.html"),
                ("2.html", "1.html"),
                ("2.html", "3.html"),
                ("3.html", "2.html"),
                ("3.html", "4.html"),
                ("4.html", "2.html"),
            ],
        )
        .expect("valid graph")
    }

    #[test]
    fn follows_links_with_damping() {
        let g = corpus0();
        let dist = transition(&g, "1.html", 0.85).expect("transition");

        // 0.15 / 4 everywhere, plus 0.85 to the single link.
        assert!((dist.get("1.html").expect("present") - 0.0375).abs() < 1e-12);
        assert!((dist.get("2.html").expect("present") - 0.8875).abs() < 1e-12);
        assert!((dist.get("3.html").expect("present") - 0.0375).abs() < 1e-12);
        assert!((dist.get("4.html").expect("present") - 0.0375).abs() < 1e-12);
    }

    #[test]
    fn splits_link_mass_evenly() {
        let g = corpus0();
        let dist = transition(&g, "2.html", 0.85).expect("transition");
        assert!((dist.get("1.html").expect("present") - 0.4625).abs() < 1e-12);
        assert!((dist.get("3.html").expect("present") - 0.4625).abs() < 1e-12);
        assert!((dist.get("2.html").expect("present") - 0.0375).abs() < 1e-12);
    }

    #[test]
    fn every_row_sums_to_one() {
        let g = corpus0();
        for id in g.node_ids() {
            let total = transition(&g, id, 0.85).expect("transition").total();
            assert!((total - 1.0).abs() < 1e-9, "{id}: {total}");
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn dangling_node_is_exactly_uniform() {
        let g = LinkGraph::from_edges(&["a", "b", "c"], &[("a", "b"), ("b", "c")])
            .expect("valid graph");
        let dist = transition(&g, "c", 0.85).expect("transition");
        let expected = 1.0 / 3.0;
        for (id, p) in dist.iter() {
            assert_eq!(p, expected, "{id}");
        }
    }

    #[test]
    fn self_link_gets_link_mass() {
        let g = LinkGraph::from_edges(&["a", "b"], &[("a", "a")]).expect("valid graph");
        let dist = transition(&g, "a", 0.5).expect("transition");
        assert!((dist.get("a").expect("present") - 0.75).abs() < 1e-12);
        assert!((dist.get("b").expect("present") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unknown_node_is_rejected() {
        let g = corpus0();
        let err = transition(&g, "9.html", 0.85).expect_err("must fail");
        assert_eq!(err, RankError::UnknownNode("9.html".into()));
    }

    #[test]
    fn empty_graph_is_rejected() {
        let g = LinkGraph::from_edges(&[], &[]).expect("empty ok");
        assert_eq!(transition(&g, "a", 0.85), Err(RankError::EmptyGraph));
    }

    #[test]
    fn damping_out_of_range_is_rejected() {
        let g = corpus0();
        assert_eq!(
            transition(&g, "1.html", 1.2),
            Err(RankError::InvalidDamping(1.2))
        );
    }
}
