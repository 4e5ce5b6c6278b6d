//! Cross-estimator tests: the sampler and the iterative solver on the same graphs.
//!
//! # Test Strategy
//!
//! 1. Generate small random link graphs (proptest) including dangling nodes
//!    and self links.
//! 2. Check the invariants every output must satisfy: transition rows and
//!    rank distributions sum to 1.
//! 3. Check that a tighter tolerance never lands further (in L1) from the
//!    analytic fixed point than a looser one.
//! 4. Check that sampling error against the iterative result shrinks as
//!    the walk gets longer.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use linkrank_core::{
    IterationConfig, LinkGraph, RankDistribution, RankError, SamplingConfig, iterate_rank,
    sample_rank, sample_rank_seeded, transition,
};

// ---------------------------------------------------------------------------
// Graph construction helpers
// ---------------------------------------------------------------------------

/// The four-page corpus: 1 ↔ 2 ↔ 3 → 4 → 2.
fn corpus0() -> LinkGraph {
    LinkGraph::from_adjacency([
        ("1.html", vec!["2.html"]),
        ("2.html", vec!["1.html", "3.html"]),
        ("3.html", vec!["2.html", "4.html"]),
        ("4.html", vec!["2.html"]),
    ])
    .expect("valid graph")
}

/// A graph with a dangling page and an unreachable page.
fn with_sink() -> LinkGraph {
    LinkGraph::from_adjacency([
        ("a", vec!["b", "c"]),
        ("b", vec!["c"]),
        ("c", vec![]),
        ("d", vec!["a"]),
    ])
    .expect("valid graph")
}

fn build_random(nodes: usize, edges: &[(usize, usize)]) -> LinkGraph {
    let adjacency = (0..nodes).map(|i| {
        let links: BTreeSet<String> = edges
            .iter()
            .filter(|(from, _)| from % nodes == i)
            .map(|(_, to)| format!("n{}", to % nodes))
            .collect();
        (format!("n{i}"), links)
    });
    LinkGraph::from_adjacency(adjacency).expect("closed edge set")
}

fn graph_strategy() -> impl Strategy<Value = LinkGraph> {
    (1usize..8, prop::collection::vec((0usize..8, 0usize..8), 0..20))
        .prop_map(|(nodes, edges)| build_random(nodes, &edges))
}

/// Fixed point computed far past any practical tolerance.
fn reference(graph: &LinkGraph, damping: f64) -> RankDistribution {
    let config = IterationConfig {
        damping,
        tolerance: 1e-13,
        max_iterations: 100_000,
    };
    let outcome = iterate_rank(graph, &config).expect("iterate");
    assert!(outcome.converged);
    outcome.ranks
}

fn mean_abs_deviation(a: &RankDistribution, b: &RankDistribution) -> f64 {
    a.l1_distance(b) / a.len() as f64
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transition_rows_sum_to_one(graph in graph_strategy(), damping in 0.01f64..0.99) {
        for id in graph.node_ids() {
            let row = transition(&graph, id, damping).expect("transition");
            prop_assert_eq!(row.len(), graph.node_count());
            prop_assert!((row.total() - 1.0).abs() < 1e-9);
            prop_assert!(row.iter().all(|(_, p)| p >= 0.0));
        }
    }

    #[test]
    fn iterative_ranks_sum_to_one(graph in graph_strategy(), damping in 0.05f64..0.95) {
        let config = IterationConfig { damping, ..IterationConfig::default() };
        let outcome = iterate_rank(&graph, &config).expect("iterate");
        prop_assert!(outcome.converged);
        prop_assert!((outcome.ranks.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sampled_ranks_sum_to_one(graph in graph_strategy(), seed in any::<u64>(), samples in 1usize..300) {
        let ranks = sample_rank_seeded(&graph, 0.85, samples, seed).expect("sample");
        prop_assert_eq!(ranks.len(), graph.node_count());
        prop_assert!((ranks.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tighter_tolerance_is_never_further(graph in graph_strategy(), damping in 0.05f64..0.95) {
        let exact = reference(&graph, damping);
        let loose = iterate_rank(&graph, &IterationConfig { damping, tolerance: 0.01, ..IterationConfig::default() })
            .expect("iterate");
        let tight = iterate_rank(&graph, &IterationConfig { damping, tolerance: 0.0001, ..IterationConfig::default() })
            .expect("iterate");

        prop_assert!(tight.iterations >= loose.iterations);
        prop_assert!(tight.ranks.l1_distance(&exact) <= loose.ranks.l1_distance(&exact) + 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn dangling_rows_are_uniform_in_any_graph() {
    let g = with_sink();
    let row = transition(&g, "c", 0.85).expect("transition");
    for (_, p) in row.iter() {
        assert!((p - 0.25).abs() < 1e-15);
    }
}

#[test]
fn corpus0_iterative_ranks() {
    let outcome = iterate_rank(&corpus0(), &IterationConfig::default()).expect("iterate");
    let expected = [
        ("1.html", 0.2202),
        ("2.html", 0.4289),
        ("3.html", 0.2202),
        ("4.html", 0.1307),
    ];
    for (id, want) in expected {
        let got = outcome.ranks.get(id).expect("present");
        assert!((got - want).abs() < 5e-4, "{id}: {got} vs {want}");
    }
}

#[test]
fn sampler_agrees_with_solver() {
    let g = with_sink();
    let exact = reference(&g, 0.85);
    let sampled = sample_rank_seeded(&g, 0.85, 50_000, 2024).expect("sample");
    assert!(sampled.max_abs_diff(&exact) < 0.02, "{sampled:?} vs {exact:?}");
}

#[test]
fn sampling_error_shrinks_with_more_samples() {
    let g = corpus0();
    let exact = reference(&g, 0.85);
    let seeds = 0..5_u64;

    let error_at = |samples: usize| -> f64 {
        let total: f64 = seeds
            .clone()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let config = SamplingConfig {
                    damping: 0.85,
                    samples,
                };
                let ranks = sample_rank(&g, &config, &mut rng).expect("sample");
                mean_abs_deviation(&ranks, &exact)
            })
            .sum();
        total / 5.0
    };

    let short = error_at(1_000);
    let long = error_at(100_000);
    assert!(long < short, "100k error {long} should beat 1k error {short}");
}

#[test]
fn estimators_share_no_state_across_calls() {
    let g = corpus0();
    let config = IterationConfig::default();
    let first = iterate_rank(&g, &config).expect("iterate");
    let _ = sample_rank_seeded(&g, 0.85, 1_000, 8).expect("sample");
    let second = iterate_rank(&g, &config).expect("iterate");
    assert_eq!(first, second);
}

#[test]
fn graph_can_be_shared_across_threads() {
    let g = corpus0();
    let (a, b) = std::thread::scope(|scope| {
        let left = scope.spawn(|| iterate_rank(&g, &IterationConfig::default()));
        let right = scope.spawn(|| iterate_rank(&g, &IterationConfig::default()));
        (
            left.join().expect("thread"),
            right.join().expect("thread"),
        )
    });
    assert_eq!(a.expect("iterate"), b.expect("iterate"));
}

#[test]
fn errors_are_invalid_argument_class() {
    let empty = LinkGraph::from_edges(&[], &[]).expect("empty ok");
    let errors = [
        sample_rank_seeded(&empty, 0.85, 10, 1).expect_err("empty"),
        sample_rank_seeded(&corpus0(), 0.85, 0, 1).expect_err("zero samples"),
        transition(&corpus0(), "nope.html", 0.85).expect_err("unknown"),
        iterate_rank(
            &corpus0(),
            &IterationConfig {
                tolerance: 0.0,
                ..IterationConfig::default()
            },
        )
        .expect_err("tolerance"),
    ];
    assert!(errors.iter().all(RankError::is_invalid_argument));
    assert_eq!(errors[2], RankError::UnknownNode("nope.html".into()));
}
