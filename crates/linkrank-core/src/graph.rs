//! Directed link graph consumed by both estimators.
//!
//! # Overview
//!
//! A [`LinkGraph`] maps each node id to the set of node ids it links to.
//! It is built once from an adjacency map and never mutated afterwards, so
//! both estimators can share it by reference.
//!
//! ## Node Order
//!
//! Nodes are inserted into the underlying petgraph [`DiGraph`] in sorted id
//! order, so node index `i` is the `i`-th id in lexical order. Every dense
//! rank vector in this crate is indexed the same way, which keeps results
//! independent of input ordering.
//!
//! ## Dangling Nodes
//!
//! A node with no out-edges is *dangling*. Both estimators treat a dangling
//! node as linking to every node in the graph (see [`LinkGraph::is_dangling`]).
//!
//! ## Closed Edge Set
//!
//! Every edge target must itself be a node. Filtering links down to the
//! known node set is the job of whoever builds the adjacency map (for
//! example the CLI's corpus crawler); this module rejects stray targets with
//! [`RankError::UnknownNode`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use crate::error::RankError;

// ---------------------------------------------------------------------------
// LinkGraph
// ---------------------------------------------------------------------------

/// An immutable directed graph of string-identified nodes.
///
/// Nodes are ids; an edge `A → B` means "A links to B". Duplicate links
/// collapse to one edge. Self links are kept as ordinary edges.
#[derive(Debug, Clone)]
pub struct LinkGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    /// Build a graph from `(node, links)` pairs.
    ///
    /// Repeated node keys merge their link sets. Every link target must
    /// appear as a key; an empty iterator yields an empty graph, which both
    /// estimators reject with [`RankError::EmptyGraph`].
    ///
    /// # Errors
    ///
    /// Returns [`RankError::UnknownNode`] for the first (in sorted order)
    /// link target that is not a node of the graph.
    pub fn from_adjacency<I, N, L, T>(adjacency: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (node, links) in adjacency {
            pages
                .entry(node.into())
                .or_default()
                .extend(links.into_iter().map(Into::into));
        }

        let mut graph = DiGraph::<String, ()>::with_capacity(pages.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(pages.len());

        for id in pages.keys() {
            let idx = graph.add_node(id.clone());
            node_map.insert(id.clone(), idx);
        }

        for (from, links) in &pages {
            let from_idx = node_map[from];
            for to in links {
                let Some(&to_idx) = node_map.get(to) else {
                    return Err(RankError::UnknownNode(to.clone()));
                };
                graph.add_edge(from_idx, to_idx, ());
            }
        }

        Ok(Self { graph, node_map })
    }

    /// Build a graph from an explicit node list plus an edge list.
    ///
    /// Handy when some nodes have no links at all.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::UnknownNode`] if an edge endpoint is not listed
    /// in `nodes`.
    pub fn from_edges(nodes: &[&str], edges: &[(&str, &str)]) -> Result<Self, RankError> {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = nodes
            .iter()
            .map(|id| ((*id).to_string(), BTreeSet::new()))
            .collect();
        for (from, to) in edges {
            let Some(links) = adjacency.get_mut(*from) else {
                return Err(RankError::UnknownNode((*from).to_string()));
            };
            links.insert((*to).to_string());
        }
        Self::from_adjacency(adjacency)
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of (deduplicated) links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Whether `id` is a node of the graph.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Dense index of `id` (its position in sorted id order).
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).copied().map(NodeIndex::index)
    }

    /// Id of the node at dense index `idx`.
    #[must_use]
    pub fn node_id(&self, idx: usize) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(idx))
            .map(String::as_str)
    }

    /// Node ids in sorted order (dense index order).
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| self.graph[idx].as_str())
    }

    /// Dense indices of the nodes `idx` links to.
    pub fn out_neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            .map(NodeIndex::index)
    }

    /// Number of distinct nodes `idx` links to.
    #[must_use]
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_neighbors(idx).count()
    }

    /// A node with no outgoing links.
    ///
    /// Dangling nodes spread their mass uniformly over every node, both in
    /// the transition model and in the iterative solver.
    #[must_use]
    pub fn is_dangling(&self, idx: usize) -> bool {
        self.graph
            .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            .next()
            .is_none()
    }

    /// Export the graph back to a sorted adjacency map.
    #[must_use]
    pub fn to_adjacency(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.graph
            .node_indices()
            .map(|from| {
                let links = self
                    .graph
                    .neighbors_directed(from, Direction::Outgoing)
                    .map(|to| self.graph[to].clone())
                    .collect();
                (self.graph[from].clone(), links)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
