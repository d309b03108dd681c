//! Directed word graph with bounded out-degree.
//!
//! A [`WordGraph`] is built once, either from sorted candidate lists with
//! [`builder::GraphBuilder`] or edge by edge with
//! [`builder::WordGraphBuilder`], and never changes afterwards. It is `Send`
//! and `Sync`, so any number of [`path::PathFinder`] queries can run against
//! a shared reference at the same time.
//!
//! The graph is directed even though similarity is symmetric: each vertex
//! keeps only its strongest candidates, so `a -> b` may exist while `b -> a`
//! was cut by the degree cap.

pub mod builder;
pub mod path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use builder::{GraphBuilder, WordGraphBuilder};
pub use path::{PathFinder, PathResult};

/// Default maximum out-degree per vertex.
pub const DEFAULT_MAX_DEGREE: usize = 40;

/// How a similarity score becomes an edge weight.
///
/// Path search minimizes the sum of weights, so the choice decides what a
/// "shortest" path means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeWeighting {
    /// `1 - score`: shortest paths follow the most similar words.
    #[default]
    Dissimilarity,
    /// The raw score: shortest paths minimize the summed similarity.
    Similarity,
}

impl EdgeWeighting {
    /// Edge weight for a similarity score.
    pub fn weight(self, score: f64) -> f64 {
        match self {
            EdgeWeighting::Dissimilarity => 1.0 - score,
            EdgeWeighting::Similarity => score,
        }
    }

    /// Get the weighting name.
    pub fn name(self) -> &'static str {
        match self {
            EdgeWeighting::Dissimilarity => "dissimilarity",
            EdgeWeighting::Similarity => "similarity",
        }
    }
}

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Target vertex id.
    pub target: usize,
    /// Non-negative weight.
    pub weight: f64,
}

/// Immutable directed graph over words.
#[derive(Debug, Clone, PartialEq)]
pub struct WordGraph {
    /// Vertex names, indexed by vertex id.
    vertices: Vec<String>,
    /// Word to vertex id.
    index: AHashMap<String, usize>,
    /// Outgoing edges, indexed by source vertex id.
    edges: Vec<Vec<Edge>>,
    /// Out-degree bound the graph was built with.
    max_degree: usize,
}

impl WordGraph {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Out-degree bound the graph was built with.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Check if a word is a vertex.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Vertex id of a word.
    pub fn vertex_id(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Word of a vertex id.
    pub fn word(&self, id: usize) -> Option<&str> {
        self.vertices.get(id).map(String::as_str)
    }

    /// All words, in vertex id order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(String::as_str)
    }

    /// Outgoing edges of a vertex id. Unknown ids have no edges.
    pub fn edges_from(&self, id: usize) -> &[Edge] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing (neighbor, weight) pairs of a word, strongest candidate first.
    pub fn neighbors(&self, word: &str) -> Option<Vec<(&str, f64)>> {
        let id = self.vertex_id(word)?;
        Some(
            self.edges_from(id)
                .iter()
                .map(|edge| (self.vertices[edge.target].as_str(), edge.weight))
                .collect(),
        )
    }

    /// Out-degree of a word.
    pub fn out_degree(&self, word: &str) -> Option<usize> {
        self.vertex_id(word).map(|id| self.edges_from(id).len())
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<f64> {
        let from = self.vertex_id(from)?;
        let to = self.vertex_id(to)?;
        self.edges_from(from)
            .iter()
            .find(|edge| edge.target == to)
            .map(|edge| edge.weight)
    }

    /// Check if the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Shortest path between two words.
    pub fn find_path(&self, start: &str, end: &str) -> Result<PathResult> {
        PathFinder::new(self).find(start, end)
    }

    /// Summary statistics.
    pub fn stats(&self) -> GraphStats {
        let mut in_degree = vec![0usize; self.vertices.len()];
        let mut asymmetric_edges = 0;

        for (source, edges) in self.edges.iter().enumerate() {
            for edge in edges {
                in_degree[edge.target] += 1;
                if !self.edges[edge.target].iter().any(|back| back.target == source) {
                    asymmetric_edges += 1;
                }
            }
        }

        let edge_count = self.edge_count();
        let isolated_vertices = self
            .edges
            .iter()
            .zip(&in_degree)
            .filter(|(edges, incoming)| edges.is_empty() && **incoming == 0)
            .count();

        GraphStats {
            vertex_count: self.vertices.len(),
            edge_count,
            max_degree: self.max_degree,
            max_out_degree: self.edges.iter().map(Vec::len).max().unwrap_or(0),
            average_out_degree: if self.vertices.is_empty() {
                0.0
            } else {
                edge_count as f64 / self.vertices.len() as f64
            },
            isolated_vertices,
            asymmetric_edges,
        }
    }
}

/// Summary statistics of a [`WordGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Configured out-degree bound.
    pub max_degree: usize,
    /// Largest observed out-degree.
    pub max_out_degree: usize,
    pub average_out_degree: f64,
    /// Vertices with neither outgoing nor incoming edges.
    pub isolated_vertices: usize,
    /// Edges `a -> b` without a matching `b -> a`.
    pub asymmetric_edges: usize,
}
