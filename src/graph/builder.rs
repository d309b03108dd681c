//! Graph construction.

use ahash::AHashMap;

use crate::error::{LexipathError, Result};
use crate::graph::{Edge, EdgeWeighting, WordGraph};
use crate::similarity::CandidateMap;

/// Mutable staging area for a [`WordGraph`].
///
/// Edges whose endpoints are not vertices are dropped without error, as are
/// self-loops, duplicate edges and edges beyond the out-degree bound.
#[derive(Debug, Clone)]
pub struct WordGraphBuilder {
    vertices: Vec<String>,
    index: AHashMap<String, usize>,
    edges: Vec<Vec<Edge>>,
    max_degree: usize,
}

impl WordGraphBuilder {
    /// Create a builder enforcing the given out-degree bound.
    pub fn new(max_degree: usize) -> Self {
        WordGraphBuilder {
            vertices: Vec::new(),
            index: AHashMap::new(),
            edges: Vec::new(),
            max_degree,
        }
    }

    /// Add a vertex and return its id. Adding an existing word is a no-op.
    pub fn add_vertex<S: Into<String>>(&mut self, word: S) -> usize {
        let word = word.into();
        if let Some(&id) = self.index.get(&word) {
            return id;
        }

        let id = self.vertices.len();
        self.index.insert(word.clone(), id);
        self.vertices.push(word);
        self.edges.push(Vec::new());
        id
    }

    /// Check if a word is a vertex.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Current out-degree of a word.
    pub fn out_degree(&self, word: &str) -> Option<usize> {
        self.index.get(word).map(|&id| self.edges[id].len())
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns whether the edge was added. Negative or NaN weights are
    /// rejected with `InvalidInput`.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) -> Result<bool> {
        if weight.is_nan() || weight < 0.0 {
            return Err(LexipathError::invalid_input(format!(
                "edge {from} -> {to} has invalid weight {weight}"
            )));
        }

        let (Some(&source), Some(&target)) = (self.index.get(from), self.index.get(to)) else {
            return Ok(false);
        };
        if source == target {
            return Ok(false);
        }

        let edges = &mut self.edges[source];
        if edges.len() >= self.max_degree || edges.iter().any(|e| e.target == target) {
            return Ok(false);
        }

        edges.push(Edge { target, weight });
        Ok(true)
    }

    /// Freeze the graph.
    pub fn build(self) -> WordGraph {
        WordGraph {
            vertices: self.vertices,
            index: self.index,
            edges: self.edges,
            max_degree: self.max_degree,
        }
    }
}

/// Builds a [`WordGraph`] from sorted candidate lists.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    max_degree: usize,
    weighting: EdgeWeighting,
}

impl GraphBuilder {
    /// Create a builder keeping at most `max_degree` edges per vertex.
    pub fn new(max_degree: usize) -> Self {
        GraphBuilder {
            max_degree,
            weighting: EdgeWeighting::default(),
        }
    }

    /// Set how scores become edge weights.
    pub fn with_weighting(mut self, weighting: EdgeWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Get the out-degree bound.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Get the edge weighting.
    pub fn weighting(&self) -> EdgeWeighting {
        self.weighting
    }

    /// Build the graph.
    ///
    /// Every key of `candidates` becomes a vertex. Each vertex then links to
    /// its strongest candidates, in list order, until the bound is reached.
    /// Lists must be sorted by descending score, as
    /// [`CandidateMap::sort_descending`] leaves them. Equal scores may come in
    /// any word order; the cap then keeps whichever comes first.
    pub fn build(&self, candidates: &CandidateMap) -> Result<WordGraph> {
        if !candidates.is_sorted_descending() {
            return Err(LexipathError::invalid_input(
                "candidate lists must be sorted by descending score before building",
            ));
        }

        let mut builder = WordGraphBuilder::new(self.max_degree);
        for word in candidates.words() {
            builder.add_vertex(word);
        }

        let mut dropped = 0usize;
        for (word, list) in candidates.iter() {
            let mut added = 0;
            for candidate in list {
                if added >= self.max_degree {
                    break;
                }
                if builder.add_edge(word, &candidate.word, self.weighting.weight(candidate.score))? {
                    added += 1;
                } else if !builder.contains(&candidate.word) {
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            log::debug!("Skipped {dropped} candidates without a matching vertex");
        }

        let graph = builder.build();
        log::info!(
            "Built graph with {} vertices and {} edges (max degree {}, {} weights)",
            graph.vertex_count(),
            graph.edge_count(),
            self.max_degree,
            self.weighting.name()
        );

        Ok(graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder::new(crate::graph::DEFAULT_MAX_DEGREE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::CandidateEdge;

    fn sorted(lists: Vec<(&str, Vec<(&str, f64)>)>) -> CandidateMap {
        let mut map = CandidateMap::from_lists(lists.into_iter().map(|(word, list)| {
            (
                word,
                list.into_iter()
                    .map(|(w, s)| CandidateEdge::new(w, s))
                    .collect(),
            )
        }));
        map.sort_descending();
        map
    }

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut builder = WordGraphBuilder::new(3);
        let first = builder.add_vertex("cat");
        let second = builder.add_vertex("cat");

        assert_eq!(first, second);
        assert_eq!(builder.build().vertex_count(), 1);
    }

    #[test]
    fn test_add_edge_policies() {
        let mut builder = WordGraphBuilder::new(1);
        builder.add_vertex("a");
        builder.add_vertex("b");
        builder.add_vertex("c");

        assert!(!builder.add_edge("a", "missing", 1.0).unwrap());
        assert!(!builder.add_edge("missing", "a", 1.0).unwrap());
        assert!(!builder.add_edge("a", "a", 1.0).unwrap());
        assert!(builder.add_edge("a", "b", 1.0).unwrap());
        assert!(!builder.add_edge("a", "b", 1.0).unwrap());
        // Bound of one is reached
        assert!(!builder.add_edge("a", "c", 1.0).unwrap());

        assert!(builder.add_edge("b", "c", -0.5).is_err());
        assert!(builder.add_edge("b", "c", f64::NAN).is_err());
    }

    #[test]
    fn test_degree_cap_keeps_strongest() {
        let candidates = sorted(vec![
            ("cat", vec![("cot", 0.67), ("cart", 0.75), ("at", 0.67), ("chat", 0.75)]),
            ("cot", vec![("cat", 0.67)]),
            ("cart", vec![("cat", 0.75)]),
            ("at", vec![("cat", 0.67)]),
            ("chat", vec![("cat", 0.75)]),
        ]);

        let graph = GraphBuilder::new(2).build(&candidates).unwrap();

        assert_eq!(graph.out_degree("cat"), Some(2));
        assert!(graph.has_edge("cat", "cart"));
        assert!(graph.has_edge("cat", "chat"));
        assert!(!graph.has_edge("cat", "cot"));
        for word in graph.words() {
            assert!(graph.out_degree(word).unwrap() <= 2);
        }
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let candidates = sorted(vec![
            ("dog", vec![("ghost", 0.9), ("dot", 0.67)]),
            ("dot", vec![("dog", 0.67)]),
        ]);

        let graph = GraphBuilder::new(1).build(&candidates).unwrap();

        assert_eq!(graph.vertex_count(), 2);
        assert!(!graph.contains("ghost"));
        // The skipped candidate does not use up the bound
        assert!(graph.has_edge("dog", "dot"));
    }

    #[test]
    fn test_asymmetry_after_capping() {
        // x keeps y, but y's single slot goes to the stronger z
        let candidates = sorted(vec![
            ("x", vec![("y", 0.6)]),
            ("y", vec![("x", 0.6), ("z", 0.9)]),
            ("z", vec![("y", 0.9)]),
        ]);

        let graph = GraphBuilder::new(1).build(&candidates).unwrap();

        assert!(graph.has_edge("x", "y"));
        assert!(!graph.has_edge("y", "x"));
        assert!(graph.has_edge("y", "z"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let candidates = sorted(vec![
            ("bake", vec![("cake", 0.75), ("bike", 0.75), ("lake", 0.75)]),
            ("cake", vec![("bake", 0.75), ("lake", 0.75)]),
            ("lake", vec![("bake", 0.75), ("cake", 0.75)]),
            ("bike", vec![("bake", 0.75)]),
        ]);

        let builder = GraphBuilder::new(2);
        let first = builder.build(&candidates).unwrap();
        let second = builder.build(&candidates).unwrap();

        assert_eq!(first, second);
        assert!(first.has_edge("bake", "bike"));
        assert!(first.has_edge("bake", "cake"));
        assert!(!first.has_edge("bake", "lake"));
    }

    #[test]
    fn test_weights_follow_weighting() {
        let candidates = sorted(vec![("cat", vec![("cart", 0.75)]), ("cart", vec![("cat", 0.75)])]);

        let graph = GraphBuilder::new(5).build(&candidates).unwrap();
        assert!((graph.edge_weight("cat", "cart").unwrap() - 0.25).abs() < 1e-12);

        let graph = GraphBuilder::new(5)
            .with_weighting(EdgeWeighting::Similarity)
            .build(&candidates)
            .unwrap();
        assert!((graph.edge_weight("cat", "cart").unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_tie_in_reverse_word_order_builds() {
        let candidates = CandidateMap::from_lists([
            (
                "cat",
                vec![CandidateEdge::new("cot", 0.67), CandidateEdge::new("bat", 0.67)],
            ),
            ("bat", vec![]),
            ("cot", vec![]),
        ]);

        let graph = GraphBuilder::new(1).build(&candidates).unwrap();
        assert!(graph.has_edge("cat", "cot"));
        assert!(!graph.has_edge("cat", "bat"));
    }

    #[test]
    fn test_rejects_unsorted_input() {
        let candidates = CandidateMap::from_lists([(
            "cat",
            vec![CandidateEdge::new("cot", 0.5), CandidateEdge::new("cart", 0.75)],
        )]);

        assert!(matches!(
            GraphBuilder::new(2).build(&candidates),
            Err(LexipathError::InvalidInput(_))
        ));
    }
}
