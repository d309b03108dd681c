//! Shortest-path search over a [`WordGraph`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::error::{LexipathError, Result};
use crate::graph::WordGraph;

/// Outcome of a path query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Words from start to end, inclusive. Empty when unreachable.
    pub path: Vec<String>,
    /// Sum of edge weights along the path. Infinite when unreachable.
    pub cost: f64,
}

impl PathResult {
    /// The result for a destination that cannot be reached.
    pub fn unreachable() -> Self {
        PathResult {
            path: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    /// Whether a path was found.
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of edges along the path.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Frontier entry ordered so that `BinaryHeap` pops the smallest distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrontierEntry {
    distance: f64,
    vertex: usize,
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Per-query search state.
struct SearchState {
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    visited: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
}

impl SearchState {
    fn new(vertex_count: usize, start: usize) -> Self {
        let mut distances = vec![f64::INFINITY; vertex_count];
        distances[start] = 0.0;

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            distance: 0.0,
            vertex: start,
        });

        SearchState {
            distances,
            predecessors: vec![None; vertex_count],
            visited: vec![false; vertex_count],
            frontier,
        }
    }
}

/// Dijkstra search over a borrowed graph. The graph is never modified.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a WordGraph,
}

impl<'a> PathFinder<'a> {
    /// Create a path finder for the given graph.
    pub fn new(graph: &'a WordGraph) -> Self {
        PathFinder { graph }
    }

    /// Find the cheapest path from `start` to `end`.
    ///
    /// Fails with `UnknownWord` if either word is not a vertex, checking
    /// `start` first. When several paths share the minimum cost, which one is
    /// returned depends on frontier order.
    pub fn find(&self, start: &str, end: &str) -> Result<PathResult> {
        let source = self
            .graph
            .vertex_id(start)
            .ok_or_else(|| LexipathError::unknown_word(start))?;
        let target = self
            .graph
            .vertex_id(end)
            .ok_or_else(|| LexipathError::unknown_word(end))?;

        let mut state = SearchState::new(self.graph.vertex_count(), source);

        while let Some(FrontierEntry { distance, vertex }) = state.frontier.pop() {
            if state.visited[vertex] {
                continue;
            }
            state.visited[vertex] = true;

            // Weights are non-negative, so the first pop of the target is final
            if vertex == target {
                break;
            }

            for edge in self.graph.edges_from(vertex) {
                if state.visited[edge.target] {
                    continue;
                }

                let candidate = distance + edge.weight;
                if candidate < state.distances[edge.target] {
                    state.distances[edge.target] = candidate;
                    state.predecessors[edge.target] = Some(vertex);
                    state.frontier.push(FrontierEntry {
                        distance: candidate,
                        vertex: edge.target,
                    });
                }
            }
        }

        if state.distances[target].is_infinite() {
            log::debug!("No path from '{start}' to '{end}'");
            return Ok(PathResult::unreachable());
        }

        Ok(PathResult {
            path: self.reconstruct(&state.predecessors, source, target),
            cost: state.distances[target],
        })
    }

    /// Walk predecessor links back from `target` to `source`.
    fn reconstruct(&self, predecessors: &[Option<usize>], source: usize, target: usize) -> Vec<String> {
        let mut ids = vec![target];
        let mut current = target;

        while current != source {
            match predecessors[current] {
                Some(previous) => {
                    ids.push(previous);
                    current = previous;
                }
                None => break,
            }
        }

        ids.iter()
            .rev()
            .filter_map(|&id| self.graph.word(id).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WordGraphBuilder;

    fn triangle() -> WordGraph {
        let mut builder = WordGraphBuilder::new(4);
        for word in ["A", "B", "C", "D"] {
            builder.add_vertex(word);
        }
        builder.add_edge("A", "B", 2.0).unwrap();
        builder.add_edge("B", "C", 3.0).unwrap();
        builder.add_edge("A", "C", 10.0).unwrap();
        builder.build()
    }

    #[test]
    fn test_shortest_path_prefers_cheaper_detour() {
        let graph = triangle();
        let result = PathFinder::new(&graph).find("A", "C").unwrap();

        assert_eq!(result.path, vec!["A", "B", "C"]);
        assert!((result.cost - 5.0).abs() < 1e-12);
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn test_isolated_vertex_is_unreachable() {
        let graph = triangle();
        let result = PathFinder::new(&graph).find("A", "D").unwrap();

        assert!(!result.is_reachable());
        assert!(result.path.is_empty());
        assert!(result.cost.is_infinite());
        assert_eq!(result, PathResult::unreachable());
    }

    #[test]
    fn test_edges_are_directed() {
        let graph = triangle();
        let result = PathFinder::new(&graph).find("C", "A").unwrap();
        assert!(!result.is_reachable());
    }

    #[test]
    fn test_unknown_words() {
        let graph = triangle();
        let before = graph.clone();
        let finder = PathFinder::new(&graph);

        match finder.find("Z", "A") {
            Err(LexipathError::UnknownWord(word)) => assert_eq!(word, "Z"),
            other => panic!("Expected UnknownWord, got {other:?}"),
        }
        match finder.find("A", "Y") {
            Err(LexipathError::UnknownWord(word)) => assert_eq!(word, "Y"),
            other => panic!("Expected UnknownWord, got {other:?}"),
        }

        assert_eq!(graph, before);
    }

    #[test]
    fn test_start_equals_end() {
        let graph = triangle();
        let result = PathFinder::new(&graph).find("B", "B").unwrap();

        assert_eq!(result.path, vec!["B"]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_tied_paths_report_minimum_cost() {
        let mut builder = WordGraphBuilder::new(4);
        for word in ["s", "l", "r", "t"] {
            builder.add_vertex(word);
        }
        builder.add_edge("s", "l", 1.0).unwrap();
        builder.add_edge("s", "r", 1.0).unwrap();
        builder.add_edge("l", "t", 1.0).unwrap();
        builder.add_edge("r", "t", 1.0).unwrap();
        let graph = builder.build();

        let result = graph.find_path("s", "t").unwrap();
        assert!((result.cost - 2.0).abs() < 1e-12);
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.path.first().map(String::as_str), Some("s"));
        assert_eq!(result.path.last().map(String::as_str), Some("t"));
    }

    #[test]
    fn test_zero_weight_edges() {
        let mut builder = WordGraphBuilder::new(4);
        for word in ["a", "b", "c"] {
            builder.add_vertex(word);
        }
        builder.add_edge("a", "b", 0.0).unwrap();
        builder.add_edge("b", "c", 0.0).unwrap();
        builder.add_edge("a", "c", 0.5).unwrap();
        let graph = builder.build();

        let result = graph.find_path("a", "c").unwrap();
        assert_eq!(result.path, vec!["a", "b", "c"]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_concurrent_queries_share_graph() {
        let graph = triangle();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| graph.find_path("A", "C").unwrap()))
                .collect();

            for handle in handles {
                let result = handle.join().unwrap();
                assert!((result.cost - 5.0).abs() < 1e-12);
            }
        });
    }
}
