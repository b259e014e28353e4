//! Structural scoring of exploration graphs.
//!
//! [`GraphAnalyzer`] turns flat node and edge lists into an [`ArticleGraph`],
//! hands it to whichever [`AnalysisStrategy`] it was built with, and writes the
//! resulting scores back onto the nodes.

use crate::model::{GraphEdge, GraphNode};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed article graph keyed by title. Repeated edges collapse into one arc.
#[derive(Debug, Default)]
pub struct ArticleGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ArticleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add an arc, creating either endpoint if it is not yet a vertex.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.add_node(from);
        let b = self.add_node(to);
        self.graph.update_edge(a, b, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.degree(id, Direction::Incoming)
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.degree(id, Direction::Outgoing)
    }

    fn degree(&self, id: &str, direction: Direction) -> usize {
        self.index
            .get(id)
            .map(|&idx| self.graph.edges_directed(idx, direction).count())
            .unwrap_or(0)
    }
}

/// A scoring algorithm over an [`ArticleGraph`].
///
/// Closures with the matching signature are strategies too.
pub trait AnalysisStrategy: Send + Sync {
    fn analyze(&self, graph: &ArticleGraph) -> HashMap<String, f64>;
}

impl<F> AnalysisStrategy for F
where
    F: Fn(&ArticleGraph) -> HashMap<String, f64> + Send + Sync,
{
    fn analyze(&self, graph: &ArticleGraph) -> HashMap<String, f64> {
        self(graph)
    }
}

/// Normalized directed degree centrality: `(in + out) / (N - 1)`.
/// Graphs with fewer than two vertices score every vertex `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeCentrality;

impl AnalysisStrategy for DegreeCentrality {
    fn analyze(&self, graph: &ArticleGraph) -> HashMap<String, f64> {
        let n = graph.node_count();
        graph
            .node_ids()
            .map(|id| {
                let score = if n < 2 {
                    0.0
                } else {
                    (graph.in_degree(id) + graph.out_degree(id)) as f64 / (n - 1) as f64
                };
                (id.to_string(), score)
            })
            .collect()
    }
}

pub struct GraphAnalyzer {
    strategy: Box<dyn AnalysisStrategy>,
}

impl GraphAnalyzer {
    pub fn new(strategy: impl AnalysisStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Score `nodes` against the graph they form with `edges`.
    ///
    /// Every node becomes a vertex, isolated ones included. Nodes come back in
    /// input order; a node the strategy did not score gets `0.0`.
    pub fn analyze_and_annotate(&self, nodes: Vec<GraphNode>, edges: &[GraphEdge]) -> Vec<GraphNode> {
        let mut graph = ArticleGraph::new();
        for node in &nodes {
            graph.add_node(&node.id);
        }
        for edge in edges {
            graph.add_edge(&edge.from, &edge.to);
        }

        let scores = self.strategy.analyze(&graph);

        nodes
            .into_iter()
            .map(|mut node| {
                node.score = Some(scores.get(&node.id).copied().unwrap_or(0.0));
                node
            })
            .collect()
    }
}

impl Default for GraphAnalyzer {
    fn default() -> Self {
        Self::new(DegreeCentrality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter().map(|id| GraphNode::new(*id, "")).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs.iter().map(|(a, b)| GraphEdge::new(*a, *b)).collect()
    }

    #[test]
    fn test_degree_centrality_reference_graph() {
        let analyzer = GraphAnalyzer::default();
        let scored = analyzer.analyze_and_annotate(
            nodes(&["A", "B", "C", "D"]),
            &edges(&[("A", "B"), ("A", "C"), ("B", "C"), ("C", "D")]),
        );

        let score = |id: &str| scored.iter().find(|n| n.id == id).unwrap().score.unwrap();
        assert!(approx(score("A"), 2.0 / 3.0));
        assert!(approx(score("B"), 2.0 / 3.0));
        assert!(approx(score("C"), 1.0));
        assert!(approx(score("D"), 1.0 / 3.0));
    }

    #[test]
    fn test_star_graph() {
        let analyzer = GraphAnalyzer::default();
        let scored = analyzer.analyze_and_annotate(
            nodes(&["Root", "X", "Y"]),
            &edges(&[("Root", "X"), ("Root", "Y")]),
        );
        assert!(approx(scored[0].score.unwrap(), 1.0));
        assert!(approx(scored[1].score.unwrap(), 0.5));
        assert!(approx(scored[2].score.unwrap(), 0.5));
    }

    #[test]
    fn test_isolated_nodes_are_vertices() {
        let analyzer = GraphAnalyzer::default();
        let scored = analyzer.analyze_and_annotate(nodes(&["A", "B", "C"]), &edges(&[("A", "B")]));
        // N = 3 even though C has no arcs.
        assert!(approx(scored[0].score.unwrap(), 0.5));
        assert!(approx(scored[2].score.unwrap(), 0.0));
    }

    #[test]
    fn test_single_node_scores_zero() {
        let analyzer = GraphAnalyzer::default();
        let scored = analyzer.analyze_and_annotate(nodes(&["Alone"]), &[]);
        assert_eq!(scored[0].score, Some(0.0));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = ArticleGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("A", "B");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.out_degree("A"), 1);
    }

    #[test]
    fn test_missing_scores_default_to_zero() {
        let analyzer = GraphAnalyzer::new(|_: &ArticleGraph| -> HashMap<String, f64> { HashMap::new() });
        let scored = analyzer.analyze_and_annotate(nodes(&["A", "B"]), &edges(&[("A", "B")]));
        assert_eq!(scored.len(), 2);
        assert!(scored.iter().all(|n| n.score == Some(0.0)));
    }

    #[test]
    fn test_order_preserved_and_edges_untouched() {
        let analyzer = GraphAnalyzer::new(|graph: &ArticleGraph| -> HashMap<String, f64> {
            graph.node_ids().map(|id| (id.to_string(), id.len() as f64)).collect()
        });
        let input_edges = edges(&[("Zeta", "Al")]);
        let scored = analyzer.analyze_and_annotate(nodes(&["Zeta", "Al", "Mid"]), &input_edges);
        let ids: Vec<&str> = scored.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Zeta", "Al", "Mid"]);
        assert_eq!(scored[0].score, Some(4.0));
        assert_eq!(input_edges, edges(&[("Zeta", "Al")]));
    }
}
