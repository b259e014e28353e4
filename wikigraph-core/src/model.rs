use serde::{Deserialize, Serialize};

/// An article in an exploration graph. `id` and `label` both carry the
/// article title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Structural score, absent until the graph has been analyzed.
    #[serde(rename = "degree_centrality", alias = "score", default)]
    pub score: Option<f64>,
}

impl GraphNode {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            label: title.clone(),
            id: title,
            summary: Some(summary.into()),
            score: None,
        }
    }
}

/// A directed link from one article to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Request body for persisting a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExploration {
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A named, persisted exploration graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub id: String,
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
