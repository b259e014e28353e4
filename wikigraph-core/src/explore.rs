use crate::analysis::{DegreeCentrality, GraphAnalyzer};
use crate::error::{ExploreError, Result};
use crate::model::{ExplorationGraph, GraphEdge, GraphNode};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};
use wikigraph_fetch::{WikipediaClient, extract_links};

/// The only traversal depth the pipeline performs: the seed and its direct links.
pub const SUPPORTED_DEPTH: u32 = 1;

pub const DEFAULT_MAX_NEIGHBORS: usize = 15;

/// Neighbor summary requests allowed in flight per exploration.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Turns a seed article title into a scored one-hop link graph.
pub struct Explorer {
    client: Arc<WikipediaClient>,
    analyzer: GraphAnalyzer,
    max_neighbors: usize,
    concurrency: usize,
}

impl Explorer {
    pub fn new(client: Arc<WikipediaClient>) -> Self {
        Self {
            client,
            analyzer: GraphAnalyzer::new(DegreeCentrality),
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = max_neighbors;
        self
    }

    pub fn with_analyzer(mut self, analyzer: GraphAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Clamped to at least one request.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn client(&self) -> &WikipediaClient {
        &self.client
    }

    /// Explore `seed_title` one hop deep.
    ///
    /// Any `depth` other than [`SUPPORTED_DEPTH`] is rejected before the
    /// provider is contacted. Seed fetch errors propagate unchanged. At most
    /// `max_neighbors` candidate links are looked up; a candidate whose
    /// summary comes back empty gets neither a node nor an edge.
    pub async fn explore(&self, seed_title: &str, depth: u32) -> Result<ExplorationGraph> {
        if depth != SUPPORTED_DEPTH {
            return Err(ExploreError::UnsupportedDepth {
                requested: depth,
                supported: SUPPORTED_DEPTH,
            });
        }

        info!("Exploring {:?}", seed_title);

        let (html, root_title) = self.client.get_article_content(seed_title).await?;
        let root_summary = self.client.get_article_summary(&root_title).await?;

        let candidates: Vec<String> = extract_links(&html, &root_title)
            .into_iter()
            .take(self.max_neighbors)
            .collect();
        debug!(
            "{} candidate neighbors for {:?} (cap {})",
            candidates.len(),
            root_title,
            self.max_neighbors
        );

        // At most `concurrency` in flight; results stay in candidate order.
        let lookups: Vec<_> = candidates
            .iter()
            .map(|title| self.client.get_article_summary(title))
            .collect();
        let summaries: Vec<String> = stream::iter(lookups)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut nodes = vec![GraphNode::new(root_title.clone(), root_summary)];
        let mut edges = Vec::new();

        for (title, summary) in candidates.into_iter().zip(summaries) {
            match usable_summary(summary) {
                Some(summary) => {
                    edges.push(GraphEdge::new(root_title.clone(), title.clone()));
                    nodes.push(GraphNode::new(title, summary));
                }
                None => debug!("Skipping {:?}: no summary", title),
            }
        }

        let nodes = self.analyzer.analyze_and_annotate(nodes, &edges);

        info!(
            "Explored {:?}: {} nodes, {} edges",
            root_title,
            nodes.len(),
            edges.len()
        );

        Ok(ExplorationGraph { nodes, edges })
    }
}

fn usable_summary(summary: String) -> Option<String> {
    if summary.is_empty() { None } else { Some(summary) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_summary() {
        assert_eq!(usable_summary(String::new()), None);
        assert_eq!(usable_summary("text".to_string()), Some("text".to_string()));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let client = WikipediaClient::new("http://127.0.0.1:9/w/api.php").unwrap();
        let explorer = Explorer::new(Arc::new(client)).with_concurrency(0);
        assert_eq!(explorer.concurrency, 1);
    }

    #[tokio::test]
    async fn test_unsupported_depth_is_rejected_up_front() {
        // Nothing listens here; any fetch would fail with ServiceUnavailable.
        let client = WikipediaClient::new("http://127.0.0.1:9/w/api.php").unwrap();
        let explorer = Explorer::new(Arc::new(client));

        for depth in [0, 2, 5] {
            let err = explorer.explore("Python", depth).await.unwrap_err();
            assert!(matches!(
                err,
                ExploreError::UnsupportedDepth { requested, supported: 1 } if requested == depth
            ));
        }
    }
}
