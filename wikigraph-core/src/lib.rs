pub mod analysis;
pub mod data;
pub mod error;
pub mod explore;
pub mod model;

pub use analysis::{AnalysisStrategy, ArticleGraph, DegreeCentrality, GraphAnalyzer};
pub use error::{ExploreError, Result};
pub use explore::{DEFAULT_CONCURRENCY, DEFAULT_MAX_NEIGHBORS, Explorer, SUPPORTED_DEPTH};
pub use model::{Exploration, ExplorationGraph, GraphEdge, GraphNode, NewExploration};
