//! The shared route graph: deduplicated nodes, rated directed edges and the
//! routes that produced them.

pub mod aggregator;
pub mod coord;
pub mod ingest;
pub mod memory;
pub mod rating;
pub mod registry;
pub mod store;

use serde::{Deserialize, Serialize};

pub use aggregator::EdgeAggregator;
pub use coord::{CanonicalKey, Coord, normalize};
pub use ingest::{Ingestor, RouteSubmission};
pub use memory::MemoryStore;
pub use rating::{Rating, RatingTable, WeightPolicy};
pub use registry::NodeRegistry;
pub use store::{GraphStore, GraphTx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStats {
    pub weight: f64,
    pub usage_count: i64,
}

/// Route header as written at the start of an ingestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewRoute {
    pub start: Coord,
    pub end: Coord,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub id: RouteId,
    pub start: Coord,
    pub end: Coord,
    pub rating: Rating,
    /// Path nodes in route-way sequence order.
    pub path: Vec<Coord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub weight: f64,
    pub usage_count: i64,
}
