//! Storage seam for the route graph.
//!
//! A [`GraphStore`] hands out one [`GraphTx`] per ingestion. Everything written
//! through a transaction becomes visible only after [`GraphTx::commit`];
//! dropping the transaction without committing discards it.

use async_trait::async_trait;

use super::coord::CanonicalKey;
use super::{EdgeSnapshot, EdgeStats, NewRoute, NodeId, RouteId, RouteRecord};
use crate::error::StorageError;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait GraphStore: Clone + Send + Sync + 'static {
    type Tx: GraphTx;

    async fn begin(&self) -> StorageResult<Self::Tx>;

    /// Every edge with the coordinates of both endpoints.
    async fn edges(&self) -> StorageResult<Vec<EdgeSnapshot>>;

    async fn route(&self, id: RouteId) -> StorageResult<Option<RouteRecord>>;
}

#[async_trait]
pub trait GraphTx: Send {
    async fn insert_route(&mut self, route: &NewRoute) -> StorageResult<RouteId>;

    async fn find_node(&mut self, key: CanonicalKey) -> StorageResult<Option<NodeId>>;

    /// Fails with [`StorageError::Conflict`] when a node with this key already exists.
    async fn insert_node(&mut self, key: CanonicalKey) -> StorageResult<NodeId>;

    async fn insert_route_way(
        &mut self,
        route: RouteId,
        node: NodeId,
        sequence: i32,
    ) -> StorageResult<()>;

    async fn find_edge(&mut self, start: NodeId, end: NodeId) -> StorageResult<Option<EdgeStats>>;

    /// Fails with [`StorageError::Conflict`] when the edge already exists.
    async fn insert_edge(&mut self, start: NodeId, end: NodeId, weight: f64) -> StorageResult<()>;

    /// Adds `delta` to the weight and bumps the usage count by one.
    async fn update_edge(&mut self, start: NodeId, end: NodeId, delta: f64) -> StorageResult<()>;

    async fn commit(self) -> StorageResult<()>;
}
