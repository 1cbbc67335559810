//! In-process graph store, used when no database is configured and by the tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::coord::CanonicalKey;
use super::store::{GraphStore, GraphTx, StorageResult};
use super::{EdgeSnapshot, EdgeStats, NewRoute, NodeId, RouteId, RouteRecord};
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
struct Graph {
    nodes: BTreeMap<NodeId, CanonicalKey>,
    node_index: HashMap<CanonicalKey, NodeId>,
    edges: BTreeMap<(NodeId, NodeId), EdgeStats>,
    routes: BTreeMap<RouteId, NewRoute>,
    route_way: BTreeMap<RouteId, BTreeMap<i32, NodeId>>,
    last_node_id: i64,
    last_route_id: i64,
}

/// Transactions are serialized: a [`MemoryTx`] holds the store lock for its
/// whole lifetime and works on a private copy of the graph.
#[derive(Clone, Default)]
pub struct MemoryStore {
    graph: Arc<Mutex<Graph>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Graph>,
    working: Graph,
}

#[async_trait]
impl GraphStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> StorageResult<MemoryTx> {
        let guard = self.graph.clone().lock_owned().await;
        let working = guard.clone();

        Ok(MemoryTx { guard, working })
    }

    async fn edges(&self) -> StorageResult<Vec<EdgeSnapshot>> {
        let graph = self.graph.lock().await;

        let edges = graph
            .edges
            .iter()
            .filter_map(|(&(start, end), stats)| {
                let start = graph.nodes.get(&start)?;
                let end = graph.nodes.get(&end)?;

                Some(EdgeSnapshot {
                    start_lat: start.latitude(),
                    start_lon: start.longitude(),
                    end_lat: end.latitude(),
                    end_lon: end.longitude(),
                    weight: stats.weight,
                    usage_count: stats.usage_count,
                })
            })
            .collect();

        Ok(edges)
    }

    async fn route(&self, id: RouteId) -> StorageResult<Option<RouteRecord>> {
        let graph = self.graph.lock().await;

        let Some(header) = graph.routes.get(&id) else {
            return Ok(None);
        };

        let path = graph
            .route_way
            .get(&id)
            .into_iter()
            .flat_map(|way| way.values())
            .filter_map(|node| graph.nodes.get(node))
            .map(|key| key.coord())
            .collect();

        Ok(Some(RouteRecord {
            id,
            start: header.start,
            end: header.end,
            rating: header.rating,
            path,
        }))
    }
}

#[async_trait]
impl GraphTx for MemoryTx {
    async fn insert_route(&mut self, route: &NewRoute) -> StorageResult<RouteId> {
        self.working.last_route_id += 1;
        let id = RouteId(self.working.last_route_id);
        self.working.routes.insert(id, *route);

        Ok(id)
    }

    async fn find_node(&mut self, key: CanonicalKey) -> StorageResult<Option<NodeId>> {
        Ok(self.working.node_index.get(&key).copied())
    }

    async fn insert_node(&mut self, key: CanonicalKey) -> StorageResult<NodeId> {
        if self.working.node_index.contains_key(&key) {
            return Err(StorageError::Conflict("node"));
        }

        self.working.last_node_id += 1;
        let id = NodeId(self.working.last_node_id);
        self.working.nodes.insert(id, key);
        self.working.node_index.insert(key, id);

        Ok(id)
    }

    async fn insert_route_way(
        &mut self,
        route: RouteId,
        node: NodeId,
        sequence: i32,
    ) -> StorageResult<()> {
        let way = self.working.route_way.entry(route).or_default();

        if way.contains_key(&sequence) || way.values().any(|&n| n == node) {
            return Err(StorageError::Conflict("route way entry"));
        }

        way.insert(sequence, node);

        Ok(())
    }

    async fn find_edge(&mut self, start: NodeId, end: NodeId) -> StorageResult<Option<EdgeStats>> {
        Ok(self.working.edges.get(&(start, end)).copied())
    }

    async fn insert_edge(&mut self, start: NodeId, end: NodeId, weight: f64) -> StorageResult<()> {
        if self.working.edges.contains_key(&(start, end)) {
            return Err(StorageError::Conflict("edge"));
        }

        self.working.edges.insert(
            (start, end),
            EdgeStats {
                weight,
                usage_count: 1,
            },
        );

        Ok(())
    }

    async fn update_edge(&mut self, start: NodeId, end: NodeId, delta: f64) -> StorageResult<()> {
        let edge = self
            .working
            .edges
            .get_mut(&(start, end))
            .ok_or(StorageError::MissingEdge(start.0, end.0))?;

        edge.weight += delta;
        edge.usage_count += 1;

        Ok(())
    }

    async fn commit(mut self) -> StorageResult<()> {
        *self.guard = self.working;

        Ok(())
    }
}
