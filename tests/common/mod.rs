#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fix_my_lane::error::StorageError;
use fix_my_lane::graph::coord::CanonicalKey;
use fix_my_lane::graph::memory::MemoryTx;
use fix_my_lane::graph::store::StorageResult;
use fix_my_lane::graph::{
    Coord, EdgeSnapshot, EdgeStats, GraphStore, GraphTx, MemoryStore, NewRoute, NodeId, RouteId,
    RouteRecord, RouteSubmission,
};

pub fn route(rating: i64, path: &[(f64, f64)]) -> RouteSubmission {
    RouteSubmission {
        start: Coord::new(52.49, 13.40),
        end: Coord::new(52.51, 13.44),
        rating,
        path: path.iter().map(|&(lat, lon)| Coord::new(lat, lon)).collect(),
    }
}

pub fn edge_between(edges: &[EdgeSnapshot], from: (f64, f64), to: (f64, f64)) -> Option<EdgeSnapshot> {
    edges
        .iter()
        .find(|e| (e.start_lat, e.start_lon) == from && (e.end_lat, e.end_lon) == to)
        .copied()
}

/// How a wrapped transaction misbehaves.
#[derive(Clone, Copy)]
pub enum Fault {
    /// The n-th edge write (insert or update, counted from 1) fails.
    FailEdgeWrite(usize),
    /// Every node and edge insert finds that a concurrent writer created the row
    /// first; the rival edge carries the given weight.
    Race { rival_weight: f64 },
}

/// A [`MemoryStore`] whose transactions inject a [`Fault`].
#[derive(Clone)]
pub struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
    edge_writes: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            edge_writes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub struct FaultyTx {
    inner: MemoryTx,
    fault: Fault,
    edge_writes: Arc<AtomicUsize>,
}

impl FaultyTx {
    fn edge_write(&self) -> StorageResult<()> {
        let n = self.edge_writes.fetch_add(1, Ordering::SeqCst) + 1;

        match self.fault {
            Fault::FailEdgeWrite(at) if n == at => Err(StorageError::Database(sqlx::Error::PoolTimedOut)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl GraphStore for FaultyStore {
    type Tx = FaultyTx;

    async fn begin(&self) -> StorageResult<FaultyTx> {
        Ok(FaultyTx {
            inner: self.inner.begin().await?,
            fault: self.fault,
            edge_writes: self.edge_writes.clone(),
        })
    }

    async fn edges(&self) -> StorageResult<Vec<EdgeSnapshot>> {
        self.inner.edges().await
    }

    async fn route(&self, id: RouteId) -> StorageResult<Option<RouteRecord>> {
        self.inner.route(id).await
    }
}

#[async_trait]
impl GraphTx for FaultyTx {
    async fn insert_route(&mut self, route: &NewRoute) -> StorageResult<RouteId> {
        self.inner.insert_route(route).await
    }

    async fn find_node(&mut self, key: CanonicalKey) -> StorageResult<Option<NodeId>> {
        self.inner.find_node(key).await
    }

    async fn insert_node(&mut self, key: CanonicalKey) -> StorageResult<NodeId> {
        let id = self.inner.insert_node(key).await?;

        match self.fault {
            Fault::Race { .. } => Err(StorageError::Conflict("node")),
            _ => Ok(id),
        }
    }

    async fn insert_route_way(&mut self, route: RouteId, node: NodeId, sequence: i32) -> StorageResult<()> {
        self.inner.insert_route_way(route, node, sequence).await
    }

    async fn find_edge(&mut self, start: NodeId, end: NodeId) -> StorageResult<Option<EdgeStats>> {
        self.inner.find_edge(start, end).await
    }

    async fn insert_edge(&mut self, start: NodeId, end: NodeId, weight: f64) -> StorageResult<()> {
        self.edge_write()?;

        match self.fault {
            Fault::Race { rival_weight } => {
                self.inner.insert_edge(start, end, rival_weight).await?;
                Err(StorageError::Conflict("edge"))
            }
            _ => self.inner.insert_edge(start, end, weight).await,
        }
    }

    async fn update_edge(&mut self, start: NodeId, end: NodeId, delta: f64) -> StorageResult<()> {
        self.edge_write()?;
        self.inner.update_edge(start, end, delta).await
    }

    async fn commit(self) -> StorageResult<()> {
        self.inner.commit().await
    }
}
