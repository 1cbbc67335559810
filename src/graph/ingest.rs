//! Route ingestion: one route in, one transaction against the graph.

use std::collections::HashSet;
use std::sync::Arc;

use super::aggregator::EdgeAggregator;
use super::coord::{CanonicalKey, Coord};
use super::rating::{Rating, RatingTable, WeightPolicy};
use super::registry::NodeRegistry;
use super::store::{GraphStore, GraphTx};
use super::{NewRoute, NodeId, RouteId};
use crate::error::Result;

/// A traveled route as submitted by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSubmission {
    pub start: Coord,
    pub end: Coord,
    /// Raw rating; validated to `1..=5` by [`Ingestor::ingest`].
    pub rating: i64,
    pub path: Vec<Coord>,
}

impl RouteSubmission {
    fn validate(&self) -> Result<Rating> {
        let rating = Rating::new(self.rating)?;

        self.start.validate()?;
        self.end.validate()?;

        for coord in &self.path {
            coord.validate()?;
        }

        Ok(rating)
    }
}

pub struct Ingestor<S, P = RatingTable> {
    store: S,
    aggregator: Arc<EdgeAggregator<P>>,
}

impl<S: Clone, P> Clone for Ingestor<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<S: GraphStore> Ingestor<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, RatingTable)
    }
}

impl<S: GraphStore, P: WeightPolicy> Ingestor<S, P> {
    pub fn with_policy(store: S, policy: P) -> Self {
        Self {
            store,
            aggregator: Arc::new(EdgeAggregator::with_policy(policy)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records the route and folds it into the graph, all or nothing.
    ///
    /// Input is validated before the transaction starts. Consecutive path points
    /// with the same canonical key collapse into one node. If anything fails, or
    /// the returned future is dropped before completion, the transaction is rolled
    /// back and no route, node, route way or edge change is visible.
    pub async fn ingest(&self, submission: &RouteSubmission) -> Result<RouteId> {
        let rating = submission.validate()?;

        let mut tx = self.store.begin().await?;

        let route_id = tx
            .insert_route(&NewRoute {
                start: submission.start,
                end: submission.end,
                rating,
            })
            .await?;

        let traversal = record_path(&mut tx, route_id, &submission.path).await?;

        let applied = self
            .aggregator
            .apply_path(&mut tx, &traversal, rating)
            .await?;

        tx.commit().await?;

        log::debug!(
            "ingested route {} (rating {}, {} nodes, {} edge traversals)",
            route_id.0,
            rating.get(),
            traversal.len(),
            applied
        );

        Ok(route_id)
    }
}

/// Resolves every path point to a node and writes the route way.
///
/// Returns the traversal order with consecutive repeats removed. A node the
/// route revisits later appears again in the traversal but only once in the
/// route way, at its first position.
async fn record_path<T: GraphTx>(tx: &mut T, route_id: RouteId, path: &[Coord]) -> Result<Vec<NodeId>> {
    let mut registry = NodeRegistry::new();
    let mut traversal = Vec::with_capacity(path.len());
    let mut recorded = HashSet::with_capacity(path.len());
    let mut previous: Option<CanonicalKey> = None;
    let mut sequence = 0;

    for &coord in path {
        let key = coord.key();

        if previous == Some(key) {
            continue;
        }
        previous = Some(key);

        let node = registry.resolve_or_create(tx, coord).await?;

        if recorded.insert(node) {
            tx.insert_route_way(route_id, node, sequence).await?;
            sequence += 1;
        }

        traversal.push(node);
    }

    Ok(traversal)
}
