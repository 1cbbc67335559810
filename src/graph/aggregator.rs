use super::NodeId;
use super::rating::{Rating, RatingTable, WeightPolicy};
use super::store::GraphTx;
use crate::error::{Error, Result, StorageError};

/// Folds route traversals into directed edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeAggregator<P = RatingTable> {
    policy: P,
}

impl EdgeAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: WeightPolicy> EdgeAggregator<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Creates the `start -> end` edge with the rating's adjustment, or adds the
    /// adjustment to the existing edge and bumps its usage count.
    ///
    /// An insert that loses a race against a concurrent first traversal is retried
    /// once as an update, so both deltas land.
    pub async fn apply_traversal<T: GraphTx>(
        &self,
        tx: &mut T,
        start: NodeId,
        end: NodeId,
        rating: Rating,
    ) -> Result<()> {
        if start == end {
            return Err(Error::invalid(format!("self-loop on node {}", start.0)));
        }

        let delta = self.policy.adjustment(rating);

        if tx.find_edge(start, end).await?.is_some() {
            tx.update_edge(start, end, delta).await?;
            return Ok(());
        }

        match tx.insert_edge(start, end, delta).await {
            Ok(()) => Ok(()),
            Err(StorageError::Conflict(_)) => {
                log::warn!(
                    "edge {} -> {} created concurrently, applying as update",
                    start.0,
                    end.0
                );
                tx.update_edge(start, end, delta).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies one traversal per consecutive pair of `path`, in order, and
    /// returns how many were applied.
    pub async fn apply_path<T: GraphTx>(
        &self,
        tx: &mut T,
        path: &[NodeId],
        rating: Rating,
    ) -> Result<usize> {
        for pair in path.windows(2) {
            self.apply_traversal(tx, pair[0], pair[1], rating).await?;
        }

        Ok(path.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::coord::normalize;
    use crate::graph::memory::MemoryStore;
    use crate::graph::store::GraphStore;

    async fn two_nodes<T: GraphTx>(tx: &mut T) -> (NodeId, NodeId) {
        let a = tx.insert_node(normalize(52.5, 13.40)).await.unwrap();
        let b = tx.insert_node(normalize(52.5, 13.41)).await.unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn first_traversal_creates_edge_with_adjustment() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (a, b) = two_nodes(&mut tx).await;

        EdgeAggregator::new()
            .apply_traversal(&mut tx, a, b, Rating::new(1).unwrap())
            .await
            .unwrap();

        let edge = tx.find_edge(a, b).await.unwrap().unwrap();
        assert_eq!(edge.weight, -2.0);
        assert_eq!(edge.usage_count, 1);
        assert!(tx.find_edge(b, a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn later_traversals_accumulate() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (a, b) = two_nodes(&mut tx).await;
        let aggregator = EdgeAggregator::new();

        for rating in [5, 4, 1] {
            aggregator
                .apply_traversal(&mut tx, a, b, Rating::new(rating).unwrap())
                .await
                .unwrap();
        }

        let edge = tx.find_edge(a, b).await.unwrap().unwrap();
        assert_eq!(edge.weight, 1.0);
        assert_eq!(edge.usage_count, 3);
    }

    #[tokio::test]
    async fn self_loop_is_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (a, _) = two_nodes(&mut tx).await;

        let result = EdgeAggregator::new()
            .apply_traversal(&mut tx, a, a, Rating::new(3).unwrap())
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(tx.find_edge(a, a).await.unwrap().is_none());
    }

    struct Doubled;

    impl WeightPolicy for Doubled {
        fn adjustment(&self, rating: Rating) -> f64 {
            RatingTable.adjustment(rating) * 2.0
        }
    }

    #[tokio::test]
    async fn policy_is_pluggable() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (a, b) = two_nodes(&mut tx).await;

        let applied = EdgeAggregator::with_policy(Doubled)
            .apply_path(&mut tx, &[a, b], Rating::new(4).unwrap())
            .await
            .unwrap();

        assert_eq!(applied, 1);
        assert_eq!(tx.find_edge(a, b).await.unwrap().unwrap().weight, 2.0);
    }
}
