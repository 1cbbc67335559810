use std::collections::HashMap;

use super::coord::{CanonicalKey, Coord};
use super::store::GraphTx;
use super::NodeId;
use crate::error::{Result, StorageError};

/// Resolves coordinates to node ids within one transaction, creating nodes on first sight.
///
/// Keys already resolved by this registry are answered from memory, so a route
/// that passes the same point several times costs one lookup.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    resolved: HashMap<CanonicalKey, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve_or_create<T: GraphTx>(&mut self, tx: &mut T, coord: Coord) -> Result<NodeId> {
        let key = coord.key();

        if let Some(&id) = self.resolved.get(&key) {
            return Ok(id);
        }

        let id = match tx.find_node(key).await? {
            Some(id) => id,
            None => match tx.insert_node(key).await {
                Ok(id) => id,
                Err(StorageError::Conflict(_)) => {
                    log::warn!(
                        "node ({}, {}) created concurrently, resolving existing id",
                        key.latitude(),
                        key.longitude()
                    );

                    tx.find_node(key)
                        .await?
                        .ok_or(StorageError::MissingNode(key.latitude(), key.longitude()))?
                }
                Err(e) => return Err(e.into()),
            },
        };

        self.resolved.insert(key, id);

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryStore;
    use crate::graph::store::GraphStore;

    #[tokio::test]
    async fn same_coordinate_resolves_to_same_node() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let mut registry = NodeRegistry::new();

        let first = registry
            .resolve_or_create(&mut tx, Coord::new(52.5, 13.4))
            .await
            .unwrap();

        for i in 0..50 {
            registry
                .resolve_or_create(&mut tx, Coord::new(52.0 + i as f64 * 0.001, 13.0))
                .await
                .unwrap();
        }

        let again = registry
            .resolve_or_create(&mut tx, Coord::new(52.500_000_3, 13.4))
            .await
            .unwrap();

        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn fresh_registry_finds_committed_nodes() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let id = NodeRegistry::new()
            .resolve_or_create(&mut tx, Coord::new(52.5, 13.41))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let found = NodeRegistry::new()
            .resolve_or_create(&mut tx, Coord::new(52.5, 13.41))
            .await
            .unwrap();

        assert_eq!(id, found);
    }
}
