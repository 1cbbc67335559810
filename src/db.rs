//! Postgres-backed graph store.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::error::StorageError;
use crate::graph::coord::CanonicalKey;
use crate::graph::store::{GraphStore, GraphTx, StorageResult};
use crate::graph::{Coord, EdgeSnapshot, EdgeStats, NewRoute, NodeId, Rating, RouteId, RouteRecord};
use crate::schema::SCHEMA;

#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::PgPool,
}

impl Database {
    pub async fn connect(pg_url: &str) -> anyhow::Result<Self> {
        let pool = sqlx::PgPool::connect(pg_url).await?;

        Ok(Database { pool })
    }

    /// Creates missing tables. Safe to run on every start.
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;

        Ok(())
    }
}

pub struct PgGraphTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl GraphStore for Database {
    type Tx = PgGraphTx;

    async fn begin(&self) -> StorageResult<PgGraphTx> {
        let tx = self.pool.begin().await?;

        Ok(PgGraphTx { tx })
    }

    async fn edges(&self) -> StorageResult<Vec<EdgeSnapshot>> {
        let rows: Vec<(f64, f64, f64, f64, f64, i64)> = sqlx::query_as("
            SELECT ns.latitude, ns.longitude, ne.latitude, ne.longitude, e.weight, e.usage_count
            FROM edges e
            INNER JOIN nodes ns ON e.node_id_start = ns.id
            INNER JOIN nodes ne ON e.node_id_end = ne.id;
        ")
            .fetch_all(&self.pool)
            .await?;

        let edges = rows
            .into_iter()
            .map(|(start_lat, start_lon, end_lat, end_lon, weight, usage_count)| EdgeSnapshot {
                start_lat,
                start_lon,
                end_lat,
                end_lon,
                weight,
                usage_count,
            })
            .collect();

        Ok(edges)
    }

    async fn route(&self, id: RouteId) -> StorageResult<Option<RouteRecord>> {
        let header: Option<(f64, f64, f64, f64, i16)> = sqlx::query_as("
            SELECT start_latitude, start_longitude, end_latitude, end_longitude, rating
            FROM routes
            WHERE id = $1;
        ")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        let Some((start_lat, start_lon, end_lat, end_lon, rating)) = header else {
            return Ok(None);
        };

        let rating = Rating::new(rating as i64)
            .map_err(|e| StorageError::Database(sqlx::Error::Decode(Box::new(e))))?;

        let path: Vec<(f64, f64)> = sqlx::query_as("
            SELECT n.latitude, n.longitude
            FROM route_way rw
            INNER JOIN nodes n ON rw.node_id = n.id
            WHERE rw.route_id = $1
            ORDER BY rw.sequence;
        ")
            .bind(id.0)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(RouteRecord {
            id,
            start: Coord::new(start_lat, start_lon),
            end: Coord::new(end_lat, end_lon),
            rating,
            path: path.into_iter().map(|(lat, lon)| Coord::new(lat, lon)).collect(),
        }))
    }
}

#[async_trait]
impl GraphTx for PgGraphTx {
    async fn insert_route(&mut self, route: &NewRoute) -> StorageResult<RouteId> {
        let id: i64 = sqlx::query_scalar("
            INSERT INTO routes (start_latitude, start_longitude, end_latitude, end_longitude, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id;
        ")
            .bind(route.start.lat)
            .bind(route.start.lon)
            .bind(route.end.lat)
            .bind(route.end.lon)
            .bind(route.rating.get() as i16)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(RouteId(id))
    }

    async fn find_node(&mut self, key: CanonicalKey) -> StorageResult<Option<NodeId>> {
        let id: Option<i64> = sqlx::query_scalar("
            SELECT id FROM nodes WHERE latitude = $1 AND longitude = $2;
        ")
            .bind(key.latitude())
            .bind(key.longitude())
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(id.map(NodeId))
    }

    async fn insert_node(&mut self, key: CanonicalKey) -> StorageResult<NodeId> {
        // DO NOTHING keeps the transaction usable when another writer won the race.
        let id: Option<i64> = sqlx::query_scalar("
            INSERT INTO nodes (latitude, longitude)
            VALUES ($1, $2)
            ON CONFLICT (latitude, longitude) DO NOTHING
            RETURNING id;
        ")
            .bind(key.latitude())
            .bind(key.longitude())
            .fetch_optional(&mut *self.tx)
            .await?;

        id.map(NodeId).ok_or(StorageError::Conflict("node"))
    }

    async fn insert_route_way(
        &mut self,
        route: RouteId,
        node: NodeId,
        sequence: i32,
    ) -> StorageResult<()> {
        sqlx::query("
            INSERT INTO route_way (route_id, node_id, sequence)
            VALUES ($1, $2, $3);
        ")
            .bind(route.0)
            .bind(node.0)
            .bind(sequence)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn find_edge(&mut self, start: NodeId, end: NodeId) -> StorageResult<Option<EdgeStats>> {
        let stats: Option<(f64, i64)> = sqlx::query_as("
            SELECT weight, usage_count FROM edges WHERE node_id_start = $1 AND node_id_end = $2;
        ")
            .bind(start.0)
            .bind(end.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(stats.map(|(weight, usage_count)| EdgeStats { weight, usage_count }))
    }

    async fn insert_edge(&mut self, start: NodeId, end: NodeId, weight: f64) -> StorageResult<()> {
        let inserted: Option<i32> = sqlx::query_scalar("
            INSERT INTO edges (node_id_start, node_id_end, weight, usage_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (node_id_start, node_id_end) DO NOTHING
            RETURNING 1;
        ")
            .bind(start.0)
            .bind(end.0)
            .bind(weight)
            .fetch_optional(&mut *self.tx)
            .await?;

        inserted.map(|_| ()).ok_or(StorageError::Conflict("edge"))
    }

    async fn update_edge(&mut self, start: NodeId, end: NodeId, delta: f64) -> StorageResult<()> {
        let result = sqlx::query("
            UPDATE edges
            SET weight = weight + $1, usage_count = usage_count + 1
            WHERE node_id_start = $2 AND node_id_end = $3;
        ")
            .bind(delta)
            .bind(start.0)
            .bind(end.0)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEdge(start.0, end.0));
        }

        Ok(())
    }

    async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;

        Ok(())
    }
}
