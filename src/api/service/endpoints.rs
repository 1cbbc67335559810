use axum::extract::{Json, Path, State};
use axum::http::StatusCode;

use crate::color::{WeightRange, map_center};
use crate::error::{Error, UpstreamError};
use crate::graph::{Coord, GraphStore, RouteId, RouteRecord, RouteSubmission};

use super::types::*;
use super::{AppState, Directions};

pub type Result<T> = std::result::Result<T, ErrorResponse>;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn insert_route<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(r): Json<InsertRouteRequest>,
) -> Result<Json<InsertRouteResponse>> {
    let route_id = state.ingestor.ingest(&r.into_submission()).await?;

    log::info!("inserted route {}", route_id.0);

    Ok(Json(InsertRouteResponse {
        status: Status::Success,
        route_id: route_id.0,
    }))
}

/// Fetches a path between the two endpoints from the directions service and ingests it.
pub async fn plan_route<S: GraphStore>(
    State(state): State<AppState<S>>,
    State(directions): State<Directions>,
    Json(r): Json<PlanRouteRequest>,
) -> Result<Json<PlanRouteResponse>> {
    let provider = directions
        .0
        .ok_or(Error::Upstream(UpstreamError::NotConfigured))?;

    let start = Coord::new(r.start_lat, r.start_lon);
    let end = Coord::new(r.end_lat, r.end_lon);

    // Nothing is written before the provider has answered.
    let path = provider.path(start, end).await.map_err(Error::from)?;

    let submission = RouteSubmission {
        start,
        end,
        rating: r.rating,
        path,
    };
    let route_id = state.ingestor.ingest(&submission).await?;

    log::info!("planned and inserted route {} ({} nodes)", route_id.0, submission.path.len());

    Ok(Json(PlanRouteResponse {
        status: Status::Success,
        route_id: route_id.0,
        nodes: submission.path.iter().map(|c| c.to_lon_lat()).collect(),
    }))
}

/// Every edge with its color on the current weight range.
pub async fn edges<S: GraphStore>(State(state): State<AppState<S>>) -> Result<Json<EdgesResponse>> {
    let snapshot = state.store().edges().await.map_err(Error::from)?;

    let range = WeightRange::of(&snapshot);
    let center = map_center(&snapshot);

    let edges = snapshot
        .into_iter()
        .map(|e| EdgeResponse {
            start_lat: e.start_lat,
            start_lon: e.start_lon,
            end_lat: e.end_lat,
            end_lon: e.end_lon,
            weight: e.weight,
            usage_count: e.usage_count,
            color: range.color_for(e.weight),
        })
        .collect();

    Ok(Json(EdgesResponse {
        edges,
        min_weight: range.min,
        max_weight: range.max,
        center: [center.lat, center.lon],
    }))
}

pub async fn get_route<S: GraphStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<RouteRecord>> {
    state
        .store()
        .route(RouteId(id))
        .await
        .map_err(Error::from)?
        .map(Json)
        .ok_or_else(|| ErrorResponse::new(StatusCode::NOT_FOUND, format!("route {id} not found")))
}
