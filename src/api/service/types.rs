use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::graph::{Coord, RouteSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Serialize, Deserialize)]
pub struct InsertRouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub rating: i64,
    /// Path points as `[lon, lat]`, the order the directions service returns.
    pub nodes: Vec<[f64; 2]>,
}

impl InsertRouteRequest {
    pub fn into_submission(self) -> RouteSubmission {
        RouteSubmission {
            start: Coord::new(self.start_lat, self.start_lon),
            end: Coord::new(self.end_lat, self.end_lon),
            rating: self.rating,
            path: self.nodes.into_iter().map(Coord::from_lon_lat).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct InsertRouteResponse {
    pub status: Status,
    pub route_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct PlanRouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub rating: i64,
}

#[derive(Serialize, Deserialize)]
pub struct PlanRouteResponse {
    pub status: Status,
    pub route_id: i64,
    pub nodes: Vec<[f64; 2]>,
}

#[derive(Serialize)]
pub struct EdgeResponse {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub weight: f64,
    pub usage_count: i64,
    pub color: Color,
}

#[derive(Serialize)]
pub struct EdgesResponse {
    pub edges: Vec<EdgeResponse>,
    pub min_weight: f64,
    pub max_weight: f64,
    /// `[lat, lon]` the map should open on.
    pub center: [f64; 2],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip, default = "internal_error")]
    pub code: StatusCode,
    pub status: Status,
    pub message: String,
}

fn internal_error() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}
