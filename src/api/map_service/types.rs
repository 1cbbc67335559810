use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::graph::Coord;

/// Body of an OpenRouteService directions request. Points are `[lon, lat]`.
#[derive(Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub coordinates: Vec<[f64; 2]>,
}

/// The parts of a GeoJSON directions response we read.
#[derive(Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub features: Vec<Feature>,
}

#[derive(Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Serialize, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    /// Coordinates of the first route feature.
    pub fn into_path(self) -> Result<Vec<Coord>, UpstreamError> {
        let path: Vec<Coord> = self
            .features
            .into_iter()
            .next()
            .map(|feature| feature.geometry.coordinates)
            .unwrap_or_default()
            .into_iter()
            .map(Coord::from_lon_lat)
            .collect();

        if path.is_empty() {
            return Err(UpstreamError::EmptyRoute);
        }

        Ok(path)
    }
}
