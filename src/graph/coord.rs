//! Canonical coordinates used as node identity.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rounding precision of a canonical key, in degrees (about 0.1 m).
pub const COORD_PRECISION: f64 = 1e-6;

/// Number of canonical steps per degree.
pub const COORD_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from the `[lon, lat]` order used by GeoJSON and the directions service.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(Error::invalid(format!(
                "coordinate ({}, {}) is not finite",
                self.lat, self.lon
            )));
        }

        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::invalid(format!("latitude {} out of range", self.lat)));
        }

        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::invalid(format!("longitude {} out of range", self.lon)));
        }

        Ok(())
    }

    pub fn key(&self) -> CanonicalKey {
        normalize(self.lat, self.lon)
    }
}

/// A coordinate rounded to [`COORD_PRECISION`], stored as integer micro-degrees
/// so that equality and hashing are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    lat_e6: i64,
    lon_e6: i64,
}

impl CanonicalKey {
    pub fn latitude(&self) -> f64 {
        self.lat_e6 as f64 / COORD_SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon_e6 as f64 / COORD_SCALE
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.latitude(), self.longitude())
    }
}

pub fn normalize(lat: f64, lon: f64) -> CanonicalKey {
    CanonicalKey {
        lat_e6: (lat * COORD_SCALE).round() as i64,
        lon_e6: (lon * COORD_SCALE).round() as i64,
    }
}
