//! Route ratings and the weight adjustment they contribute to every edge a route traverses.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Signed weight adjustment per rating, indexed by `rating - 1`.
pub const RATING_ADJUSTMENTS: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

/// A route quality rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::invalid(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        value.0 as i64
    }
}

/// Maps a rating to the delta folded into an edge's weight.
///
/// Weights are never clamped or decayed by the default policy; a saturating
/// or decaying strategy plugs in here.
pub trait WeightPolicy: Send + Sync {
    fn adjustment(&self, rating: Rating) -> f64;
}

/// The fixed [`RATING_ADJUSTMENTS`] table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingTable;

impl WeightPolicy for RatingTable {
    fn adjustment(&self, rating: Rating) -> f64 {
        RATING_ADJUSTMENTS[rating.0 as usize - 1]
    }
}
