//! External directions service: turns two endpoints into a coordinate sequence.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::Client;
pub use types::*;

use crate::error::UpstreamError;
use crate::graph::Coord;

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Ordered points of a path from `from` to `to`, endpoints included.
    async fn path(&self, from: Coord, to: Coord) -> Result<Vec<Coord>, UpstreamError>;
}
