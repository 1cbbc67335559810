//! Folds rated, user-traveled routes into a shared weighted graph of road
//! segments and exposes it for color-coded rendering.

pub mod api;
pub mod color;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod schema;

pub use error::{Error, Result};
