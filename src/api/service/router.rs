use axum::middleware;
use axum::routing::{get, post};

use super::endpoints::*;
use super::{AppState, require_api_key};
use crate::graph::GraphStore;

pub fn router<S: GraphStore>(state: AppState<S>) -> axum::Router {
    let protected = axum::Router::new()
        .route("/insert_route", post(insert_route::<S>))
        .route("/api/plan_route", post(plan_route::<S>))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    axum::Router::new()
        .route("/health", get(health))
        .route("/api/edges", get(edges::<S>))
        .route("/api/route/{id}", get(get_route::<S>))
        .merge(protected)
        .with_state(state)
}
