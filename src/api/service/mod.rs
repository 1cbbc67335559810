pub mod endpoints;
pub mod router;
pub mod types;

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::map_service::DirectionsProvider;
use crate::error::Error;
use crate::graph::{GraphStore, Ingestor};

pub const API_KEY_HEADER: &str = "x-api-key";

pub struct AppState<S> {
    pub ingestor: Ingestor<S>,
    pub directions: Directions,
    pub api_key: ApiKey,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ingestor: self.ingestor.clone(),
            directions: self.directions.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl<S: GraphStore> AppState<S> {
    pub fn new(store: S, directions: Option<Arc<dyn DirectionsProvider>>, api_key: &str) -> Self {
        Self {
            ingestor: Ingestor::new(store),
            directions: Directions(directions),
            api_key: ApiKey(api_key.into()),
        }
    }

    pub fn store(&self) -> &S {
        self.ingestor.store()
    }
}

#[derive(Clone)]
pub struct Directions(pub Option<Arc<dyn DirectionsProvider>>);

#[derive(Clone)]
pub struct ApiKey(pub Arc<str>);

impl<S: GraphStore> FromRef<AppState<S>> for Directions {
    fn from_ref(input: &AppState<S>) -> Self {
        input.directions.clone()
    }
}

impl<S: GraphStore> FromRef<AppState<S>> for ApiKey {
    fn from_ref(input: &AppState<S>) -> Self {
        input.api_key.clone()
    }
}

/// Rejects requests whose `x-api-key` header does not match the configured key.
pub async fn require_api_key(State(key): State<ApiKey>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(&*key.0) {
        log::warn!("rejected {} {}: invalid api key", request.method(), request.uri());
        return types::ErrorResponse::new(StatusCode::FORBIDDEN, "Invalid API token").into_response();
    }

    next.run(request).await
}

impl IntoResponse for types::ErrorResponse {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

impl types::ErrorResponse {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: types::Status::Error,
            message: message.into(),
        }
    }
}

impl From<Error> for types::ErrorResponse {
    fn from(value: Error) -> Self {
        log::error!("{value}");

        match value {
            Error::InvalidInput(message) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, message),
            Error::Storage(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage error"),
            Error::Upstream(e) => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}
