use async_trait::async_trait;
use reqwest::Url;

use super::types::*;
use super::DirectionsProvider;
use crate::error::UpstreamError;
use crate::graph::Coord;

/// OpenRouteService directions client.
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base: Url,
    api_key: String,
    profile: String,
}

impl Client {
    pub fn new(base: &str, api_key: &str, profile: &str) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::new();

        // Url::join drops the last path segment unless the base ends with a slash.
        let normalized = format!("{}/", base.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| UpstreamError::InvalidUrl(base.to_string(), e.to_string()))?;

        Ok(Self {
            inner: client,
            base,
            api_key: api_key.to_string(),
            profile: profile.to_string(),
        })
    }

    pub async fn directions(&self, r: DirectionsRequest) -> Result<DirectionsResponse, UpstreamError> {
        let url = self
            .base
            .join(&format!("v2/directions/{}/geojson", self.profile))
            .map_err(|e| UpstreamError::InvalidUrl(self.base.to_string(), e.to_string()))?;

        let response = self
            .inner
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&r)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl DirectionsProvider for Client {
    async fn path(&self, from: Coord, to: Coord) -> Result<Vec<Coord>, UpstreamError> {
        let response = self
            .directions(DirectionsRequest {
                coordinates: vec![from.to_lon_lat(), to.to_lon_lat()],
            })
            .await?;

        response.into_path()
    }
}
