//! Nearby fitness-place lookup against Geoapify `/v2/places`.

use serde::de::DeserializeOwned;

use super::types::PlacesResponse;
use crate::error::{SearchError, UpstreamError};
use crate::geoapify::Geoapify;
use crate::location::Location;

pub const CATEGORY: &str = "sport.fitness";
pub const RADIUS_METERS: u32 = 5000;
pub const RESULT_LIMIT: u32 = 20;

/// Geoapify circle filter: `circle:lon,lat,radius`.
pub fn circle_filter(location: &Location) -> String {
    format!("circle:{},{},{}", location.lon, location.lat, RADIUS_METERS)
}

pub struct PlacesQuery<'a> {
    client: &'a Geoapify,
}

impl<'a> PlacesQuery<'a> {
    pub fn new(client: &'a Geoapify) -> Self {
        Self { client }
    }

    /// First page only (up to [`RESULT_LIMIT`] features), decoded as `T`.
    pub fn fetch<T: DeserializeOwned>(&self, location: &Location) -> Result<T, UpstreamError> {
        let filter = circle_filter(location);
        let limit = RESULT_LIMIT.to_string();
        self.client.get_json(
            &self.client.places_url,
            &[("categories", CATEGORY), ("filter", filter.as_str()), ("limit", limit.as_str())],
        )
    }

    pub fn near(&self, location: &Location) -> Result<PlacesResponse, SearchError> {
        let response: PlacesResponse = self.fetch(location).map_err(|e| {
            log::error!("Places lookup near {} failed: {}", location, e);
            SearchError::QueryFailed
        })?;
        log::info!("Found {} places near {}", response.features.len(), location);
        Ok(response)
    }
}
