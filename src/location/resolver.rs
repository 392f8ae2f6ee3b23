//! Location resolver: free text goes through the geocoder, coordinates are wrapped as-is.

use super::providers;
use super::types::{Location, Position};
use crate::error::SearchError;
use crate::geoapify::Geoapify;

pub struct LocationResolver<'a> {
    client: &'a Geoapify,
}

impl<'a> LocationResolver<'a> {
    pub fn new(client: &'a Geoapify) -> Self {
        Self { client }
    }

    /// Geocode `query` and take the first match. There is no disambiguation:
    /// when several places match, the geocoder's ranking decides.
    pub fn resolve_text(&self, query: &str) -> Result<Location, SearchError> {
        let response = providers::geoapify_geocode(self.client, query).map_err(|e| {
            log::error!("Geocoding '{}' failed: {}", query, e);
            SearchError::ResolutionFailed
        })?;

        let first = response
            .features
            .into_iter()
            .next()
            .ok_or(SearchError::LocationNotFound)?;

        match (first.properties.lat, first.properties.lon) {
            (Some(lat), Some(lon)) => {
                let location = Location { lat, lon, name: first.properties.formatted };
                log::info!("Resolved '{}' -> {}", query, location);
                Ok(location)
            }
            _ => {
                log::error!("Geocoding '{}' returned a feature without coordinates", query);
                Err(SearchError::ResolutionFailed)
            }
        }
    }

    /// Wrap a device-reported pair. No network call.
    pub fn from_coords(lat: f64, lon: f64) -> Location {
        Location { lat, lon, name: None }
    }

    pub fn from_position(position: Position) -> Location {
        Self::from_coords(position.latitude, position.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> Geoapify {
        let cfg = Config::default()
            .with_api_key("test-key")
            .with_base_url(&server.base_url());
        Geoapify::from_config(&cfg).unwrap()
    }

    #[test]
    fn test_resolve_uses_first_match() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/geocode/search")
                .query_param("text", "Boston")
                .query_param("apiKey", "test-key");
            then.status(200).json_body(json!({
                "features": [
                    { "properties": { "lat": 42.36, "lon": -71.06, "formatted": "Boston, MA" } },
                    { "properties": { "lat": 52.97, "lon": -0.02, "formatted": "Boston, UK" } }
                ]
            }));
        });

        let geo = client(&server);
        let loc = LocationResolver::new(&geo).resolve_text("Boston").unwrap();
        assert_eq!(loc.name.as_deref(), Some("Boston, MA"));
        assert!((loc.lat - 42.36).abs() < 1e-9);
        assert!((loc.lon + 71.06).abs() < 1e-9);
        mock.assert_hits(1);
    }

    #[test]
    fn test_resolve_query_is_url_encoded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/geocode/search")
                .query_param("text", "Kigali, Rwanda & more");
            then.status(200).json_body(json!({
                "features": [{ "properties": { "lat": -1.94, "lon": 30.06 } }]
            }));
        });

        let geo = client(&server);
        let loc = LocationResolver::new(&geo).resolve_text("Kigali, Rwanda & more").unwrap();
        assert_eq!(loc.name, None);
        mock.assert();
    }

    #[test]
    fn test_resolve_empty_result_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/geocode/search");
            then.status(200).json_body(json!({ "features": [] }));
        });

        let geo = client(&server);
        let err = LocationResolver::new(&geo).resolve_text("xyznonexistent").unwrap_err();
        assert_eq!(err, SearchError::LocationNotFound);
    }

    #[test]
    fn test_resolve_missing_features_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/geocode/search");
            then.status(200).json_body(json!({ "type": "FeatureCollection" }));
        });

        let geo = client(&server);
        let err = LocationResolver::new(&geo).resolve_text("nowhere").unwrap_err();
        assert_eq!(err, SearchError::LocationNotFound);
    }

    #[test]
    fn test_resolve_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/geocode/search");
            then.status(500);
        });

        let geo = client(&server);
        let err = LocationResolver::new(&geo).resolve_text("Boston").unwrap_err();
        assert_eq!(err, SearchError::ResolutionFailed);
    }

    #[test]
    fn test_resolve_garbage_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/geocode/search");
            then.status(200).body("not json");
        });

        let geo = client(&server);
        let err = LocationResolver::new(&geo).resolve_text("Boston").unwrap_err();
        assert_eq!(err, SearchError::ResolutionFailed);
    }

    #[test]
    fn test_from_coords() {
        let loc = LocationResolver::from_coords(59.33, 18.07);
        assert_eq!(loc, Location { lat: 59.33, lon: 18.07, name: None });
    }

    #[test]
    fn test_from_position() {
        let loc = LocationResolver::from_position(Position { latitude: 1.0, longitude: 2.0 });
        assert_eq!((loc.lat, loc.lon), (1.0, 2.0));
    }
}
