//! Authenticated blocking client for the Geoapify HTTP APIs.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::UpstreamError;

const USER_AGENT: &str = concat!("gym-finder/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a static map image; Geoapify PNGs at 300x200 are far below this.
const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct Geoapify {
    agent: ureq::Agent,
    api_key: String,
    pub(crate) geocode_url: String,
    pub(crate) places_url: String,
    pub(crate) static_map_url: String,
}

impl Geoapify {
    /// Returns `None` when the config carries no usable API key.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key()?.to_string();
        Some(Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
            api_key,
            geocode_url: config.geocode_url.clone(),
            places_url: config.places_url.clone(),
            static_map_url: config.static_map_url.clone(),
        })
    }

    fn request(&self, url: &str, params: &[(&str, &str)]) -> Result<ureq::Response, UpstreamError> {
        // params are logged before the key is attached
        log::debug!("GET {} {:?}", url, params);
        let mut request = self.agent.get(url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        Ok(request.query("apiKey", &self.api_key).call()?)
    }

    /// GET `url` with `params` plus the API key and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        self.request(url, params)?
            .into_json()
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// GET `url` and return the raw body bytes, refusing bodies over [`MAX_IMAGE_BYTES`].
    pub fn get_bytes(&self, url: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, UpstreamError> {
        let mut bytes = Vec::new();
        self.request(url, params)?
            .into_reader()
            .take(MAX_IMAGE_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(UpstreamError::Decode(format!(
                "body exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }
        Ok(bytes)
    }

    /// Fetch a 300x200 OSM-bright map centred on the coordinates with a red marker.
    pub fn static_map(&self, lat: f64, lon: f64) -> Result<Vec<u8>, UpstreamError> {
        let lonlat = format!("lonlat:{},{}", lon, lat);
        let marker = format!("{};color:#ff0000;size:medium", lonlat);
        self.get_bytes(
            &self.static_map_url,
            &[
                ("style", "osm-bright"),
                ("width", "300"),
                ("height", "200"),
                ("center", lonlat.as_str()),
                ("zoom", "16"),
                ("marker", marker.as_str()),
            ],
        )
    }
}

impl std::fmt::Debug for Geoapify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geoapify")
            .field("geocode_url", &self.geocode_url)
            .field("places_url", &self.places_url)
            .field("static_map_url", &self.static_map_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> Geoapify {
        let cfg = Config::default()
            .with_api_key("test-key")
            .with_base_url(&server.base_url());
        Geoapify::from_config(&cfg).unwrap()
    }

    #[test]
    fn test_no_client_without_key() {
        assert!(Geoapify::from_config(&Config::default()).is_none());
    }

    #[test]
    fn test_api_key_is_appended() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/places")
                .query_param("limit", "20")
                .query_param("apiKey", "test-key");
            then.status(200).json_body(serde_json::json!({ "features": [] }));
        });

        let geo = client(&server);
        let body: serde_json::Value = geo.get_json(&geo.places_url, &[("limit", "20")]).unwrap();
        assert_eq!(body["features"], serde_json::json!([]));
        mock.assert();
    }

    #[test]
    fn test_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/places");
            then.status(401).body("unauthorized");
        });

        let geo = client(&server);
        let err = geo
            .get_json::<serde_json::Value>(&geo.places_url, &[])
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Status(401)));
    }

    #[test]
    fn test_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/places");
            then.status(200).body("<html>not json</html>");
        });

        let geo = client(&server);
        let err = geo
            .get_json::<serde_json::Value>(&geo.places_url, &[])
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/staticmap");
            then.status(200)
                .header("content-type", "image/png")
                .body(vec![0u8; MAX_IMAGE_BYTES as usize + 1]);
        });

        let err = client(&server).static_map(42.36, -71.06).unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[test]
    fn test_body_at_limit_is_accepted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/staticmap");
            then.status(200).body(vec![7u8; MAX_IMAGE_BYTES as usize]);
        });

        let bytes = client(&server).static_map(42.36, -71.06).unwrap();
        assert_eq!(bytes.len() as u64, MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_static_map_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/staticmap")
                .query_param("style", "osm-bright")
                .query_param("center", "lonlat:-71.06,42.36")
                .query_param("zoom", "16")
                .query_param("marker", "lonlat:-71.06,42.36;color:#ff0000;size:medium");
            then.status(200)
                .header("content-type", "image/png")
                .body(vec![0x89, b'P', b'N', b'G']);
        });

        let bytes = client(&server).static_map(42.36, -71.06).unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
        mock.assert();
    }
}
