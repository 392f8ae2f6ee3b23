//! Where search results come from: Geoapify directly, or the proxy backend.

use crate::config::Config;
use crate::error::SearchError;
use crate::geoapify::Geoapify;
use crate::location::{Location, LocationResolver};
use crate::places::{PlacesQuery, PlacesResponse};
use crate::render::MapStyle;

/// One deployment variant of the search backend.
///
/// Methods block on network I/O; the controller runs them on the blocking pool.
pub trait GymSource: Send + Sync {
    /// Checked before any network call.
    fn ensure_configured(&self) -> Result<(), SearchError> {
        Ok(())
    }

    fn search_text(&self, query: &str) -> Result<PlacesResponse, SearchError>;

    fn search_near(&self, location: &Location) -> Result<PlacesResponse, SearchError>;

    fn map_style(&self) -> MapStyle;
}

// ─── Direct variant ─────────────────────────────────────────────

/// Geocode and query places straight against Geoapify.
#[derive(Debug, Clone)]
pub struct DirectSource {
    client: Option<Geoapify>,
}

impl DirectSource {
    pub fn from_config(config: &Config) -> Self {
        Self { client: Geoapify::from_config(config) }
    }

    fn client(&self) -> Result<&Geoapify, SearchError> {
        self.client.as_ref().ok_or(SearchError::ConfigurationMissing)
    }
}

impl GymSource for DirectSource {
    fn ensure_configured(&self) -> Result<(), SearchError> {
        self.client().map(|_| ())
    }

    fn search_text(&self, query: &str) -> Result<PlacesResponse, SearchError> {
        let client = self.client()?;
        let location = LocationResolver::new(client).resolve_text(query)?;
        PlacesQuery::new(client).near(&location)
    }

    fn search_near(&self, location: &Location) -> Result<PlacesResponse, SearchError> {
        PlacesQuery::new(self.client()?).near(location)
    }

    fn map_style(&self) -> MapStyle {
        MapStyle::OpenStreetMap
    }
}

// ─── Proxy variant ──────────────────────────────────────────────

/// Delegate resolution and lookup to a backend exposing `GET /api/gyms`.
#[derive(Debug, Clone)]
pub struct ProxySource {
    agent: ureq::Agent,
    base_url: String,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn fetch(&self, params: &[(&str, &str)]) -> Result<PlacesResponse, SearchError> {
        let url = format!("{}/api/gyms", self.base_url);
        log::debug!("GET {} {:?}", url, params);
        let mut request = self.agent.get(&url);
        for (name, value) in params {
            request = request.query(name, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(404, _) => SearchError::LocationNotFound,
            other => {
                log::error!("Proxy request to {} failed: {}", url, other);
                SearchError::QueryFailed
            }
        })?;

        response.into_json().map_err(|e| {
            log::error!("Proxy response from {} unreadable: {}", url, e);
            SearchError::QueryFailed
        })
    }
}

impl GymSource for ProxySource {
    fn search_text(&self, query: &str) -> Result<PlacesResponse, SearchError> {
        self.fetch(&[("location", query)])
    }

    fn search_near(&self, location: &Location) -> Result<PlacesResponse, SearchError> {
        let lat = location.lat.to_string();
        let lon = location.lon.to_string();
        self.fetch(&[("lat", lat.as_str()), ("lon", lon.as_str())])
    }

    fn map_style(&self) -> MapStyle {
        MapStyle::StaticPreview { base_url: self.base_url.clone() }
    }
}
