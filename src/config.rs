//! Runtime configuration, read from the environment (and `.env` via dotenvy in `main`).

use std::env;

/// Value shipped in sample configs; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GEOAPIFY_API_KEY_HERE";

const DEFAULT_GEOCODE_URL: &str = "https://api.geoapify.com/v1/geocode/search";
const DEFAULT_PLACES_URL: &str = "https://api.geoapify.com/v2/places";
const DEFAULT_STATIC_MAP_URL: &str = "https://maps.geoapify.com/v1/staticmap";
const DEFAULT_IP_LOCATE_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Clone)]
pub struct Config {
    api_key: Option<String>,
    pub geocode_url: String,
    pub places_url: String,
    pub static_map_url: String,
    pub ip_locate_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        cfg.api_key = lookup("GEOAPIFY_API_KEY");
        if let Some(url) = lookup("GEOAPIFY_GEOCODE_URL") {
            cfg.geocode_url = url;
        }
        if let Some(url) = lookup("GEOAPIFY_PLACES_URL") {
            cfg.places_url = url;
        }
        if let Some(url) = lookup("GEOAPIFY_STATIC_MAP_URL") {
            cfg.static_map_url = url;
        }
        if let Some(url) = lookup("IP_LOCATE_URL") {
            cfg.ip_locate_url = url;
        }
        cfg
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point every Geoapify endpoint at one base URL (mock servers, self-hosted gateways).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.geocode_url = format!("{base}/v1/geocode/search");
        self.places_url = format!("{base}/v2/places");
        self.static_map_url = format!("{base}/v1/staticmap");
        self
    }

    /// The API key, unless it is absent, blank or still the placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            static_map_url: DEFAULT_STATIC_MAP_URL.to_string(),
            ip_locate_url: DEFAULT_IP_LOCATE_URL.to_string(),
        }
    }
}
