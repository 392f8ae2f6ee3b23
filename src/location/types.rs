//! Core types for the location subsystem.

use serde::Deserialize;
use std::fmt;

/// A resolved search centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Formatted address from the geocoder; `None` for raw coordinates.
    pub name: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({:.4}, {:.4})", name, self.lat, self.lon),
            None => write!(f, "{:.4}, {:.4}", self.lat, self.lon),
        }
    }
}

/// A device-reported position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geoapify `/v1/geocode/search` response (GeoJSON flavour).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    #[serde(default)]
    pub properties: GeocodeProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeProperties {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub formatted: Option<String>,
}
