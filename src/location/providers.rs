//! Location providers: Geoapify geocoding and device-position sources.

use serde::Deserialize;

use super::types::{GeocodeResponse, Position};
use crate::error::{GeolocationError, UpstreamError};
use crate::geoapify::Geoapify;

// ─── Geoapify geocoding ─────────────────────────────────────────

/// Free-text geocoding. One request, no retries.
pub fn geoapify_geocode(client: &Geoapify, text: &str) -> Result<GeocodeResponse, UpstreamError> {
    client.get_json(&client.geocode_url, &[("text", text)])
}

// ─── Device position ────────────────────────────────────────────

/// Source of the "current position", the stand-in for browser GPS.
pub trait Geolocator {
    fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// A position supplied up front (e.g. `--lat/--lon`).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

impl Geolocator for FixedPosition {
    fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Approximate position from the caller's public IP (ipapi.co).
pub struct IpGeolocator {
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Geolocator for IpGeolocator {
    fn current_position(&self) -> Result<Position, GeolocationError> {
        let response = ureq::get(&self.url)
            .set("User-Agent", concat!("gym-finder/", env!("CARGO_PKG_VERSION")))
            .call()
            .map_err(|e| match e {
                // The service answered but refused (rate limit, blocked range).
                ureq::Error::Status(code, _) => GeolocationError::Denied(format!("HTTP {}", code)),
                ureq::Error::Transport(t) => {
                    log::warn!("IP geolocation unreachable: {}", t);
                    GeolocationError::Unavailable
                }
            })?;

        let r: IpApiResult = response.into_json().map_err(|e| {
            log::warn!("IP geolocation returned an unreadable body: {}", e);
            GeolocationError::Unavailable
        })?;

        if r.error {
            return Err(GeolocationError::Denied(
                r.reason.unwrap_or_else(|| "unknown reason".into()),
            ));
        }

        match (r.latitude, r.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Position { latitude, longitude }),
            _ => Err(GeolocationError::Unavailable),
        }
    }
}
