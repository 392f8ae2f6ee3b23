//! Error kinds shared by the search flow, the HTTP clients and the proxy server.
//!
//! `Display` on [`SearchError`] is the short message shown to the user in the
//! results area; the underlying cause is logged where the error is produced.

use thiserror::Error;

/// Why a search did not produce a result list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("\u{26A0}\u{FE0F} Please add your Geoapify API key")]
    ConfigurationMissing,
    #[error("Location not found.")]
    LocationNotFound,
    #[error("Error finding location.")]
    ResolutionFailed,
    #[error("Error fetching gyms.")]
    QueryFailed,
    #[error("Geolocation not supported.")]
    GeolocationUnavailable,
    #[error("Unable to fetch location: {0}")]
    GeolocationDenied(String),
}

/// Failure to obtain the device position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not available")]
    Unavailable,
    #[error("geolocation refused: {0}")]
    Denied(String),
}

impl From<GeolocationError> for SearchError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::Unavailable => Self::GeolocationUnavailable,
            GeolocationError::Denied(reason) => Self::GeolocationDenied(reason),
        }
    }
}

/// Low-level failure talking to an upstream HTTP API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<ureq::Error> for UpstreamError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(t) => Self::Transport(t.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(SearchError::LocationNotFound.to_string(), "Location not found.");
        assert_eq!(SearchError::QueryFailed.to_string(), "Error fetching gyms.");
        assert_eq!(SearchError::ResolutionFailed.to_string(), "Error finding location.");
        assert_eq!(
            SearchError::ConfigurationMissing.to_string(),
            "\u{26A0}\u{FE0F} Please add your Geoapify API key"
        );
    }

    #[test]
    fn test_geolocation_conversion() {
        assert_eq!(
            SearchError::from(GeolocationError::Unavailable),
            SearchError::GeolocationUnavailable
        );
        let err = SearchError::from(GeolocationError::Denied("User denied Geolocation".into()));
        assert_eq!(err.to_string(), "Unable to fetch location: User denied Geolocation");
    }
}
