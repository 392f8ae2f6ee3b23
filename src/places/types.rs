use serde::Deserialize;

/// Geoapify `/v2/places` response. Only the fields the result cards use are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub features: Vec<GymFeature>,
}

impl PlacesResponse {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One result record. Duplicates are legal and kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GymFeature {
    #[serde(default)]
    pub properties: GymProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GymProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl GymProperties {
    /// Both coordinates, when the feature carries them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}
