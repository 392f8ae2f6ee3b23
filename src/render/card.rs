//! Result card construction.

use rand::Rng;
use std::fmt;

use crate::places::GymFeature;

pub const ICON: &str = "\u{1F3CB}\u{FE0F}";
pub const UNNAMED_GYM: &str = "Unnamed Gym";
pub const NO_ADDRESS: &str = "Address not available";

/// How a card points at the map, which depends on the deployment variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStyle {
    /// Outbound OpenStreetMap link plus a coordinate line.
    OpenStreetMap,
    /// Inline preview served by the proxy backend at `{base_url}/api/static-map`.
    StaticPreview { base_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapAffordance {
    Link(String),
    Preview(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub icon: &'static str,
    pub title: String,
    pub address: String,
    /// Cosmetic only, drawn fresh on every render.
    pub stars: u8,
    pub coordinates: Option<String>,
    pub map: Option<MapAffordance>,
}

impl Card {
    pub fn build<R: Rng + ?Sized>(feature: &GymFeature, style: &MapStyle, rng: &mut R) -> Self {
        let props = &feature.properties;
        let title = props.name.clone().unwrap_or_else(|| UNNAMED_GYM.to_string());
        let address = props
            .formatted
            .clone()
            .or_else(|| props.address_line1.clone())
            .unwrap_or_else(|| NO_ADDRESS.to_string());

        let (coordinates, map) = match props.coordinates() {
            Some((lat, lon)) => match style {
                MapStyle::OpenStreetMap => (
                    Some(format!("\u{1F4CD} {:.4}, {:.4}", lat, lon)),
                    Some(MapAffordance::Link(osm_link(lat, lon))),
                ),
                MapStyle::StaticPreview { base_url } => (
                    None,
                    Some(MapAffordance::Preview(static_map_path(base_url, lat, lon))),
                ),
            },
            None => (None, None),
        };

        Self {
            icon: ICON,
            title,
            address,
            stars: star_rating(rng),
            coordinates,
            map,
        }
    }
}

/// Uniform in `3..=5`.
pub fn star_rating<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(3..=5)
}

pub fn osm_link(lat: f64, lon: f64) -> String {
    format!("https://www.openstreetmap.org/?mlat={}&mlon={}&zoom=15", lat, lon)
}

pub fn static_map_path(base_url: &str, lat: f64, lon: f64) -> String {
    format!(
        "{}/api/static-map?lon={}&lat={}",
        base_url.trim_end_matches('/'),
        lon,
        lat
    )
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {} {}  {}", self.icon, self.title, "\u{2605}".repeat(self.stars as usize))?;
        writeln!(f, "     {}", self.address)?;
        if let Some(ref coords) = self.coordinates {
            writeln!(f, "     {}", coords)?;
        }
        match &self.map {
            Some(MapAffordance::Link(url)) => writeln!(f, "     View on Map: {}", url),
            Some(MapAffordance::Preview(url)) => writeln!(f, "     Map preview: {}", url),
            None => Ok(()),
        }
    }
}
