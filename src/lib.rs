//! Gym finder: resolve a place or position, look up fitness facilities nearby
//! through Geoapify (directly or via the proxy backend) and render them as
//! staggered result cards.

pub mod config;
pub mod error;
pub mod geoapify;
pub mod location;
pub mod places;
pub mod render;
pub mod search;
pub mod server;

pub use config::Config;
pub use error::{GeolocationError, SearchError};
