//! Places subsystem: fitness-category lookups around a resolved location.

pub mod query;
pub mod types;

pub use query::PlacesQuery;
pub use types::{GymFeature, GymProperties, PlacesResponse};
