//! Location subsystem: turns free text or a device position into search coordinates.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{FixedPosition, Geolocator, IpGeolocator};
pub use resolver::LocationResolver;
pub use types::{Location, Position};
