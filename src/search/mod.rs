//! Search flow shared by both deployment variants.

pub mod controller;
pub mod source;

pub use controller::{SearchController, SearchOutcome, SearchState};
pub use source::{DirectSource, GymSource, ProxySource};
