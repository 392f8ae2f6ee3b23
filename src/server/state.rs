use crate::config::Config;
use crate::geoapify::Geoapify;

pub struct AppState {
    /// `None` when no usable API key is configured; routes then answer 400.
    pub geoapify: Option<Geoapify>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self { geoapify: Geoapify::from_config(config) }
    }
}
