//! Search orchestration: Idle → Loading → (Rendered | ErrorDisplayed).

use std::fmt;
use std::sync::{Arc, Mutex};

use super::source::GymSource;
use crate::error::{GeolocationError, SearchError};
use crate::location::{Geolocator, Location, LocationResolver, Position};
use crate::places::PlacesResponse;
use crate::render::{RenderBatch, Renderer, ResultsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Loading,
    Rendered,
    ErrorDisplayed,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Rendered => write!(f, "rendered"),
            Self::ErrorDisplayed => write!(f, "error"),
        }
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Results (or the "no gyms" message) are on screen; cards may still be arriving.
    Rendered(RenderBatch),
    ErrorDisplayed(SearchError),
}

/// Owns the results view for the lifetime of the UI.
///
/// Searches are not cancelled by newer ones: when two overlap, whichever
/// settles last owns the results area.
pub struct SearchController {
    source: Arc<dyn GymSource>,
    view: Arc<dyn ResultsView>,
    renderer: Renderer,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(source: Arc<dyn GymSource>, view: Arc<dyn ResultsView>) -> Self {
        let renderer = Renderer::new(Arc::clone(&view), source.map_style());
        Self {
            source,
            view,
            renderer,
            state: Mutex::new(SearchState::Idle),
        }
    }

    /// Drop card appends of a render once a newer render has started.
    pub fn cancel_stale_renders(mut self, cancel: bool) -> Self {
        self.renderer = self.renderer.discard_stale(cancel);
        self
    }

    pub fn state(&self) -> SearchState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SearchState) {
        let mut current = self.state.lock().unwrap_or_else(|e| e.into_inner());
        log::debug!("Search state {} -> {}", *current, state);
        *current = state;
    }

    /// Button click / Enter. Blank input is ignored and returns `None`.
    pub async fn submit_text(&self, input: &str) -> Option<SearchOutcome> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }
        log::info!("Searching gyms near '{}'", query);
        let query = query.to_string();
        Some(self.run(move |source| source.search_text(&query)).await)
    }

    /// Result of a device-location read. Errors are shown without entering Loading.
    pub async fn submit_position(
        &self,
        position: Result<Position, GeolocationError>,
    ) -> SearchOutcome {
        match position {
            Ok(position) => {
                let location = LocationResolver::from_position(position);
                self.search_near(location).await
            }
            Err(err) => self.display_error(err.into()),
        }
    }

    /// Read the position from `geolocator` (off the async thread) and search there.
    pub async fn locate_with<G>(&self, geolocator: G) -> SearchOutcome
    where
        G: Geolocator + Send + 'static,
    {
        let position = tokio::task::spawn_blocking(move || geolocator.current_position())
            .await
            .unwrap_or_else(|e| {
                log::error!("Geolocation task failed: {}", e);
                Err(GeolocationError::Unavailable)
            });
        self.submit_position(position).await
    }

    pub async fn search_near(&self, location: Location) -> SearchOutcome {
        log::info!("Searching gyms near {}", location);
        self.run(move |source| source.search_near(&location)).await
    }

    async fn run<F>(&self, search: F) -> SearchOutcome
    where
        F: FnOnce(&dyn GymSource) -> Result<PlacesResponse, SearchError> + Send + 'static,
    {
        // Hides the loader on every exit path, including a dropped future.
        let _loading = LoadingGuard::enter(self.view.as_ref());
        self.set_state(SearchState::Loading);
        self.view.clear();

        let result = match self.source.ensure_configured() {
            Ok(()) => {
                let source = Arc::clone(&self.source);
                tokio::task::spawn_blocking(move || search(source.as_ref()))
                    .await
                    .unwrap_or_else(|e| {
                        log::error!("Search task failed: {}", e);
                        Err(SearchError::QueryFailed)
                    })
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(response) => {
                let batch = self.renderer.render(Some(&response));
                self.set_state(SearchState::Rendered);
                SearchOutcome::Rendered(batch)
            }
            Err(err) => self.display_error(err),
        }
    }

    fn display_error(&self, err: SearchError) -> SearchOutcome {
        log::warn!("Search ended with: {:?}", err);
        self.view.show_message(&err.to_string());
        self.set_state(SearchState::ErrorDisplayed);
        SearchOutcome::ErrorDisplayed(err)
    }
}

struct LoadingGuard<'a> {
    view: &'a dyn ResultsView,
}

impl<'a> LoadingGuard<'a> {
    fn enter(view: &'a dyn ResultsView) -> Self {
        view.set_loading(true);
        Self { view }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.set_loading(false);
    }
}
