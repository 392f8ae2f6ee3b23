use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::error::SearchError;
use crate::geoapify::Geoapify;
use crate::location::{Location, LocationResolver};
use crate::places::PlacesQuery;

use super::state::AppState;

/// Searched when `/api/gyms` gets neither text nor coordinates.
pub const DEFAULT_LOCATION: &str = "Kigali, Rwanda";

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::ConfigurationMissing => {
                api_error(StatusCode::BAD_REQUEST, "Missing GEOAPIFY_API_KEY")
            }
            SearchError::LocationNotFound => api_error(StatusCode::NOT_FOUND, "Location not found"),
            SearchError::ResolutionFailed => api_error(StatusCode::BAD_GATEWAY, "Geocoding failed"),
            SearchError::QueryFailed => api_error(StatusCode::BAD_GATEWAY, "Places lookup failed"),
            other => api_error(StatusCode::BAD_REQUEST, other.to_string()),
        }
    }
}

impl AppState {
    fn client(&self) -> Result<Geoapify, ApiError> {
        self.geoapify
            .clone()
            .ok_or_else(|| SearchError::ConfigurationMissing.into())
    }
}

async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        log::error!("Upstream task failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?
}

// ─── GET /api/gyms ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GymsQuery {
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

enum Target {
    Text(String),
    Coords(Location),
}

pub async fn gyms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GymsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let start = Instant::now();
    let client = state.client()?;

    let target = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Target::Coords(LocationResolver::from_coords(lat, lon)),
        _ => Target::Text(
            params
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        ),
    };
    let label = match &target {
        Target::Text(text) => format!("location={}", text),
        Target::Coords(loc) => format!("lat={}&lon={}", loc.lat, loc.lon),
    };

    let body = blocking(move || {
        let location = match target {
            Target::Coords(loc) => loc,
            Target::Text(text) => LocationResolver::new(&client).resolve_text(&text)?,
        };
        PlacesQuery::new(&client)
            .fetch::<serde_json::Value>(&location)
            .map_err(|e| {
                log::error!("Places lookup near {} failed: {}", location, e);
                ApiError::from(SearchError::QueryFailed)
            })
    })
    .await
    .inspect_err(|e| log::warn!("GET /api/gyms?{} -> {} {}", label, e.0, e.1))?;

    let count = body
        .get("features")
        .and_then(|f| f.as_array())
        .map_or(0, Vec::len);
    log::info!(
        "GET /api/gyms?{} -> {} features ({:.1}ms)",
        label,
        count,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(body))
}

// ─── GET /api/static-map ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct StaticMapQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn static_map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StaticMapQuery>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let client = state.client()?;

    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing coordinates"));
    };

    let image = blocking(move || {
        client.static_map(lat, lon).map_err(|e| {
            log::error!("Static map for {},{} failed: {}", lat, lon, e);
            api_error(StatusCode::BAD_GATEWAY, "Static map unavailable")
        })
    })
    .await?;

    log::info!(
        "GET /api/static-map?lon={}&lat={} -> {} bytes ({:.1}ms)",
        lon,
        lat,
        image.len(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(([(header::CONTENT_TYPE, "image/png")], image).into_response())
}
