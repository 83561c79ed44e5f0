//! Free-text place lookup via the Nominatim search endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::model::Location;

pub const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying agent string.
const GEOCODER_AGENT: &str = "climate-station/0.1 (climate-cli)";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Courtesy spacing between upstream lookups (Nominatim asks for max 1 req/s).
const MIN_REQUEST_SPACING: Duration = Duration::from_secs(1);

/// Lookup failures, split so callers can tell a missing place from an
/// unreachable service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no match for the requested place")]
    NotFound,

    #[error("geocoding service unreachable: {0}")]
    Transport(String),

    #[error("geocoder returned an unreadable response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, place: &str) -> Result<Location, GeocodeError>;
}

/// Resolver backed by the public Nominatim instance. Successful lookups are
/// memoized by the exact query string for the lifetime of the process.
#[derive(Debug)]
pub struct NominatimResolver {
    http: Client,
    base_url: String,
    state: Mutex<ResolverState>,
}

#[derive(Debug, Default)]
struct ResolverState {
    last_request: Option<Instant>,
    cache: HashMap<String, Location>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimResolver {
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_base_url(NOMINATIM_BASE.to_string())
    }

    /// Point at a different instance; used by tests.
    pub fn with_base_url(base_url: String) -> Result<Self, GeocodeError> {
        let http = Client::builder()
            .user_agent(GEOCODER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            state: Mutex::new(ResolverState::default()),
        })
    }

    /// Sleep long enough to keep `MIN_REQUEST_SPACING` between upstream calls.
    async fn pace(&self) {
        let wait = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let wait = state
                .last_request
                .and_then(|prev| MIN_REQUEST_SPACING.checked_sub(now - prev))
                .unwrap_or(Duration::ZERO);
            state.last_request = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    fn into_location(place: NominatimPlace) -> Result<Location, GeocodeError> {
        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::Decode(format!("bad latitude `{}`: {e}", place.lat)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::Decode(format!("bad longitude `{}`: {e}", place.lon)))?;

        Ok(Location {
            latitude,
            longitude,
            display_address: place.display_name,
        })
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    async fn resolve(&self, place: &str) -> Result<Location, GeocodeError> {
        let query = place.trim();
        if query.is_empty() {
            return Err(GeocodeError::NotFound);
        }

        if let Some(hit) = self.state.lock().await.cache.get(query) {
            debug!(place = %query, "geocode cache hit");
            return Ok(hit.clone());
        }

        self.pace().await;

        let url = format!("{}/search", self.base_url);
        debug!(place = %query, "geocoding");

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeocodeError::Transport(format!("HTTP {status}")));
        }

        let matches: Vec<NominatimPlace> = res
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        let place_record = matches.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let location = Self::into_location(place_record)?;

        self.state
            .lock()
            .await
            .cache
            .insert(query.to_string(), location.clone());

        Ok(location)
    }
}
