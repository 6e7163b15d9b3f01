//! Decides what to show for a requested place: a live reading, the last
//! cached reading, or a typed error. Secondary lookups (air quality, UV and
//! daily trend, landmark image) run afterwards and never affect the primary
//! result.

use chrono::{DateTime, Utc};

use crate::{
    advice::AqiTier,
    config::FallbackPolicy,
    error::{FetchError, ResolveError, SecondaryUnavailable},
    model::{Coordinates, ExtendedForecast, Fetched, Forecast, WeatherSnapshot, normalize_place},
    provider::{ImageSource, WeatherSource, unsplash::known_city_image},
    session::SessionContext,
    store::Store,
};

/// Country names rejected outright; lookups need city-level granularity.
pub const COUNTRY_DENYLIST: &[&str] = &[
    "india", "usa", "china", "canada", "brazil", "russia", "germany", "france", "japan",
    "australia", "uk", "italy", "spain", "mexico", "pakistan", "indonesia",
];

/// Short country aliases that may collide with real place names.
const COUNTRY_ALIASES: &[&str] =
    &["us", "u.s.", "u.k.", "uae", "ksa", "prc", "rsa", "nz", "drc", "roc"];

const SHORT_INPUT_CHARS: usize = 6;

pub fn is_country(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    COUNTRY_DENYLIST.contains(&input.as_str())
}

/// A short alias whose resolved name doesn't appear in the input was most
/// likely read by the provider as some unrelated town.
fn is_alias_mismatch(input: &str, resolved_name: &str) -> bool {
    let input = input.trim().to_lowercase();
    input.chars().count() <= SHORT_INPUT_CHARS
        && COUNTRY_ALIASES.contains(&input.as_str())
        && !input.contains(&resolved_name.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveState {
    #[default]
    Idle,
    Requested,
    NetworkAttempt,
    Resolved,
    Degraded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    Live,
    /// Served from the offline cache after the live call failed. The capture
    /// time is `None` when the stored stamp cannot be parsed.
    Cache { captured_at: Option<DateTime<Utc>> },
}

#[derive(Debug, Clone)]
pub struct Resolution {
    /// Normalized place name; the cache and favourites key.
    pub place: String,
    pub snapshot: WeatherSnapshot,
    pub origin: Origin,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        matches!(self.origin, Origin::Cache { .. })
    }
}

/// Best-effort extras; each is `None` when its lookup failed.
#[derive(Debug, Clone, Default)]
pub struct Secondary {
    pub air_quality: Option<AqiTier>,
    pub extended: Option<ExtendedForecast>,
    pub landmark_image: Option<String>,
}

impl Secondary {
    pub fn uv_index(&self) -> Option<f64> {
        self.extended.as_ref().and_then(|e| e.uv_index)
    }
}

#[derive(Debug)]
pub struct Resolver {
    weather: Box<dyn WeatherSource>,
    images: Option<Box<dyn ImageSource>>,
    store: Store,
    policy: FallbackPolicy,
    state: ResolveState,
}

impl Resolver {
    pub fn new(weather: Box<dyn WeatherSource>, store: Store) -> Self {
        Self {
            weather,
            images: None,
            store,
            policy: FallbackPolicy::default(),
            state: ResolveState::Idle,
        }
    }

    pub fn with_images(mut self, images: Option<Box<dyn ImageSource>>) -> Self {
        self.images = images;
        self
    }

    pub fn with_fallback(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    fn transition(&mut self, next: ResolveState) {
        tracing::debug!(from = ?self.state, to = ?next, "resolver state");
        self.state = next;
    }

    /// Resolve the weather to display for `input`.
    ///
    /// A live reading is cached under the normalized name. When the live call
    /// fails for transport reasons the cached reading is returned instead,
    /// marked with [`Origin::Cache`]. An explicit "not found" answer only
    /// falls back under [`FallbackPolicy::Always`].
    pub async fn resolve(
        &mut self,
        session: &mut SessionContext,
        input: &str,
    ) -> Result<Resolution, ResolveError> {
        let query = input.trim();
        let place = normalize_place(query);
        session.last_query = Some(place.clone());
        self.transition(ResolveState::Requested);

        if query.is_empty() {
            return Err(self.fail(session, ResolveError::CityNotFound(place)));
        }
        if is_country(query) {
            return Err(self.fail(session, ResolveError::AmbiguousInput(place)));
        }

        self.transition(ResolveState::NetworkAttempt);
        let err = match self.weather.fetch_current(query).await {
            Ok(Fetched { value, payload }) => {
                if is_alias_mismatch(query, &value.location_name) {
                    return Err(self.fail(session, ResolveError::AmbiguousInput(place)));
                }

                self.store.cache.put(&place, payload);
                self.transition(ResolveState::Resolved);
                session.last_snapshot = Some(value.clone());
                return Ok(Resolution { place, snapshot: value, origin: Origin::Live });
            }
            Err(err) => err,
        };

        let may_use_cache = !err.is_not_found() || self.policy == FallbackPolicy::Always;
        let cached = if may_use_cache { self.cached_snapshot(&place) } else { None };

        if let Some((snapshot, captured_at)) = cached {
            tracing::warn!(%place, ?captured_at, "offline data used (cached): {err}");
            self.transition(ResolveState::Degraded);
            session.last_snapshot = Some(snapshot.clone());
            return Ok(Resolution { place, snapshot, origin: Origin::Cache { captured_at } });
        }

        let failure = if err.is_not_found() {
            ResolveError::CityNotFound(place)
        } else {
            ResolveError::Fetch { place, message: err.to_string() }
        };
        Err(self.fail(session, failure))
    }

    fn fail(&mut self, session: &mut SessionContext, err: ResolveError) -> ResolveError {
        tracing::info!(place = err.place(), "lookup failed: {err}");
        self.transition(ResolveState::Failed);
        session.last_snapshot = None;
        self.transition(ResolveState::Idle);
        err
    }

    fn cached_snapshot(&self, place: &str) -> Option<(WeatherSnapshot, Option<DateTime<Utc>>)> {
        let entry = self.store.cache.get(place)?;
        match self.weather.decode_current(&entry.data) {
            Ok(snapshot) => Some((snapshot, entry.timestamp.to_utc())),
            Err(err) => {
                tracing::warn!(%place, "ignoring undecodable cache entry: {err}");
                None
            }
        }
    }

    /// Air quality, extended forecast and landmark image, fetched concurrently.
    pub async fn resolve_secondary(&mut self, resolution: &Resolution) -> Secondary {
        let coords = resolution.snapshot.coordinates;

        let (air_quality, extended, landmark_image) = tokio::join!(
            self.weather.fetch_air_quality(coords),
            self.weather.fetch_extended(coords),
            self.landmark_image(&resolution.place),
        );

        Secondary {
            air_quality: best_effort("air quality", air_quality).flatten(),
            extended: self.settle_extended(coords, extended),
            landmark_image,
        }
    }

    /// Cache a fresh extended forecast, or fall back to the cached one.
    fn settle_extended(
        &mut self,
        coords: Coordinates,
        result: Result<Fetched<ExtendedForecast>, FetchError>,
    ) -> Option<ExtendedForecast> {
        let key = coords.cache_key();

        let err = match result {
            Ok(Fetched { value, payload }) => {
                self.store.cache.put(&key, payload);
                return Some(value);
            }
            Err(err) => err,
        };

        let cached = self
            .store
            .cache
            .get(&key)
            .and_then(|entry| self.weather.decode_extended(&entry.data).ok());
        if cached.is_some() {
            tracing::warn!(%key, "offline extended forecast used (cached): {err}");
            return cached;
        }

        best_effort("extended forecast", Err(err))
    }

    /// Image search first, then the built-in table of known cities.
    pub async fn landmark_image(&self, place: &str) -> Option<String> {
        if let Some(images) = &self.images {
            let query = format!("famous landmark in {place}");
            if let Some(url) = best_effort("landmark image", images.search_image(&query).await)
                .flatten()
            {
                return Some(url);
            }
        }

        known_city_image(place).map(str::to_string)
    }

    pub async fn forecast(&self, place: &str) -> Result<Forecast, FetchError> {
        self.weather.fetch_forecast(place.trim()).await
    }

    /// Coordinates of every favourite that the geocoder could place.
    pub async fn locate_favourites(&self) -> Vec<(String, Coordinates)> {
        let mut located = Vec::new();

        for name in self.store.favourites.names() {
            match best_effort("geocode", self.weather.geocode(name).await).flatten() {
                Some(coords) => located.push((name.clone(), coords)),
                None => tracing::debug!(%name, "favourite could not be located"),
            }
        }

        located
    }
}

fn best_effort<T>(what: &'static str, result: Result<T, FetchError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(source) => {
            tracing::warn!("{}", SecondaryUnavailable { what, source });
            None
        }
    }
}
