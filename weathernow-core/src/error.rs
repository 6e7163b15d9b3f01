use thiserror::Error;

/// Failure of a single provider call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered, but reported that nothing matched the query.
    #[error("provider reported no match: {0}")]
    NotFound(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// True only for an explicit "no such place" answer from the provider.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Why a primary weather lookup produced nothing to display.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("'{0}' looks like a country; enter a specific city name")]
    AmbiguousInput(String),

    #[error("city '{0}' not found")]
    CityNotFound(String),

    #[error("error fetching weather data for '{place}': {message}")]
    Fetch { place: String, message: String },
}

impl ResolveError {
    pub fn place(&self) -> &str {
        match self {
            ResolveError::AmbiguousInput(place) | ResolveError::CityNotFound(place) => place,
            ResolveError::Fetch { place, .. } => place,
        }
    }
}

/// A best-effort lookup (air quality, UV, image, geocode) that was skipped.
#[derive(Debug, Error)]
#[error("{what} unavailable: {source}")]
pub struct SecondaryUnavailable {
    pub what: &'static str,
    #[source]
    pub source: FetchError,
}
