use crate::{
    Config,
    advice::AqiTier,
    error::FetchError,
    model::{Coordinates, ExtendedForecast, Fetched, Forecast, WeatherSnapshot},
    provider::{openweather::OpenWeatherProvider, unsplash::UnsplashProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod unsplash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Unsplash,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Unsplash => "unsplash",
        }
    }

    /// Environment variable that overrides the configured key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::Unsplash => "UNSPLASH_ACCESS_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Unsplash]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "unsplash" => Ok(ProviderId::Unsplash),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, unsplash."
            )),
        }
    }
}

/// Weather data by place name or coordinates. Every call is attempted once.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions, with the raw payload for the offline cache.
    async fn fetch_current(&self, place: &str) -> Result<Fetched<WeatherSnapshot>, FetchError>;

    async fn fetch_forecast(&self, place: &str) -> Result<Forecast, FetchError>;

    /// Daily trend and UV index, with the raw payload for the offline cache.
    async fn fetch_extended(
        &self,
        coords: Coordinates,
    ) -> Result<Fetched<ExtendedForecast>, FetchError>;

    /// `Ok(None)` when the provider's index is missing or off its scale.
    async fn fetch_air_quality(&self, coords: Coordinates) -> Result<Option<AqiTier>, FetchError>;

    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, FetchError>;

    /// Rebuild a snapshot from a payload previously returned by `fetch_current`.
    fn decode_current(&self, payload: &serde_json::Value) -> Result<WeatherSnapshot, FetchError>;

    /// Rebuild an extended forecast from a payload previously returned by `fetch_extended`.
    fn decode_extended(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ExtendedForecast, FetchError>;
}

/// Free-text image search.
#[async_trait]
pub trait ImageSource: Send + Sync + Debug {
    async fn search_image(&self, query: &str) -> Result<Option<String>, FetchError>;
}

/// Construct the weather provider from config.
pub fn weather_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = ProviderId::OpenWeather;
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weathernow configure {id}` or set {}.",
            id.env_var()
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), config.request_timeout())?;
    Ok(Box::new(provider))
}

/// Construct the image provider from config, or `None` when no key is set.
pub fn image_source_from_config(
    config: &Config,
) -> anyhow::Result<Option<Box<dyn ImageSource>>> {
    let Some(api_key) = config.provider_api_key(ProviderId::Unsplash) else {
        return Ok(None);
    };

    let provider = UnsplashProvider::new(api_key.to_owned(), config.request_timeout())?;
    Ok(Some(Box::new(provider)))
}

/// Keep at most `MAX` bytes of a response body for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
