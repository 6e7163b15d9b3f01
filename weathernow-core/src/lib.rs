//! Core library for the `weathernow` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Provider clients for weather data and landmark images
//! - The offline cache and favourites documents
//! - The resolution pipeline that picks live or cached data for a place
//! - Advice derived from a reading (AQI/UV tiers, clothing tips) and its
//!   English/Hindi wording
//!
//! It is used by `weathernow-cli`, but can also be reused by other front ends.

pub mod advice;
pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod store;

pub use advice::{AqiTier, UvTier};
pub use config::{Config, FallbackPolicy, ProviderConfig};
pub use error::{FetchError, ResolveError, SecondaryUnavailable};
pub use i18n::{Language, Message};
pub use model::{
    Coordinates, ExtendedForecast, Fetched, Forecast, ForecastEntry, TrendPoint, WeatherSnapshot,
    normalize_place,
};
pub use pipeline::{Origin, ResolveState, Resolution, Resolver, Secondary};
pub use provider::{ImageSource, ProviderId, WeatherSource};
pub use session::{SessionContext, Theme};
pub use store::Store;
