use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    advice::AqiTier,
    error::FetchError,
    model::{
        Coordinates, ExtendedForecast, Fetched, Forecast, ForecastEntry, TrendPoint,
        WeatherSnapshot,
    },
    provider::truncate_body,
};

use super::WeatherSource;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(6);
const TREND_DAYS: usize = 7;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http })
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<(StatusCode, String), FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())]);
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await.inspect_err(|err| {
            tracing::debug!(%path, "OpenWeather request failed: {err}");
        })?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%path, %status, "OpenWeather response");

        Ok((status, body))
    }

    /// Endpoints that report their own `cod`; anything but 200 means no match.
    async fn get_coded(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let (status, body) = self.get(path, query, None).await?;

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body: truncate_body(&body),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if !cod_is_success(&payload) {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string();
            return Err(FetchError::NotFound(message));
        }

        Ok(payload)
    }

    /// Endpoints without `cod`; a 2xx status is required.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<Value, FetchError> {
        let (status, body) = self.get(path, query, timeout).await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn cod_is_success(payload: &Value) -> bool {
    match payload.get("cod") {
        Some(Value::Number(n)) => n.as_i64() == Some(200),
        Some(Value::String(s)) => s == "200",
        _ => false,
    }
}

fn coord_query(coords: Coordinates) -> Vec<(&'static str, String)> {
    vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
}

/// Decode a current-weather payload.
pub fn parse_current(payload: &Value) -> Result<WeatherSnapshot, FetchError> {
    let parsed = OwCurrentResponse::deserialize(payload)?;

    let (condition, description) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        pressure_hpa: parsed.main.pressure,
        condition,
        description,
        sunrise: parsed.sys.sunrise,
        sunset: parsed.sys.sunset,
        timezone_offset: parsed.timezone,
        coordinates: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
        observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
    })
}

/// Decode a 5-day/3-hour forecast payload.
pub fn parse_forecast(payload: &Value) -> Result<Forecast, FetchError> {
    let parsed = OwForecastResponse::deserialize(payload)?;

    let entries = parsed
        .list
        .into_iter()
        .map(|entry| {
            let (condition, description) = entry
                .weather
                .into_iter()
                .next()
                .map(|w| (w.main, w.description))
                .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));

            ForecastEntry {
                time: unix_to_utc(entry.dt).unwrap_or_else(Utc::now),
                dt_txt: entry.dt_txt,
                temperature_c: entry.main.temp,
                condition,
                description,
            }
        })
        .collect();

    Ok(Forecast::new(entries))
}

/// Decode a one-call payload into UV index and up to seven daily points.
pub fn parse_extended(payload: &Value) -> Result<ExtendedForecast, FetchError> {
    let parsed = OwOneCallResponse::deserialize(payload)?;

    let daily = parsed
        .daily
        .into_iter()
        .take(TREND_DAYS)
        .filter_map(|day| {
            let date = unix_to_utc(day.dt)?.date_naive();
            Some(TrendPoint { date, day_temperature_c: day.temp.day })
        })
        .collect();

    Ok(ExtendedForecast { uv_index: parsed.current.and_then(|c| c.uvi), daily })
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i64,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallCurrent {
    uvi: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDailyTemp,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: Option<OwOneCallCurrent>,
    #[serde(default)]
    daily: Vec<OwDaily>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAqi,
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoHit {
    lat: f64,
    lon: f64,
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    async fn fetch_current(&self, place: &str) -> Result<Fetched<WeatherSnapshot>, FetchError> {
        let query = [("q", place.to_string()), ("units", "metric".to_string())];
        let payload = self.get_coded("/data/2.5/weather", &query).await?;
        let value = parse_current(&payload)?;

        Ok(Fetched { value, payload })
    }

    async fn fetch_forecast(&self, place: &str) -> Result<Forecast, FetchError> {
        let query = [("q", place.to_string()), ("units", "metric".to_string())];
        let payload = self.get_coded("/data/2.5/forecast", &query).await?;

        parse_forecast(&payload)
    }

    async fn fetch_extended(
        &self,
        coords: Coordinates,
    ) -> Result<Fetched<ExtendedForecast>, FetchError> {
        let mut query = coord_query(coords);
        query.push(("exclude", "minutely,hourly,alerts".to_string()));
        query.push(("units", "metric".to_string()));

        let payload = self.get_json("/data/2.5/onecall", &query, None).await?;
        let value = parse_extended(&payload)?;

        Ok(Fetched { value, payload })
    }

    async fn fetch_air_quality(&self, coords: Coordinates) -> Result<Option<AqiTier>, FetchError> {
        let payload = self.get_json("/data/2.5/air_pollution", &coord_query(coords), None).await?;
        let parsed = OwAirPollutionResponse::deserialize(&payload)?;

        Ok(parsed.list.first().and_then(|entry| AqiTier::from_index(entry.main.aqi)))
    }

    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, FetchError> {
        let query = [("q", place.to_string()), ("limit", "1".to_string())];
        let payload = self.get_json("/geo/1.0/direct", &query, Some(GEOCODE_TIMEOUT)).await?;
        let hits = Vec::<OwGeoHit>::deserialize(&payload)?;

        Ok(hits.first().map(|hit| Coordinates { lat: hit.lat, lon: hit.lon }))
    }

    fn decode_current(&self, payload: &Value) -> Result<WeatherSnapshot, FetchError> {
        parse_current(payload)
    }

    fn decode_extended(&self, payload: &Value) -> Result<ExtendedForecast, FetchError> {
        parse_extended(payload)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
