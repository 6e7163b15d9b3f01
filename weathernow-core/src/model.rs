use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const HOURLY_WINDOW: usize = 8;
const DAILY_WINDOW: usize = 5;
const MIDDAY_MARKER: &str = "12:00:00";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Key for coordinate-addressed cache entries, fixed at four decimal places.
    pub fn cache_key(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lon)
    }
}

/// A single point-in-time reading for a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Name the provider resolved the query to.
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    /// Condition group, e.g. "Rain" or "Clouds".
    pub condition: String,
    pub description: String,
    pub sunrise: i64,
    pub sunset: i64,
    /// Shift from UTC in seconds.
    pub timezone_offset: i64,
    pub coordinates: Coordinates,
    pub observation_time: DateTime<Utc>,
}

/// A decoded value together with the raw payload it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    /// Provider's "YYYY-MM-DD HH:MM:SS" time string.
    pub dt_txt: String,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
}

impl ForecastEntry {
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.dt_txt.split(' ').next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Three-hourly forecast, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    /// The next 24 hours: the first eight three-hourly entries.
    pub fn next_hours(&self) -> &[ForecastEntry] {
        &self.entries[..self.entries.len().min(HOURLY_WINDOW)]
    }

    /// One midday entry per day, earliest entry winning, at most five days.
    pub fn midday_days(&self) -> Vec<&ForecastEntry> {
        let mut seen = HashSet::new();
        let mut days = Vec::new();

        for entry in &self.entries {
            if days.len() == DAILY_WINDOW {
                break;
            }
            if !entry.dt_txt.contains(MIDDAY_MARKER) {
                continue;
            }
            let day = entry.dt_txt.split(' ').next().unwrap_or_default();
            if seen.insert(day) {
                days.push(entry);
            }
        }

        days
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub day_temperature_c: f64,
}

/// Daily outlook and current UV from the coordinate-based endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedForecast {
    pub uv_index: Option<f64>,
    pub daily: Vec<TrendPoint>,
}

/// Canonical identity of a user-supplied place name: trimmed and title-cased.
///
/// Every run of letters gets an upper-case first character and lower-case
/// rest, so `"new DELHI"` becomes `"New Delhi"` and `"o'neil"` becomes `"O'Neil"`.
pub fn normalize_place(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            time: Utc::now(),
            dt_txt: dt_txt.to_string(),
            temperature_c: temp,
            condition: "Clear".into(),
            description: "clear sky".into(),
        }
    }

    #[test]
    fn normalize_place_title_cases_words() {
        assert_eq!(normalize_place("dehradun"), "Dehradun");
        assert_eq!(normalize_place("  new DELHI "), "New Delhi");
        assert_eq!(normalize_place("o'neil"), "O'Neil");
        assert_eq!(normalize_place("rio-de-janeiro"), "Rio-De-Janeiro");
        assert_eq!(normalize_place(""), "");
    }

    #[test]
    fn coordinate_key_uses_four_decimals() {
        let coords = Coordinates { lat: 30.3165, lon: 78.03219 };
        assert_eq!(coords.cache_key(), "30.3165,78.0322");

        let whole = Coordinates { lat: 51.0, lon: -0.1 };
        assert_eq!(whole.cache_key(), "51.0000,-0.1000");
    }

    #[test]
    fn next_hours_takes_first_eight() {
        let entries = (0..12)
            .map(|i| entry(&format!("2024-05-01 {:02}:00:00", i), i as f64))
            .collect();
        let forecast = Forecast::new(entries);

        let hours = forecast.next_hours();
        assert_eq!(hours.len(), 8);
        assert_eq!(hours[7].temperature_c, 7.0);

        assert!(Forecast::default().next_hours().is_empty());
    }

    #[test]
    fn midday_days_keeps_first_per_date_and_caps_at_five() {
        let forecast = Forecast::new(vec![
            entry("2024-05-01 09:00:00", 1.0),
            entry("2024-05-01 12:00:00", 2.0),
            entry("2024-05-01 12:00:00", 99.0),
            entry("2024-05-02 12:00:00", 3.0),
            entry("2024-05-03 12:00:00", 4.0),
            entry("2024-05-04 12:00:00", 5.0),
            entry("2024-05-05 12:00:00", 6.0),
            entry("2024-05-06 12:00:00", 7.0),
        ]);

        let days = forecast.midday_days();
        let temps: Vec<f64> = days.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(days[0].date(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
