use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{error::FetchError, provider::truncate_body};

use super::ImageSource;

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Landmark photos for a few well-known cities, used when search is unavailable.
const KNOWN_CITIES: &[(&str, &str)] = &[
    (
        "amritsar",
        "https://images.pexels.com/photos/17798305/pexels-photo-17798305/free-photo-of-golden-temple-at-night.jpeg?auto=compress&cs=tinysrgb&w=800",
    ),
    (
        "delhi",
        "https://images.pexels.com/photos/3476472/pexels-photo-3476472.jpeg?auto=compress&cs=tinysrgb&w=800",
    ),
    (
        "mumbai",
        "https://images.pexels.com/photos/10203531/pexels-photo-10203531.jpeg?auto=compress&cs=tinysrgb&w=800",
    ),
    (
        "london",
        "https://images.pexels.com/photos/460672/pexels-photo-460672.jpeg?auto=compress&cs=tinysrgb&w=800",
    ),
];

pub fn known_city_image(place: &str) -> Option<&'static str> {
    let place = place.trim().to_lowercase();
    KNOWN_CITIES.iter().find(|(city, _)| *city == place).map(|(_, url)| *url)
}

#[derive(Debug, Clone)]
pub struct UnsplashProvider {
    access_key: String,
    base_url: String,
    http: Client,
}

impl UnsplashProvider {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { access_key, base_url: DEFAULT_BASE_URL.to_string(), http })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct UsUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct UsPhoto {
    urls: UsUrls,
}

#[derive(Debug, Deserialize)]
struct UsSearchResponse {
    #[serde(default)]
    results: Vec<UsPhoto>,
}

#[async_trait]
impl ImageSource for UnsplashProvider {
    async fn search_image(&self, query: &str) -> Result<Option<String>, FetchError> {
        let url = format!("{}/search/photos", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("query", query), ("per_page", "1"), ("client_id", self.access_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: UsSearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.results.into_iter().next().map(|photo| photo.urls.regular))
    }
}
