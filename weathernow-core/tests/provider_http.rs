use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use weathernow_core::{
    AqiTier, Coordinates, FetchError, ImageSource, WeatherSource,
    provider::{openweather::OpenWeatherProvider, unsplash::UnsplashProvider},
};

const COORDS: Coordinates = Coordinates { lat: 30.3165, lon: 78.0322 };

async fn openweather(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".into(), Duration::from_secs(2))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn current_weather_sends_key_and_metric_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Dehradun"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coord": {"lon": 78.0322, "lat": 30.3165},
            "weather": [{"main": "Haze", "description": "haze"}],
            "main": {"temp": 28.0, "feels_like": 27.0, "humidity": 40, "pressure": 1008},
            "wind": {"speed": 3.0},
            "dt": 1714545000,
            "sys": {"sunrise": 1714521300, "sunset": 1714569600},
            "timezone": 19800,
            "name": "Dehradun",
            "cod": 200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = openweather(&server).await.fetch_current("Dehradun").await.unwrap();

    assert_eq!(fetched.value.location_name, "Dehradun");
    assert_eq!(fetched.value.condition, "Haze");
    assert_eq!(fetched.payload["cod"], 200);
}

#[tokio::test]
async fn string_cod_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let err = openweather(&server).await.fetch_current("Nowhereville").await.unwrap_err();

    match err {
        FetchError::NotFound(message) => assert_eq!(message, "city not found"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_error_page_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = openweather(&server).await.fetch_current("Delhi").await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 502, .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn forecast_keeps_provider_order() {
    let server = MockServer::start().await;
    let list: Vec<_> = (0..10)
        .map(|i| {
            json!({
                "dt": 1714543200 + i * 10800,
                "dt_txt": format!("2024-05-01 {:02}:00:00", (i * 3) % 24),
                "main": {"temp": 20.0 + i as f64},
                "weather": [{"main": "Clouds", "description": "broken clouds"}]
            })
        })
        .collect();
    Mock::given(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": "200", "list": list})))
        .mount(&server)
        .await;

    let forecast = openweather(&server).await.fetch_forecast("London").await.unwrap();

    assert_eq!(forecast.entries.len(), 10);
    assert_eq!(forecast.next_hours().len(), 8);
    assert_eq!(forecast.entries[0].temperature_c, 20.0);
}

#[tokio::test]
async fn air_quality_maps_index_and_rejects_off_scale() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "30.3165"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"list": [{"main": {"aqi": 3}}]})),
        )
        .mount(&server)
        .await;
    Mock::given(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"list": [{"main": {"aqi": 9}}]})),
        )
        .mount(&server)
        .await;

    let provider = openweather(&server).await;

    assert_eq!(provider.fetch_air_quality(COORDS).await.unwrap(), Some(AqiTier::Moderate));
    let off_scale = provider.fetch_air_quality(Coordinates { lat: 0.0, lon: 0.0 }).await;
    assert_eq!(off_scale.unwrap(), None);
}

#[tokio::test]
async fn extended_requires_success_status() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/onecall"))
        .and(query_param("exclude", "minutely,hourly,alerts"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let err = openweather(&server).await.fetch_extended(COORDS).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 401, .. }));
}

#[tokio::test]
async fn geocode_returns_first_hit_or_nothing() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .and(query_param("q", "Amritsar"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"lat": 31.634, "lon": 74.8723}])),
        )
        .mount(&server)
        .await;
    Mock::given(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let provider = openweather(&server).await;

    let hit = provider.geocode("Amritsar").await.unwrap().unwrap();
    assert_eq!(hit.cache_key(), "31.6340,74.8723");
    assert_eq!(provider.geocode("Atlantis").await.unwrap(), None);
}

#[tokio::test]
async fn unsplash_returns_first_regular_url() {
    let server = MockServer::start().await;
    Mock::given(path("/search/photos"))
        .and(query_param("query", "famous landmark in Delhi"))
        .and(query_param("per_page", "1"))
        .and(query_param("client_id", "ACCESS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"urls": {"regular": "https://images.example/india-gate.jpg"}}]
        })))
        .mount(&server)
        .await;
    Mock::given(path("/search/photos"))
        .and(query_param("query", "famous landmark in Nowhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let provider = UnsplashProvider::new("ACCESS".into(), Duration::from_secs(2))
        .unwrap()
        .with_base_url(server.uri());

    let url = provider.search_image("famous landmark in Delhi").await.unwrap();
    assert_eq!(url.as_deref(), Some("https://images.example/india-gate.jpg"));
    assert_eq!(provider.search_image("famous landmark in Nowhere").await.unwrap(), None);
}
