//! Gateway and task tests against a mock HTTP server

use weatherdash::action::Action;
use weatherdash::api::{Endpoints, ForecastGateway, GatewayError};
use weatherdash::geo::FixedPosition;
use weatherdash::state::{Coordinates, UnitSystem, display_label};
use weatherdash::tasks;
use weatherdash::wmo::{self, UNKNOWN_ICON, UNKNOWN_TEXT};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn gateway(server: &MockServer) -> ForecastGateway {
    ForecastGateway::with_endpoints(Endpoints {
        geocode: format!("{}/search", server.uri()),
        forecast: format!("{}/v1/forecast", server.uri()),
    })
    .expect("client builds")
}

fn london_response() -> serde_json::Value {
    serde_json::json!([
        {
            "place_id": 1,
            "lat": "51.5",
            "lon": "-0.12",
            "display_name": "London, UK"
        },
        {
            "place_id": 2,
            "lat": "42.98",
            "lon": "-81.24",
            "display_name": "London, Ontario, Canada"
        }
    ])
}

fn forecast_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 51.5,
        "longitude": -0.12,
        "current": {
            "time": "2024-01-01T00:00",
            "temperature_2m": 7.3,
            "relative_humidity_2m": 81,
            "wind_speed_10m": 14.2,
            "weather_code": 61
        },
        "hourly": {
            "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
            "temperature_2m": [7.3, 7.0],
            "weather_code": [61, 63]
        },
        "daily": {
            "time": ["2024-01-01"],
            "temperature_2m_max": [9.1],
            "temperature_2m_min": [4.2],
            "weather_code": [63],
            "wind_speed_10m_max": [null]
        }
    })
}

async fn mount_forecast(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .mount(server)
        .await;
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn test_resolve_query_takes_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_response()))
        .mount(&server)
        .await;

    let place = gateway(&server)
        .resolve_query("  London ")
        .await
        .unwrap()
        .expect("a match");

    assert_eq!(place.latitude, 51.5);
    assert_eq!(place.longitude, -0.12);
    assert_eq!(place.label, "London, UK");
    assert_eq!(display_label(&place.label), "London");
}

#[tokio::test]
async fn test_resolve_query_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let place = gateway(&server).resolve_query("Atlantis").await.unwrap();
    assert!(place.is_none());
}

#[tokio::test]
async fn test_resolve_blank_query_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let place = gateway(&server).resolve_query("   ").await.unwrap();
    assert!(place.is_none());
}

#[tokio::test]
async fn test_resolve_query_falls_back_to_query_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "35.68", "lon": "139.69" }
        ])))
        .mount(&server)
        .await;

    let place = gateway(&server)
        .resolve_query("Tokyo")
        .await
        .unwrap()
        .expect("a match");
    assert_eq!(place.label, "Tokyo");
}

#[tokio::test]
async fn test_resolve_query_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(serde_json::json!({ "error": "slow down" })),
        )
        .mount(&server)
        .await;

    let err = gateway(&server).resolve_query("Paris").await.unwrap_err();
    assert!(matches!(err, GatewayError::Network { endpoint: "geocode", .. }));
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn test_resolve_query_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).resolve_query("Paris").await.unwrap_err();
    assert!(matches!(err, GatewayError::Parse { endpoint: "geocode", .. }));
    assert_eq!(err.status(), None);
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn test_fetch_forecast_metric() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("temperature_unit", "celsius"))
        .and(query_param("windspeed_unit", "kmh"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .mount(&server)
        .await;

    let forecast = gateway(&server)
        .fetch_forecast(51.5, -0.12, UnitSystem::Metric)
        .await
        .unwrap();

    assert_eq!(forecast.current.temperature, Some(7.3));
    assert_eq!(forecast.current.humidity, Some(81.0));
    assert_eq!(forecast.current.weather_code, Some(61));

    assert_eq!(forecast.hourly.len(), 2);
    assert_eq!(forecast.hourly[1].time, "2024-01-01T01:00");
    assert_eq!(forecast.hourly[1].temperature, Some(7.0));
    // No wind series in the payload
    assert_eq!(forecast.hourly[0].wind_speed, None);

    assert_eq!(forecast.daily.len(), 1);
    assert_eq!(forecast.daily[0].max_temp, Some(9.1));
    assert_eq!(forecast.daily[0].max_wind_speed, None);
}

#[tokio::test]
async fn test_fetch_forecast_tolerates_unknown_weather_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {
                "temperature_2m": 4.0,
                "weather_code": 1000
            },
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
                "temperature_2m": [4.0, 3.5, 3.1],
                "weather_code": [3.0, 300, "fog"]
            },
            "daily": {
                "time": ["2024-01-01"],
                "weather_code": [-5]
            }
        })))
        .mount(&server)
        .await;

    let forecast = gateway(&server)
        .fetch_forecast(51.5, -0.12, UnitSystem::Metric)
        .await
        .unwrap();

    assert_eq!(forecast.current.temperature, Some(4.0));
    assert_eq!(forecast.current.weather_code, None);
    assert_eq!(forecast.hourly[0].weather_code, Some(3));
    assert_eq!(forecast.hourly[1].weather_code, None);
    assert_eq!(forecast.hourly[2].weather_code, None);
    assert_eq!(forecast.daily[0].weather_code, None);

    // Unknown codes reach the lookups and get their defaults
    assert_eq!(wmo::classify_weather_code(forecast.current.weather_code), UNKNOWN_TEXT);
    assert_eq!(wmo::icon_for_weather_code(forecast.hourly[1].weather_code), UNKNOWN_ICON);
    assert_eq!(wmo::classify_weather_code(forecast.hourly[0].weather_code), "Cloudy");
}

#[tokio::test]
async fn test_fetch_forecast_imperial_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("windspeed_unit", "mph"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = gateway(&server)
        .fetch_forecast(51.5, -0.12, UnitSystem::Imperial)
        .await;
    assert!(forecast.is_ok());
}

#[tokio::test]
async fn test_fetch_forecast_requires_current_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.12
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .fetch_forecast(51.5, -0.12, UnitSystem::Metric)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Parse { endpoint: "weather", .. }));
}

#[tokio::test]
async fn test_fetch_forecast_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°."
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .fetch_forecast(123.0, 0.0, UnitSystem::Metric)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Latitude must be in range"));
}

// ============================================================================
// Effect tasks
// ============================================================================

#[tokio::test]
async fn test_search_task_loads_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_response()))
        .mount(&server)
        .await;
    mount_forecast(&server).await;

    let action = tasks::search_forecast(&gateway(&server), "London", UnitSystem::Metric).await;
    match action {
        Action::SearchDidLoad { place, forecast } => {
            assert_eq!(place.label, "London, UK");
            assert_eq!(forecast.current.temperature, Some(7.3));
        }
        other => panic!("unexpected action: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_task_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let action = tasks::search_forecast(&gateway(&server), "Atlantis", UnitSystem::Metric).await;
    assert_eq!(action, Action::SearchDidMiss);
}

#[tokio::test]
async fn test_search_task_reports_geocode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let action = tasks::search_forecast(&gateway(&server), "Paris", UnitSystem::Metric).await;
    assert!(matches!(action, Action::ForecastDidError(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_locate_then_load_tasks() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;

    let here = Coordinates {
        latitude: 51.5,
        longitude: -0.12,
    };
    let located = tasks::locate_device(&FixedPosition(here)).await;
    assert_eq!(located, Action::GeoDidLocate(here));

    let loaded = tasks::load_forecast(&gateway(&server), here, UnitSystem::Metric).await;
    assert!(matches!(loaded, Action::ForecastDidLoad(f) if f.hourly.len() == 2));
}
