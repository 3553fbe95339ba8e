//! Integration tests for the weather-near pipeline, HTTP API and CLI

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Days, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_near::{AppConfig, WeatherReport, WeatherService, web};

fn service_for(mock_server: &MockServer) -> WeatherService {
    let mut config = AppConfig::default();
    config.http.allow_insecure = true;
    config.endpoints.geocoder_base_url = mock_server.uri();
    config.endpoints.forecast_base_url = mock_server.uri();
    config.validate().unwrap();
    WeatherService::from_config(&config).unwrap()
}

/// A week of alternating day/night periods starting today, in UTC-5
fn week_of_periods() -> Value {
    let today = Utc::now()
        .with_timezone(&chrono::FixedOffset::west_opt(5 * 3600).unwrap())
        .date_naive();
    let mut periods = Vec::new();
    for offset in 0..7u64 {
        let date = today.checked_add_days(Days::new(offset)).unwrap();
        let (day_name, night_name) = if offset == 0 {
            ("This Afternoon".to_string(), "Tonight".to_string())
        } else {
            (format!("Day {offset}"), format!("Night {offset}"))
        };
        periods.push(json!({
            "number": offset * 2 + 1,
            "name": day_name,
            "startTime": format!("{date}T06:00:00-05:00"),
            "isDaytime": true,
            "temperature": 70 + offset,
            "temperatureUnit": "F",
            "windSpeed": "10 mph",
            "windDirection": "SW",
            "icon": "https://api.weather.gov/icons/land/day/sct?size=medium",
            "shortForecast": "Partly Sunny"
        }));
        periods.push(json!({
            "number": offset * 2 + 2,
            "name": night_name,
            "startTime": format!("{date}T18:00:00-05:00"),
            "isDaytime": false,
            "temperature": 50 + offset,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "windDirection": "N",
            "icon": "https://api.weather.gov/icons/land/night/few?size=medium",
            "shortForecast": "Mostly Clear"
        }));
    }
    json!({ "properties": { "periods": periods } })
}

async fn mount_upstreams(mock_server: &MockServer, expected_runs: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Kansas City, MO"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"lat": "39.0997", "lon": "-94.5786", "display_name": "Kansas City"}]"#),
        )
        .expect(expected_runs)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/points/39.1,-94.58"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "forecast": format!("{}/gridpoints/EAX/44,51/forecast", mock_server.uri())
            }
        })))
        .expect(expected_runs)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gridpoints/EAX/44,51/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_of_periods()))
        .expect(expected_runs)
        .mount(mock_server)
        .await;
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_full_pipeline_windows_and_pairs() {
    let mock_server = MockServer::start().await;
    mount_upstreams(&mock_server, 1).await;
    let service = service_for(&mock_server);

    let report = service.lookup("Kansas City, MO", false).await.unwrap();

    // Today plus three more evenings
    assert_eq!(report.periods.len(), 4);
    assert!(!report.from_cache);

    let tonight = &report.periods[0];
    assert_eq!(tonight.name.as_deref(), Some("Today"));
    assert_eq!(tonight.high, Some(70));
    assert_eq!(tonight.low, Some(50));
    assert_eq!(tonight.current_temp, Some(50));

    let last = &report.periods[3];
    assert_eq!(last.name.as_deref(), Some("Night 3"));
    assert_eq!(last.high, Some(73));
    assert_eq!(last.low, Some(53));
    assert_eq!(last.description.as_deref(), Some("Mostly Clear"));
}

#[tokio::test]
async fn test_weather_endpoint_caches_between_requests() {
    let mock_server = MockServer::start().await;
    mount_upstreams(&mock_server, 1).await;
    let app = web::app(Arc::new(service_for(&mock_server)), Duration::from_secs(30));

    let uri = "/api/weather?address=Kansas%20City%2C%20MO";
    let (status, first) = get_json(app.clone(), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["address"], "Kansas City, MO");
    assert_eq!(first["from_cache"], false);
    assert_eq!(first["weather_data"].as_array().unwrap().len(), 4);

    let (_, second) = get_json(app, uri).await;
    assert_eq!(second["from_cache"], true);
    assert_eq!(second["weather_data"], first["weather_data"]);
}

#[tokio::test]
async fn test_force_refreshes_through_the_api() {
    let mock_server = MockServer::start().await;
    mount_upstreams(&mock_server, 2).await;
    let app = web::app(Arc::new(service_for(&mock_server)), Duration::from_secs(30));

    get_json(app.clone(), "/api/weather?address=Kansas%20City%2C%20MO").await;
    let (_, forced) = get_json(app, "/api/weather?address=Kansas%20City%2C%20MO&force=1").await;

    assert_eq!(forced["from_cache"], false);
}

#[tokio::test]
async fn test_surrounding_whitespace_is_a_distinct_address() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "39.0997", "lon": "-94.5786"}]"#),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/points/39.1,-94.58"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "forecast": format!("{}/gridpoints/EAX/44,51/forecast", mock_server.uri())
            }
        })))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gridpoints/EAX/44,51/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_of_periods()))
        .expect(2)
        .mount(&mock_server)
        .await;
    let service = Arc::new(service_for(&mock_server));
    let app = web::app(service.clone(), Duration::from_secs(30));

    let (_, plain) = get_json(app.clone(), "/api/weather?address=Foo").await;
    let (_, padded) = get_json(app, "/api/weather?address=%20Foo%20").await;

    assert_eq!(plain["from_cache"], false);
    assert_eq!(padded["from_cache"], false);
    assert_eq!(padded["address"], " Foo ");
    assert_eq!(service.cache().len(), 2);
}

#[tokio::test]
async fn test_upstream_failure_yields_null_weather_data() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;
    let service = Arc::new(service_for(&mock_server));
    let app = web::app(service.clone(), Duration::from_secs(30));

    let (status, body) = get_json(app, "/api/weather?address=Nowhere%20Special").await;

    assert_eq!(status, StatusCode::OK);
    let report: WeatherReport = serde_json::from_value(body).unwrap();
    assert_eq!(report.weather_data, None);
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_missing_address_is_null_without_upstream_calls() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    let app = web::app(Arc::new(service_for(&mock_server)), Duration::from_secs(30));

    let (status, body) = get_json(app, "/api/weather").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["address"].is_null());
    assert!(body["weather_data"].is_null());
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let app = web::app(Arc::new(service_for(&mock_server)), Duration::from_secs(30));

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], weather_near::VERSION);
}

/// The binary lists both subcommands in its help
#[test]
fn test_cli_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_weather-near"))
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("lookup"));
}

/// An empty address fails fast without any network access
#[test]
fn test_cli_lookup_requires_address() {
    let config = tempfile::NamedTempFile::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_weather-near"))
        .args(["--config", config.path().to_str().unwrap(), "lookup", ""])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please provide an address"));
}
