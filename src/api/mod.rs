use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::service::{WeatherReport, WeatherService};

pub type AppState = Arc<WeatherService>;

#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub address: Option<String>,
    /// Any non-empty value forces a refresh
    pub force: Option<String>,
}

impl WeatherQuery {
    fn forced(&self) -> bool {
        self.force.as_deref().is_some_and(|f| !f.trim().is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/health", get(get_health))
        .with_state(service)
}

async fn get_weather(
    State(service): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherReport> {
    Json(service.report(query.address.as_deref(), query.forced()).await)
}

async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
