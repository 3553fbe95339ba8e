//! Forecast lookup against a weather.gov-compatible API
//!
//! Two hops: `/points/{lat},{lon}` yields the forecast URL for a grid cell,
//! and that URL yields the ordered forecast periods.

use crate::error::FailureReason;
use crate::http::HttpFetcher;
use crate::models::{Coordinates, ForecastPeriod};
use tracing::{debug, info, instrument};

/// Resolves coordinates into the forecast-data URL for their grid cell
#[derive(Debug, Clone)]
pub struct ForecastLocator {
    fetcher: HttpFetcher,
    base_url: String,
}

impl ForecastLocator {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn points_url(&self, coordinates: &Coordinates) -> String {
        format!("{}/points/{}", self.base_url, coordinates.points_key())
    }

    #[instrument(skip(self))]
    pub async fn forecast_url(&self, coordinates: &Coordinates) -> Result<String, FailureReason> {
        let response = self
            .fetcher
            .fetch(&self.points_url(coordinates))
            .await?
            .require_ok()?;

        let points: nws::PointsResponse = response.json()?;
        let url = points
            .properties
            .and_then(|p| p.forecast)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FailureReason::parse("points response has no forecast URL"))?;

        info!("Forecast URL: {}", url);
        Ok(url)
    }
}

/// Downloads the forecast periods behind a forecast URL
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    fetcher: HttpFetcher,
}

impl ForecastFetcher {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    #[instrument(skip(self))]
    pub async fn periods(&self, url: &str) -> Result<Vec<ForecastPeriod>, FailureReason> {
        if url.is_empty() || !self.fetcher.accepts(url) {
            return Err(FailureReason::invalid_url(url));
        }

        let response = self.fetcher.fetch(url).await?.require_ok()?;
        let forecast: nws::ForecastResponse = response.json()?;
        let periods = forecast
            .properties
            .and_then(|p| p.periods)
            .ok_or_else(|| FailureReason::parse("forecast response has no periods"))?;

        debug!("Fetched {} forecast periods", periods.len());
        Ok(periods)
    }
}

/// weather.gov response envelopes, reduced to the fields we read
mod nws {
    use crate::models::ForecastPeriod;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct PointsResponse {
        #[serde(default)]
        pub properties: Option<PointsProperties>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PointsProperties {
        #[serde(default)]
        pub forecast: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub properties: Option<ForecastProperties>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastProperties {
        #[serde(default)]
        pub periods: Option<Vec<ForecastPeriod>>,
    }
}
