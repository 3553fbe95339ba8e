//! Lookup pipeline: address → coordinates → forecast URL → periods → display
//!
//! Stages run strictly in sequence. The first stage that comes back empty ends
//! the lookup and nothing is cached for it.

use crate::cache::{ForecastCache, cache_key};
use crate::config::AppConfig;
use crate::error::{FailureReason, LookupError, Stage};
use crate::extractor;
use crate::geocoder::Geocoder;
use crate::http::HttpFetcher;
use crate::models::DisplayPeriod;
use crate::weather::{ForecastFetcher, ForecastLocator};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastReport {
    pub periods: Vec<DisplayPeriod>,
    pub from_cache: bool,
}

/// Boundary response: `weather_data` is `null` whenever any stage failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub address: Option<String>,
    pub from_cache: bool,
    pub weather_data: Option<Vec<DisplayPeriod>>,
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    geocoder: Geocoder,
    locator: ForecastLocator,
    forecasts: ForecastFetcher,
    cache: ForecastCache,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(
        geocoder: Geocoder,
        locator: ForecastLocator,
        forecasts: ForecastFetcher,
        cache: ForecastCache,
        ttl: Duration,
    ) -> Self {
        Self {
            geocoder,
            locator,
            forecasts,
            cache,
            ttl,
        }
    }

    /// Wire every stage onto one shared HTTP client and a fresh cache
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::new(
            Geocoder::new(fetcher.clone(), config.endpoints.geocoder_base_url.clone()),
            ForecastLocator::new(fetcher.clone(), config.endpoints.forecast_base_url.clone()),
            ForecastFetcher::new(fetcher),
            ForecastCache::new(),
            config.cache.ttl(),
        ))
    }

    #[must_use]
    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    /// Display periods for `address`, from cache unless `force` is set
    #[instrument(skip(self))]
    pub async fn lookup(&self, address: &str, force: bool) -> Result<ForecastReport, LookupError> {
        if address.is_empty() {
            return Err(FailureReason::InputMissing.at(Stage::Geocode));
        }

        let key = cache_key(address);
        if force {
            debug!("Forced refresh, skipping cache read");
        } else if let Some(periods) = self.cache.get(&key) {
            info!("Serving {} periods from cache", periods.len());
            return Ok(ForecastReport {
                periods,
                from_cache: true,
            });
        }

        let periods = self.run_stages(address).await?;
        self.cache.put(&key, periods.clone(), self.ttl);

        Ok(ForecastReport {
            periods,
            from_cache: false,
        })
    }

    /// Lookup narrowed to the boundary shape; failures are logged, not returned
    pub async fn report(&self, address: Option<&str>, force: bool) -> WeatherReport {
        let Some(address) = address.filter(|a| !a.is_empty()) else {
            return WeatherReport {
                address: address.map(str::to_string),
                from_cache: false,
                weather_data: None,
            };
        };

        match self.lookup(address, force).await {
            Ok(report) => WeatherReport {
                address: Some(address.to_string()),
                from_cache: report.from_cache,
                weather_data: Some(report.periods),
            },
            Err(err) => {
                warn!("No weather for {:?}: {}", address, err);
                WeatherReport {
                    address: Some(address.to_string()),
                    from_cache: false,
                    weather_data: None,
                }
            }
        }
    }

    async fn run_stages(&self, address: &str) -> Result<Vec<DisplayPeriod>, LookupError> {
        let coordinates = self
            .geocoder
            .resolve(address)
            .await
            .map_err(|reason| reason.at(Stage::Geocode))?;

        let url = self
            .locator
            .forecast_url(&coordinates)
            .await
            .map_err(|reason| reason.at(Stage::Locate))?;

        let periods = self
            .forecasts
            .periods(&url)
            .await
            .map_err(|reason| reason.at(Stage::Forecast))?;

        let extracted = extractor::extract_now(&periods);
        info!(
            "Extracted {} of {} periods for {:?}",
            extracted.len(),
            periods.len(),
            address
        );
        Ok(extracted)
    }
}
