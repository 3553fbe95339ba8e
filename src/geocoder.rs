//! Address geocoding
//!
//! Resolves a free-text address into rounded coordinates through a
//! Nominatim-compatible `/search` endpoint.

use crate::error::FailureReason;
use crate::http::HttpFetcher;
use crate::models::{COORDINATE_PRECISION, Coordinates};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Client for the geocoding search service
#[derive(Debug, Clone)]
pub struct Geocoder {
    fetcher: HttpFetcher,
    base_url: String,
}

impl Geocoder {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Search URL asking for at most one match
    #[must_use]
    pub fn search_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        )
    }

    /// Resolve an address to coordinates rounded to two decimals
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Coordinates, FailureReason> {
        if address.is_empty() {
            return Err(FailureReason::InputMissing);
        }

        let response = self
            .fetcher
            .fetch(&self.search_url(address))
            .await?
            .require_ok()?;

        let places: Vec<Place> = response.json()?;
        debug!("Geocode returned {} result(s)", places.len());

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| FailureReason::parse("no geocoding results"))?;

        let raw = place.coordinates()?;
        let coordinates = raw.rounded(COORDINATE_PRECISION);
        info!(
            "Geocoded {:?} to ({}, {}) [raw {}]",
            place.display_name.as_deref().unwrap_or(address),
            coordinates.latitude,
            coordinates.longitude,
            raw
        );

        Ok(coordinates)
    }
}

/// One element of the search result array
#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
    #[serde(default)]
    display_name: Option<String>,
}

impl Place {
    fn coordinates(&self) -> Result<Coordinates, FailureReason> {
        let lat = self
            .lat
            .value()
            .ok_or_else(|| FailureReason::parse("unparseable latitude"))?;
        let lon = self
            .lon
            .value()
            .ok_or_else(|| FailureReason::parse("unparseable longitude"))?;
        Ok(Coordinates::new(lat, lon))
    }
}

/// Nominatim encodes degrees as strings; tolerate plain numbers as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Degrees::Number(n) => Some(*n),
        }
    }
}
