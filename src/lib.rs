//! `weather-near` - evening forecasts for a free-text address
//!
//! This library geocodes an address, locates the forecast grid for the
//! resulting coordinates, downloads the forecast periods and reduces them to
//! a short list of evening summaries, caching the result per address.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geocoder;
pub mod http;
pub mod logging;
pub mod models;
pub mod service;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::{ForecastCache, cache_key};
pub use config::AppConfig;
pub use error::{FailureReason, LookupError, Stage, WeatherNearError};
pub use models::{Coordinates, DisplayPeriod, ForecastPeriod};
pub use service::{ForecastReport, WeatherReport, WeatherService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherNearError>;
