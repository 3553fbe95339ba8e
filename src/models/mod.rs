//! Data models for the weather-near application
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates resolved from an address
//! - Forecast: raw forecast periods from the forecast-data endpoint
//! - Display: the compact per-evening model returned to callers

pub mod display;
pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use display::DisplayPeriod;
pub use forecast::ForecastPeriod;
pub use location::{COORDINATE_PRECISION, Coordinates};
