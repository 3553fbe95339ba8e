//! Error types and handling for the weather-near application
//!
//! Pipeline stages report a [`LookupError`] that names the stage and the
//! [`FailureReason`]. The service boundary narrows these to "result or no
//! result"; the reason is only kept for logging.

use std::fmt;

use thiserror::Error;

/// Pipeline stage that produced (or failed to produce) data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Address to coordinates
    Geocode,
    /// Coordinates to forecast URL
    Locate,
    /// Forecast URL to forecast periods
    Forecast,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Geocode => "geocode",
            Stage::Locate => "locate",
            Stage::Forecast => "forecast",
        };
        f.write_str(name)
    }
}

/// Why a stage produced no usable data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No input was given to the stage
    #[error("no input given")]
    InputMissing,

    /// Connection, TLS or timeout failure
    #[error("transport failure: {message}")]
    TransportFailure { message: String },

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status}")]
    UpstreamError { status: u16 },

    /// Body was not valid JSON or lacked a required field
    #[error("malformed response: {message}")]
    ParseFailure { message: String },

    /// URL handed to a stage is empty or not HTTPS-shaped
    #[error("refusing URL {url:?}")]
    InvalidUrl { url: String },
}

impl FailureReason {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::TransportFailure {
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::ParseFailure {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16) -> Self {
        Self::UpstreamError { status }
    }

    pub fn invalid_url<S: Into<String>>(url: S) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Tag this reason with the stage that hit it
    #[must_use]
    pub fn at(self, stage: Stage) -> LookupError {
        LookupError {
            stage,
            reason: self,
        }
    }
}

/// A pipeline stage that came back empty, and why
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} stage produced no data: {reason}")]
pub struct LookupError {
    pub stage: Stage,
    #[source]
    pub reason: FailureReason,
}

/// Main error type for the weather-near application
#[derive(Error, Debug)]
pub enum WeatherNearError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A lookup pipeline that produced nothing
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherNearError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherNearError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            WeatherNearError::Lookup(err) => match err.reason {
                FailureReason::InputMissing => "Please provide an address.".to_string(),
                _ => "No forecast is available for that address right now.".to_string(),
            },
            WeatherNearError::Io { .. } => {
                "File or socket operation failed. Please check permissions.".to_string()
            }
            WeatherNearError::General { message } => message.clone(),
        }
    }
}
