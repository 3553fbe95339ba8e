//! Outbound HTTP fetcher shared by every pipeline stage
//!
//! One `reqwest` client per process carries the identifying User-Agent, the
//! per-request timeout and the HTTPS-only policy. No retries: a failed call is
//! reported once and the stage above decides what it means.

use crate::config::HttpConfig;
use crate::error::FailureReason;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Responses slower than this are logged as a warning
const SLOW_RESPONSE_SECS: u64 = 5;

/// Raw status and body of a completed request
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub body: String,
}

impl FetchedResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Fail with `UpstreamError` unless the status is exactly 200
    pub fn require_ok(self) -> std::result::Result<Self, FailureReason> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(FailureReason::upstream(self.status.as_u16()))
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, FailureReason> {
        serde_json::from_str(&self.body).map_err(|e| FailureReason::parse(e.to_string()))
    }
}

/// GET-only HTTP client with a fixed identity
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    allow_insecure: bool,
}

impl HttpFetcher {
    /// Build the shared client from configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .https_only(!config.allow_insecure)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            allow_insecure: config.allow_insecure,
        })
    }

    /// Whether `url` is acceptable under this fetcher's transport policy
    #[must_use]
    pub fn accepts(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => match parsed.scheme() {
                "https" => parsed.host_str().is_some(),
                "http" => self.allow_insecure && parsed.host_str().is_some(),
                _ => false,
            },
            Err(_) => false,
        }
    }

    /// Issue a GET and return status and body, or the transport failure
    #[instrument(name = "http_get", level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> std::result::Result<FetchedResponse, FailureReason> {
        if !self.accepts(url) {
            return Err(FailureReason::invalid_url(url));
        }

        let started = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(
                "Transport failure after {:.3}s: {}",
                started.elapsed().as_secs_f64(),
                e
            );
            FailureReason::transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FailureReason::transport(format!("failed reading body: {e}")))?;

        let elapsed = started.elapsed();
        debug!(
            "HTTP {} with {} bytes in {:.3}s",
            status,
            body.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > SLOW_RESPONSE_SECS {
            warn!("Slow upstream response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(FetchedResponse { status, body })
    }
}
