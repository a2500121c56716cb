//! HTTPS telemetry uplink
//!
//! Implements `hydroping_core::TelemetryTransport` against the hosted
//! ingestion endpoint with a blocking `ureq` client. The policy quirks all
//! come from the uplink contract, not from here:
//!
//! - Exactly one attempt per reading, no retries and no backoff. The
//!   device sleeps between readings; the next wake is the retry.
//! - Any HTTP status that produces a response is a *success* — the server
//!   carries device instructions on error statuses too, so a `403` body
//!   still has to reach the instruction decoder.
//! - Only a transport-level failure (DNS, TCP, TLS, timeout) is an error.

use std::time::Duration;

use log::warn;

use hydroping_core::errors::TransportError;
use hydroping_core::uplink::{TelemetryResponse, TelemetryTransport};

use crate::ConnectorError;

/// The hosted ingestion endpoint readings go to by default
pub const DEFAULT_ENDPOINT: &str =
    "https://q15ur4emu9.execute-api.us-east-2.amazonaws.com/default/enterProbeReading";

/// HTTP transport configuration
#[derive(Clone)]
pub struct HttpConfig {
    /// Full URL of the telemetry endpoint
    pub endpoint: String,
    /// Request timeout, covering connect and transfer
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl HttpConfig {
    /// Configuration posting to `endpoint` with default timeout
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("HydroPing/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Override the user agent string
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Blocking HTTPS implementation of `TelemetryTransport`
pub struct HttpTelemetry {
    config: HttpConfig,
    agent: ureq::Agent,
}

impl HttpTelemetry {
    /// Build a transport, validating the endpoint URL up front
    pub fn new(config: HttpConfig) -> Result<Self, ConnectorError> {
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(ConnectorError::Config(
                "Endpoint URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    /// Transport against the default hosted endpoint
    pub fn default_endpoint() -> Result<Self, ConnectorError> {
        Self::new(HttpConfig::default())
    }

    fn response_body(response: ureq::Response) -> Vec<u8> {
        match response.into_string() {
            Ok(text) => text.into_bytes(),
            Err(e) => {
                warn!("telemetry response body not read: {}", e);
                Vec::new()
            }
        }
    }
}

impl TelemetryTransport for HttpTelemetry {
    fn post(&mut self, bearer_token: &str, payload: &[u8]) -> Result<TelemetryResponse, TransportError> {
        let request = self
            .agent
            .post(&self.config.endpoint)
            .set("Authorization", &format!("Bearer {}", bearer_token))
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");

        match request.send_bytes(payload) {
            Ok(response) => {
                let status = response.status();
                Ok(TelemetryResponse {
                    status,
                    body: Self::response_body(response),
                })
            }
            // The body of an error status still carries instructions.
            Err(ureq::Error::Status(status, response)) => Ok(TelemetryResponse {
                status,
                body: Self::response_body(response),
            }),
            Err(ureq::Error::Transport(e)) => {
                warn!("telemetry endpoint unreachable: {}", e);
                Err(TransportError::NoResponse)
            }
        }
    }
}
