//! Host-side transports for the HydroPing lifecycle
//!
//! `hydroping-core` keeps all network plumbing behind traits; this crate
//! holds the implementations that need a real operating system underneath.
//! Today that is one transport:
//!
//! - [`http`] — the production telemetry uplink over HTTPS, implementing
//!   `hydroping_core::TelemetryTransport` with a blocking `ureq` client
//!
//! Simulators and tests use the scripted fakes in `hydroping-core` instead;
//! nothing here is required to run the state machine.

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTelemetry};

use thiserror::Error;

/// Errors raised while constructing a connector
///
/// Runtime transport failures are reported through
/// `hydroping_core::TransportError`; this covers only configuration
/// problems caught before any traffic is sent.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The supplied configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}
