//! Device lifecycle controller for the HydroPing soil-moisture probe
//!
//! HydroPing is a battery-powered sensor node that spends almost all of its
//! life in deep sleep. Every boot is a fresh run of a small state machine:
//! decide between a provisioning window and a measurement cycle, do the work,
//! and re-arm the next sleep interval. This crate contains that state machine
//! and everything it owns:
//!
//! - durable state that survives power-off between cycles ([`state`], [`store`])
//! - credential configuration written during provisioning ([`config`])
//! - the capacitive-probe sampler ([`sampler`])
//! - the telemetry uplink and the server instruction channel ([`uplink`],
//!   [`instruction`])
//! - the local-AP provisioning protocol ([`provision`])
//! - the boot-mode state machine itself ([`controller`])
//!
//! Hardware and network plumbing stay behind traits (`MoistureProbe`,
//! `NetworkControl`, `TelemetryTransport`, `ProvisioningLink`, the stores,
//! `TimeSource`/`Delay`), so the whole lifecycle runs deterministically on a
//! desktop host for tests and simulators.
//!
//! Key constraints:
//! - No failure here is fatal: every degraded path logs once and falls
//!   through to sleep; the next scheduled wake is the retry mechanism.
//! - Durable writes are all-or-nothing with respect to power loss.
//! - The measurement hot path is branch-free and allocation-free.
//!
//! ```no_run
//! use hydroping_core::{Sampler, sampler::MoistureProbe, time::NoopDelay};
//!
//! struct Probe;
//! impl MoistureProbe for Probe {
//!     fn read_raw(&mut self) -> u32 { 512 }
//! }
//!
//! let sampler = Sampler::new();
//! let moisture = sampler.sample(&mut Probe, &mut NoopDelay);
//! assert_eq!(moisture, 512);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod instruction;
pub mod provision;
pub mod sampler;
pub mod state;
pub mod store;
pub mod time;
pub mod uplink;

// Public API
pub use config::Configuration;
pub use controller::{BootMode, LifecycleController, SleepRequest};
pub use errors::{
    AssociationError, CredentialsError, IntervalOutOfRange, LinkError, StoreError,
    TransportError, UploadError,
};
pub use instruction::Instruction;
pub use provision::{DeviceIdentity, ProvisioningService, ServiceResponse};
pub use sampler::Sampler;
pub use state::{PersistedState, WakeCause};
pub use store::{ConfigStore, StateStore};
pub use time::{Delay, TimeSource, Timestamp};
pub use uplink::{TelemetryResponse, TelemetryTransport};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
