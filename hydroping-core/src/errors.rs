//! Error types for the HydroPing lifecycle
//!
//! ## Design Philosophy
//!
//! The error system is built for a device that sleeps between failures:
//!
//! 1. **Nothing is fatal.** Every error here degrades to "do less this
//!    cycle"; the next scheduled wake retries. There is no crash-and-restart
//!    path distinct from the normal sleep/wake cycle.
//!
//! 2. **No heap allocation.** Error data is inline — no `String`, only
//!    `&'static str` context — so errors can cross the no_std boundary and
//!    be logged from any path.
//!
//! 3. **Copy semantics.** All variants are small and `Copy` so they can be
//!    returned and logged without move gymnastics.
//!
//! ## Taxonomy
//!
//! - [`UploadError`] — the telemetry uplink precondition and transport
//!   failures; the caller never retries within a cycle.
//! - [`TransportError`] — request-level network failure (no response at all).
//! - [`CredentialsError`] — a credential group that is not all-present or
//!   does not fit its flash-backed slot.
//! - [`AssociationError`] — a bounded network join attempt that gave up.
//! - [`StoreError`] — a durable write that did not commit; the in-memory
//!   value is still used for the remainder of the boot.
//! - [`IntervalOutOfRange`] — a sleep-interval write outside [1 h, 24 h];
//!   the prior value is retained.
//! - [`LinkError`] — the provisioning access point failed to come up.

use thiserror_no_std::Error;

/// Telemetry upload failures (spec'd: caller does not retry this cycle)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    /// Configuration is missing or incomplete; no network I/O was attempted
    #[error("credentials missing or incomplete")]
    MissingCredentials,

    /// The request failed at the network layer before any response arrived
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

/// Network-layer failure producing no response at all
///
/// A response with a non-2xx status is *not* a transport error: the reading
/// was delivered and the body may still carry an instruction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be reached (DNS, connect, TLS)
    #[error("telemetry endpoint unreachable: {reason}")]
    Unreachable {
        /// Short static description of the failure point
        reason: &'static str,
    },

    /// The request was sent but no response came back
    #[error("no response from telemetry endpoint")]
    NoResponse,
}

/// A credential group that cannot be stored as-is
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    /// One or more of the four required fields is empty
    #[error("missing complete credentials")]
    Incomplete,

    /// A field exceeds its flash-backed capacity
    #[error("credential field too long")]
    TooLong,
}

/// A single bounded association attempt that did not join the network
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationError {
    /// The join did not complete within the bounded wait
    #[error("association timed out")]
    Timeout,

    /// The network stack rejected the attempt outright
    #[error("association failed: {reason}")]
    Failed {
        /// Short static description from the network stack
        reason: &'static str,
    },
}

/// A durable-store write that did not commit
///
/// Store writes are all-or-nothing with respect to power loss; a failed
/// write leaves the previously committed value intact.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The backing medium refused the write
    #[error("store write failed: {reason}")]
    WriteFailed {
        /// Short static description from the backing store
        reason: &'static str,
    },

    /// A token update was requested but no credential group is stored
    #[error("token update without stored credentials")]
    NoCredentials,

    /// The value itself was rejected before reaching the medium
    #[error("rejected value: {0}")]
    Rejected(#[from] CredentialsError),
}

/// A sleep-interval write outside the valid range
///
/// The prior interval is always retained when this is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sleep interval {requested} us outside [{min}, {max}] us")]
pub struct IntervalOutOfRange {
    /// The rejected interval, in microseconds
    pub requested: u64,
    /// Minimum accepted interval, in microseconds
    pub min: u64,
    /// Maximum accepted interval, in microseconds
    pub max: u64,
}

/// The provisioning access point or listener failed to start
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The local access point could not be brought up
    #[error("access point failed to start: {reason}")]
    ApStart {
        /// Short static description from the radio stack
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for UploadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MissingCredentials => defmt::write!(fmt, "credentials missing"),
            Self::Transport(e) => defmt::write!(fmt, "transport failure: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unreachable { reason } => defmt::write!(fmt, "unreachable: {}", reason),
            Self::NoResponse => defmt::write!(fmt, "no response"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IntervalOutOfRange {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "interval {} us outside [{}, {}]",
            self.requested,
            self.min,
            self.max
        );
    }
}
