//! Local-AP provisioning protocol
//!
//! While provisioning, the device broadcasts an open access point
//! ([`crate::constants::AP_SSID`]) and serves two endpoints over the
//! unauthenticated local link — the trust boundary is physical proximity
//! to the broadcast:
//!
//! - `GET /info` → `200 {deviceId, hardwareVersion, firmwareVersion}`,
//!   idempotent and side-effect-free
//! - `POST /connect` with `{ssid, password, userid, devicetoken}` →
//!   persist the credential group, attempt association, `200` or `400`
//!
//! The handlers here are plain synchronous request/response functions; the
//! reactor or async HTTP machinery that invokes them is the platform's
//! concern, modeled by [`ProvisioningLink`]. Handlers take the current
//! timestamp instead of holding a clock, so every path is deterministic
//! under test.
//!
//! A successful `/connect` does not end the window immediately: completion
//! is armed one grace period in the future
//! ([`crate::constants::COMPLETION_GRACE_MS`]) so the `200` response can
//! flush before the access point drops.

use alloc::string::{String, ToString};

use log::{info, warn};
use serde_json::{json, Value};

use crate::config::Configuration;
use crate::constants::{COMPLETION_GRACE_MS, FIRMWARE_VERSION, HARDWARE_VERSION};
use crate::errors::{AssociationError, CredentialsError, LinkError};
use crate::state::PersistedState;
use crate::store::ConfigStore;
use crate::time::Timestamp;

/// Identity reported by `GET /info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Hardware address of the device, e.g. its AP MAC
    pub device_id: String,
    /// Hardware revision string
    pub hardware_version: &'static str,
    /// Firmware revision string
    pub firmware_version: &'static str,
}

impl DeviceIdentity {
    /// Identity with the shipped hardware/firmware revisions
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            hardware_version: HARDWARE_VERSION,
            firmware_version: FIRMWARE_VERSION,
        }
    }
}

/// Status and JSON body a handler sends back over the local link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON response body
    pub body: String,
}

impl ServiceResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    fn bad_request(error: &str) -> Self {
        Self {
            status: 400,
            body: json!({ "error": error }).to_string(),
        }
    }
}

/// Single bounded attempt to join a network as a station
///
/// Implementations wait at most
/// [`crate::constants::ASSOCIATION_WAIT_MS`] and never back off: the next
/// scheduled wake is the retry mechanism.
pub trait NetworkControl {
    /// Associate to `ssid` with `password`, bounded wait, one attempt
    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), AssociationError>;
}

/// The access point + listener that delivers requests to the service
///
/// The controller opens the link when entering provisioning, pumps it once
/// per poll tick, and closes it on exit. `pump` dispatches any requests
/// that arrived since the last tick to the service's handlers — on
/// hardware that means draining the listener's completion events, in tests
/// it means replaying a script.
pub trait ProvisioningLink {
    /// Bring up the access point and listener
    fn open(&mut self) -> Result<(), LinkError>;

    /// Tear down the listener and access point
    fn close(&mut self);

    /// Deliver pending requests to the service handlers
    fn pump<C: ConfigStore, N: NetworkControl>(
        &mut self,
        service: &mut ProvisioningService<'_, C, N>,
        now: Timestamp,
    );
}

/// The two-endpoint credential exchange, live for one provisioning window
pub struct ProvisioningService<'a, C: ConfigStore, N: NetworkControl> {
    identity: &'a DeviceIdentity,
    config_store: &'a mut C,
    network: &'a mut N,
    state: &'a mut PersistedState,
    completion_deadline: Option<Timestamp>,
}

impl<'a, C: ConfigStore, N: NetworkControl> ProvisioningService<'a, C, N> {
    /// Service over the given stores and network control for one window
    pub fn new(
        identity: &'a DeviceIdentity,
        config_store: &'a mut C,
        network: &'a mut N,
        state: &'a mut PersistedState,
    ) -> Self {
        Self {
            identity,
            config_store,
            network,
            state,
            completion_deadline: None,
        }
    }

    /// `GET /info`: device identity, idempotent, no side effects
    pub fn handle_info(&self) -> ServiceResponse {
        ServiceResponse::ok(json!({
            "deviceId": self.identity.device_id,
            "hardwareVersion": self.identity.hardware_version,
            "firmwareVersion": self.identity.firmware_version,
        }))
    }

    /// `POST /connect`: receive credentials, persist, attempt association
    ///
    /// On association failure the just-saved credentials are kept, so a
    /// retrying client only needs to correct `ssid`/`password`.
    pub fn handle_connect(&mut self, body: &[u8], now: Timestamp) -> ServiceResponse {
        let doc: Value = match serde_json::from_slice(body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("connect request rejected: {}", e);
                return ServiceResponse::bad_request("Invalid JSON");
            }
        };

        let field = |key: &str| doc.get(key).and_then(Value::as_str).unwrap_or("");

        let config = match Configuration::new(
            field("ssid"),
            field("password"),
            field("userid"),
            field("devicetoken"),
        ) {
            Ok(config) => config,
            Err(CredentialsError::Incomplete) => {
                warn!("connect request rejected: incomplete credentials");
                return ServiceResponse::bad_request("Missing complete credentials");
            }
            Err(CredentialsError::TooLong) => {
                warn!("connect request rejected: oversized credential field");
                return ServiceResponse::bad_request("Credential field too long");
            }
        };

        // Commit before associating: the credentials are kept even when the
        // join fails, and a failed write still leaves the in-memory group
        // usable for this attempt.
        if let Err(e) = self.config_store.save(&config) {
            warn!("configuration write skipped: {}", e);
        }

        match self.network.associate(config.ssid(), config.password()) {
            Ok(()) => {
                info!("associated to {}", config.ssid());
                self.state.set_disconnected(false);
                self.completion_deadline = Some(now + COMPLETION_GRACE_MS);
                ServiceResponse::ok(json!({ "message": "connected to wifi" }))
            }
            Err(e) => {
                warn!("association failed during provisioning: {}", e);
                ServiceResponse::bad_request("connection failed, try again")
            }
        }
    }

    /// The cycle-completion signal the controller polls
    ///
    /// True once the post-`/connect` grace period has elapsed.
    pub fn is_complete(&self, now: Timestamp) -> bool {
        self.completion_deadline
            .map(|deadline| now >= deadline)
            .unwrap_or(false)
    }
}
