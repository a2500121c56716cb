//! Credential configuration written during provisioning
//!
//! [`Configuration`] is the group of four fields the companion app hands
//! over during provisioning: home network credentials, the owning account
//! id, and the bearer token for telemetry uploads. It survives full power
//! loss and firmware updates.
//!
//! Invariant: the four fields are set atomically as a group. There is no
//! constructor or store path that can produce a configuration with only
//! some fields present — validity is "all four present and non-empty".
//! Fields use bounded `heapless` strings because their on-device home is a
//! fixed-size flash slot.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::constants::{PASSWORD_MAX, SSID_MAX, TOKEN_MAX, USER_ID_MAX};
use crate::errors::CredentialsError;

/// The credential group for network association and telemetry uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    ssid: String<SSID_MAX>,
    password: String<PASSWORD_MAX>,
    user_id: String<USER_ID_MAX>,
    device_token: String<TOKEN_MAX>,
}

impl Configuration {
    /// Build a configuration from the four provisioning fields
    ///
    /// All-or-nothing: any empty field yields
    /// [`CredentialsError::Incomplete`], any field over its flash-backed
    /// capacity yields [`CredentialsError::TooLong`], and in either case
    /// nothing is constructed.
    pub fn new(
        ssid: &str,
        password: &str,
        user_id: &str,
        device_token: &str,
    ) -> Result<Self, CredentialsError> {
        if ssid.is_empty() || password.is_empty() || user_id.is_empty() || device_token.is_empty()
        {
            return Err(CredentialsError::Incomplete);
        }

        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| CredentialsError::TooLong)?,
            password: String::try_from(password).map_err(|_| CredentialsError::TooLong)?,
            user_id: String::try_from(user_id).map_err(|_| CredentialsError::TooLong)?,
            device_token: String::try_from(device_token).map_err(|_| CredentialsError::TooLong)?,
        })
    }

    /// SSID of the home network
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Passphrase of the home network
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Opaque identifier of the owning account
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Bearer token for telemetry uploads
    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    /// True when all four fields are present and non-empty
    ///
    /// A constructed `Configuration` always satisfies this; the check exists
    /// because a store may deserialize one from a medium it does not trust.
    pub fn is_valid(&self) -> bool {
        !self.ssid.is_empty()
            && !self.password.is_empty()
            && !self.user_id.is_empty()
            && !self.device_token.is_empty()
    }

    /// Replace the bearer token, keeping the other three fields
    ///
    /// Used by the `RotateToken` server instruction via
    /// [`ConfigStore::update_token`](crate::store::ConfigStore::update_token).
    pub fn set_device_token(&mut self, token: &str) -> Result<(), CredentialsError> {
        if token.is_empty() {
            return Err(CredentialsError::Incomplete);
        }

        self.device_token = String::try_from(token).map_err(|_| CredentialsError::TooLong)?;
        Ok(())
    }
}
