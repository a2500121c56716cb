//! Server-issued control instructions
//!
//! The telemetry response body is an opaque JSON object that may carry one
//! directive for the device. Recognition is first-match against a fixed
//! precedence order, and **at most one** instruction is applied per
//! response:
//!
//! 1. `deviceToken` (string) — rotate the stored bearer token
//! 2. `sleepTimeout` (integer microseconds) — change the sleep interval
//! 3. `disconnected` (presence-only) — stop all future measurement cycles
//! 4. `deletedUser` (presence-only) — same effect, different reason
//!
//! A response carrying both a token rotation and an interval change drops
//! the interval change. That is shipped behavior the companion service
//! relies on; do not "fix" it by composing instructions.
//!
//! `Disconnect` and `AccountDeleted` have identical state effects today and
//! stay separate variants so their handling (logging now, possibly
//! messaging later) can diverge without a wire change.

use alloc::string::String;

use log::{info, warn};
use serde_json::Value;

use crate::state::PersistedState;
use crate::store::{save_or_log, ConfigStore, StateStore};

/// One directive decoded from a telemetry response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Replace the stored bearer token with a freshly issued one
    RotateToken(String),
    /// Change the deep-sleep interval, in microseconds (validated on apply)
    SetSleepInterval(u64),
    /// The server disconnected this device; skip future cycles
    Disconnect,
    /// The owning account was deleted; skip future cycles
    AccountDeleted,
}

impl Instruction {
    /// Decode at most one instruction from a response body
    ///
    /// `Ok(None)` means a well-formed document with no recognized directive.
    /// Malformed JSON is an error for the caller to log and ignore — the
    /// reading was already accepted upstream, so decode failure never fails
    /// the upload.
    pub fn decode(body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let doc: Value = serde_json::from_slice(body)?;
        Ok(Self::first_match(&doc))
    }

    /// First recognized key wins; later keys in the same document are
    /// intentionally ignored. A recognized key of the wrong JSON type still
    /// wins the match but yields nothing.
    fn first_match(doc: &Value) -> Option<Self> {
        if let Some(value) = doc.get("deviceToken") {
            return match value.as_str() {
                Some(token) => Some(Self::RotateToken(String::from(token))),
                None => {
                    warn!("deviceToken instruction is not a string; ignored");
                    None
                }
            };
        }

        if let Some(value) = doc.get("sleepTimeout") {
            return match value.as_u64() {
                Some(interval_us) => Some(Self::SetSleepInterval(interval_us)),
                None => {
                    warn!("sleepTimeout instruction is not an unsigned integer; ignored");
                    None
                }
            };
        }

        // Presence-only flags: the value carries no information.
        if doc.get("disconnected").is_some() {
            return Some(Self::Disconnect);
        }

        if doc.get("deletedUser").is_some() {
            return Some(Self::AccountDeleted);
        }

        None
    }

    /// Apply this instruction to the device's durable state
    ///
    /// Persistence failures are logged and swallowed: the in-memory state
    /// keeps the new value for the remainder of the boot, and an interval
    /// outside [1 h, 24 h] is discarded with the prior value retained.
    pub fn apply<C, S>(
        self,
        state: &mut PersistedState,
        config_store: &mut C,
        state_store: &mut S,
    ) where
        C: ConfigStore,
        S: StateStore,
    {
        match self {
            Self::RotateToken(token) => match config_store.update_token(&token) {
                Ok(()) => info!("bearer token rotated"),
                Err(e) => warn!("token rotation not persisted: {}", e),
            },
            Self::SetSleepInterval(interval_us) => match state.set_sleep_interval(interval_us) {
                Ok(()) => {
                    info!("sleep interval updated to {} us", interval_us);
                    save_or_log(state_store, state);
                }
                Err(e) => warn!("sleep interval discarded: {}", e),
            },
            Self::Disconnect => {
                info!("server requested disconnect");
                state.set_disconnected(true);
                save_or_log(state_store, state);
            }
            Self::AccountDeleted => {
                info!("owner account deleted; disconnecting device");
                state.set_disconnected(true);
                save_or_log(state_store, state);
            }
        }
    }
}
