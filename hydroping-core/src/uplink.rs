//! Telemetry uplink
//!
//! One reading goes up per measurement cycle, authenticated with the stored
//! bearer token; the response body is the server's instruction channel
//! ([`Instruction`]). The flow is deliberately single-shot:
//!
//! 1. Invalid or missing credentials short-circuit without any network I/O.
//! 2. A transport-level failure (nothing came back) is returned to the
//!    caller, which does not retry — the next scheduled wake is the retry.
//! 3. Any received response, whatever its status, counts as a successful
//!    upload and has its body inspected for an instruction. The shipped
//!    backend sometimes carries instructions on non-2xx responses, so the
//!    status is logged but never gates instruction application.
//! 4. A body that fails to decode is logged and ignored.

use alloc::string::ToString;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::errors::{TransportError, UploadError};
use crate::instruction::Instruction;
use crate::state::PersistedState;
use crate::store::{ConfigStore, StateStore};

/// A response received from the telemetry endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body, an opaque JSON instruction document
    pub body: Vec<u8>,
}

/// Authenticated channel to the fixed telemetry endpoint
///
/// Implementations send `payload` as the request body with
/// `Authorization: Bearer <bearer_token>` and JSON content headers, make
/// exactly one attempt, and return whatever response arrives — including
/// non-2xx statuses. Only "no response at all" is an error.
pub trait TelemetryTransport {
    /// Post one reading payload, returning the response
    fn post(&mut self, bearer_token: &str, payload: &[u8]) -> Result<TelemetryResponse, TransportError>;
}

/// Upload one moisture reading and apply at most one server instruction
///
/// See the module docs for the exact policy. `state` is mutated in place
/// when the response carries an instruction; persistence failures inside
/// instruction application are logged, never returned.
pub fn upload<T, C, S>(
    transport: &mut T,
    config_store: &mut C,
    state_store: &mut S,
    state: &mut PersistedState,
    moisture: u32,
) -> Result<(), UploadError>
where
    T: TelemetryTransport,
    C: ConfigStore,
    S: StateStore,
{
    let config = match config_store.load() {
        Some(config) if config.is_valid() => config,
        _ => return Err(UploadError::MissingCredentials),
    };

    let payload = serde_json::json!({ "moisture": moisture }).to_string();

    let response = transport.post(config.device_token(), payload.as_bytes())?;
    debug!("telemetry delivered, status {}", response.status);

    match Instruction::decode(&response.body) {
        Ok(Some(instruction)) => instruction.apply(state, config_store, state_store),
        Ok(None) => {}
        Err(e) => warn!("instruction payload ignored: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    use crate::config::Configuration;
    use crate::constants::SLEEP_INTERVAL_DEFAULT_US;
    use crate::store::{MemoryConfigStore, MemoryStateStore};

    struct ScriptedTransport {
        response: Result<TelemetryResponse, TransportError>,
        posts: Vec<(String, Vec<u8>)>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                response: Ok(TelemetryResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                posts: vec![],
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                response: Err(error),
                posts: vec![],
            }
        }
    }

    impl TelemetryTransport for ScriptedTransport {
        fn post(
            &mut self,
            bearer_token: &str,
            payload: &[u8],
        ) -> Result<TelemetryResponse, TransportError> {
            self.posts.push((String::from(bearer_token), payload.to_vec()));
            self.response.clone()
        }
    }

    fn provisioned_store() -> MemoryConfigStore {
        MemoryConfigStore::with_config(Configuration::new("home", "pw", "u1", "t1").unwrap())
    }

    #[test]
    fn missing_credentials_short_circuit_without_io() {
        let mut transport = ScriptedTransport::replying(200, "{}");
        let mut config_store = MemoryConfigStore::new();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        let err = upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap_err();

        assert_eq!(err, UploadError::MissingCredentials);
        assert!(transport.posts.is_empty());
    }

    #[test]
    fn reading_is_the_sole_payload_field() {
        let mut transport = ScriptedTransport::replying(200, "{}");
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            777,
        )
        .unwrap();

        let (token, payload) = &transport.posts[0];
        assert_eq!(token, "t1");
        assert_eq!(payload.as_slice(), br#"{"moisture":777}"#);
    }

    #[test]
    fn transport_failure_is_returned_unretried() {
        let mut transport =
            ScriptedTransport::failing(TransportError::NoResponse);
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        let err = upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap_err();

        assert_eq!(err, UploadError::Transport(TransportError::NoResponse));
        // Exactly one attempt.
        assert_eq!(transport.posts.len(), 1);
    }

    #[test]
    fn undecodable_body_still_counts_as_success() {
        let mut transport = ScriptedTransport::replying(200, "not json at all");
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap();

        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn disconnect_instruction_is_applied() {
        let mut transport = ScriptedTransport::replying(200, r#"{"disconnected":true}"#);
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap();

        assert!(state.disconnected());
        assert!(state_store.load().disconnected());
    }

    #[test]
    fn instructions_apply_even_on_error_statuses() {
        let mut transport = ScriptedTransport::replying(403, r#"{"deletedUser":true}"#);
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap();

        assert!(state.disconnected());
    }

    #[test]
    fn precedence_applies_only_the_token_rotation() {
        let mut transport = ScriptedTransport::replying(
            200,
            r#"{"deviceToken":"t2","sleepTimeout":7200000000}"#,
        );
        let mut config_store = provisioned_store();
        let mut state_store = MemoryStateStore::new();
        let mut state = PersistedState::default();

        upload(
            &mut transport,
            &mut config_store,
            &mut state_store,
            &mut state,
            512,
        )
        .unwrap();

        assert_eq!(config_store.load().unwrap().device_token(), "t2");
        // The interval change was silently dropped.
        assert_eq!(state.sleep_interval_us(), SLEEP_INTERVAL_DEFAULT_US);
    }
}
