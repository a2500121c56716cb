//! Protocol and timing constants for the HydroPing lifecycle
//!
//! Every tunable the lifecycle depends on lives here with its unit in the
//! name or the doc comment. Values come from the shipped device behavior;
//! changing one changes the observable protocol, so they are deliberately
//! not runtime-configurable.

/// Number of raw capacitive reads averaged into one moisture sample.
pub const SAMPLE_COUNT: u32 = 8;

/// Settling delay between consecutive raw reads, in milliseconds.
pub const INTER_SAMPLE_DELAY_MS: u32 = 5;

/// Hard cap on a provisioning window. After this the access point is torn
/// down and the device goes back to sleep whether or not credentials arrived.
pub const PROVISIONING_TIMEOUT_MS: u64 = 10 * 60 * 1_000;

/// Cadence at which the controller polls for provisioning completion.
pub const COMPLETION_POLL_INTERVAL_MS: u32 = 100;

/// Grace period between a successful `/connect` response and provisioning
/// teardown, so the response can flush before the access point drops.
pub const COMPLETION_GRACE_MS: u64 = 1_000;

/// Lower bound on the persisted sleep interval: 1 hour, in microseconds.
pub const SLEEP_INTERVAL_MIN_US: u64 = 60 * 60 * 1_000_000;

/// Upper bound on the persisted sleep interval: 24 hours, in microseconds.
pub const SLEEP_INTERVAL_MAX_US: u64 = 24 * 60 * 60 * 1_000_000;

/// Default sleep interval on a device that has never been told otherwise:
/// 12 hours, in microseconds.
pub const SLEEP_INTERVAL_DEFAULT_US: u64 = 12 * 60 * 60 * 1_000_000;

/// Bounded wait for a single network association attempt, in milliseconds.
/// `NetworkControl` implementations must give up within this window; there
/// is no backoff because the next scheduled wake is the retry.
pub const ASSOCIATION_WAIT_MS: u64 = 10_000;

/// SSID of the open access point the device broadcasts while provisioning.
pub const AP_SSID: &str = "HydroPing-Wi-Fi";

/// Hardware revision reported by `GET /info`.
pub const HARDWARE_VERSION: &str = "1.0";

/// Firmware revision reported by `GET /info`.
pub const FIRMWARE_VERSION: &str = "1.0";

/// Capacity of the stored network SSID, in bytes (802.11 limit).
pub const SSID_MAX: usize = 32;

/// Capacity of the stored network passphrase, in bytes.
pub const PASSWORD_MAX: usize = 64;

/// Capacity of the stored owning-account identifier, in bytes.
pub const USER_ID_MAX: usize = 64;

/// Capacity of the stored bearer token, in bytes. Tokens are rotated by
/// server instruction and must fit the flash-backed slot.
pub const TOKEN_MAX: usize = 512;
