//! Durable stores for state and configuration
//!
//! Two small trait contracts abstract whatever retention mechanism the
//! platform has — an NVS partition, a flat file, a preallocated flash
//! region. The contract is the interesting part, not the mechanism:
//!
//! - **Atomic with respect to power loss.** A crash mid-write must leave
//!   the store in either the pre- or post-write state, never a mix. Losing
//!   only the in-flight write is acceptable.
//! - **Default on absence.** A store that has never been written returns
//!   safe defaults ([`PersistedState::default`]) or `None`.
//! - **Failure is non-fatal.** A failed write is logged and the in-memory
//!   value used for the remainder of the boot; there are no retries. The
//!   [`save_or_log`] helper is the one place that policy lives.
//!
//! [`MemoryStateStore`] and [`MemoryConfigStore`] are the in-crate
//! reference implementations, used by the integration harness and host
//! simulators. They can simulate write failure and count commits.

use log::warn;

use crate::config::Configuration;
use crate::errors::StoreError;
use crate::state::PersistedState;

/// Durable store for [`PersistedState`]
pub trait StateStore {
    /// Load the committed state, or defaults if never written
    fn load(&mut self) -> PersistedState;

    /// Commit the state, all-or-nothing with respect to power loss
    fn save(&mut self, state: &PersistedState) -> Result<(), StoreError>;
}

/// Durable store for the credential [`Configuration`]
pub trait ConfigStore {
    /// Load the committed configuration, or `None` if never provisioned
    fn load(&mut self) -> Option<Configuration>;

    /// Commit a complete credential group, all-or-nothing
    fn save(&mut self, config: &Configuration) -> Result<(), StoreError>;

    /// Replace only the bearer token, reusing the stored credentials
    ///
    /// Returns [`StoreError::NoCredentials`] when nothing is stored yet: a
    /// token on its own would violate the all-four-fields invariant.
    fn update_token(&mut self, token: &str) -> Result<(), StoreError>;
}

/// Persist `state`, logging instead of failing when the write is refused
///
/// This is the `PersistenceWriteSkipped` policy: the caller keeps using its
/// in-memory value and the next wake retries naturally.
pub fn save_or_log<S: StateStore>(store: &mut S, state: &PersistedState) {
    if let Err(e) = store.save(state) {
        warn!("state write skipped: {}", e);
    }
}

/// In-memory [`StateStore`] with injectable write failure
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    committed: Option<PersistedState>,
    fail_writes: bool,
    commits: u32,
}

impl MemoryStateStore {
    /// Empty store: loads return defaults until the first commit
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an already-committed state
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            committed: Some(state),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail (or succeed again)
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful commits so far
    pub fn commit_count(&self) -> u32 {
        self.commits
    }
}

impl StateStore for MemoryStateStore {
    fn load(&mut self) -> PersistedState {
        self.committed.unwrap_or_default()
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed {
                reason: "simulated write failure",
            });
        }

        self.committed = Some(*state);
        self.commits += 1;
        Ok(())
    }
}

/// In-memory [`ConfigStore`] with injectable write failure
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    committed: Option<Configuration>,
    fail_writes: bool,
    commits: u32,
}

impl MemoryConfigStore {
    /// Empty store: the device has never been provisioned
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an already-committed configuration
    pub fn with_config(config: Configuration) -> Self {
        Self {
            committed: Some(config),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful commits so far
    pub fn commit_count(&self) -> u32 {
        self.commits
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&mut self) -> Option<Configuration> {
        self.committed.clone()
    }

    fn save(&mut self, config: &Configuration) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed {
                reason: "simulated write failure",
            });
        }

        self.committed = Some(config.clone());
        self.commits += 1;
        Ok(())
    }

    fn update_token(&mut self, token: &str) -> Result<(), StoreError> {
        // Build the post-write value first so the commit stays all-or-nothing.
        let mut updated = self.committed.clone().ok_or(StoreError::NoCredentials)?;
        updated.set_device_token(token)?;
        self.save(&updated)
    }
}
