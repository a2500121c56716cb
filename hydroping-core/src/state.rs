//! Persisted device state and the per-boot wake context
//!
//! [`PersistedState`] is the handful of fields that must survive power-off
//! between cycles. On the device it lives in RTC-retained or flash-backed
//! storage; here it is an explicit value owned by the lifecycle controller
//! and passed by reference, never read from ambient globals. It is mutated
//! only by the controller itself or by server-instruction application.
//!
//! [`WakeCause`] is transient: computed once per boot from the hardware
//! wake-cause register and never persisted.

use serde::{Deserialize, Serialize};

use crate::constants::{
    SLEEP_INTERVAL_DEFAULT_US, SLEEP_INTERVAL_MAX_US, SLEEP_INTERVAL_MIN_US,
};
use crate::errors::IntervalOutOfRange;

/// Hardware-reported reason the device left its low-power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// First power-up or reset; no retained state is trustworthy context
    ColdBoot,
    /// The sleep timer expired — a normal measurement wake
    TimerExpiry,
    /// The motion line fired — the user shook the device to provision it
    MotionInterrupt,
}

/// Durable fields surviving power-off between cycles
///
/// Invariant: `sleep_interval_us` is never outside
/// [[`SLEEP_INTERVAL_MIN_US`], [`SLEEP_INTERVAL_MAX_US`]]. Writes outside
/// the range are rejected and the prior value retained, so a store can
/// persist this struct without re-validating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    disconnected: bool,
    in_provisioning: bool,
    sleep_interval_us: u64,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            disconnected: false,
            in_provisioning: false,
            sleep_interval_us: SLEEP_INTERVAL_DEFAULT_US,
        }
    }
}

impl PersistedState {
    /// True when the server has told this device to skip all future
    /// measurement cycles
    pub fn disconnected(&self) -> bool {
        self.disconnected
    }

    /// Mark the device as disconnected (or reconnected after provisioning)
    pub fn set_disconnected(&mut self, disconnected: bool) {
        self.disconnected = disconnected;
    }

    /// Reentrancy guard: true while a provisioning window is open, so a
    /// repeated motion interrupt does not open a second one
    pub fn in_provisioning(&self) -> bool {
        self.in_provisioning
    }

    /// Set or clear the provisioning reentrancy guard
    pub fn set_in_provisioning(&mut self, in_provisioning: bool) {
        self.in_provisioning = in_provisioning;
    }

    /// Duration of the next deep sleep, in microseconds
    pub fn sleep_interval_us(&self) -> u64 {
        self.sleep_interval_us
    }

    /// Update the sleep interval, enforcing the valid range at write time
    ///
    /// Out-of-range values are rejected with [`IntervalOutOfRange`] and the
    /// prior interval is retained.
    pub fn set_sleep_interval(&mut self, interval_us: u64) -> Result<(), IntervalOutOfRange> {
        if !(SLEEP_INTERVAL_MIN_US..=SLEEP_INTERVAL_MAX_US).contains(&interval_us) {
            return Err(IntervalOutOfRange {
                requested: interval_us,
                min: SLEEP_INTERVAL_MIN_US,
                max: SLEEP_INTERVAL_MAX_US,
            });
        }

        self.sleep_interval_us = interval_us;
        Ok(())
    }
}
