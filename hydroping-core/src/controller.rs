//! Boot-mode state machine
//!
//! Every boot runs the same three-step program: load durable state, run
//! exactly one of the two boot modes, and return the sleep request that
//! re-arms the next wake.
//!
//! - **Provisioning** (motion interrupt, guard clear): open the local access
//!   point, serve the credential exchange until it completes or the window
//!   times out, tear down, sleep.
//! - **Measuring** (every other wake): sample the probe, associate, upload
//!   one reading, apply at most one server instruction, sleep.
//!
//! The controller never powers the device down itself. It returns a
//! [`SleepRequest`] and the platform entry point performs the actual deep
//! sleep, which keeps the terminal state observable on a host.
//!
//! Graceful degradation is the rule in both modes: a failed store write, a
//! failed association, a dead link — each logs once and falls through to
//! sleep. The next scheduled wake is the retry mechanism.

use log::{error, info, warn};

use crate::constants::{COMPLETION_POLL_INTERVAL_MS, PROVISIONING_TIMEOUT_MS};
use crate::provision::{DeviceIdentity, NetworkControl, ProvisioningLink, ProvisioningService};
use crate::sampler::{MoistureProbe, Sampler};
use crate::state::{PersistedState, WakeCause};
use crate::store::{save_or_log, ConfigStore, StateStore};
use crate::time::{Delay, TimeSource};
use crate::uplink::{self, TelemetryTransport};

/// The two things a boot can be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Open the local access point and wait for credentials
    Provisioning,
    /// Sample, upload, apply instructions
    Measuring,
}

/// What the platform should arm before powering down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRequest {
    /// Deep-sleep duration for the timer wake, in microseconds
    pub duration_us: u64,
    /// Whether the motion-interrupt wake line should stay armed
    pub motion_wake: bool,
}

/// The per-boot lifecycle, generic over every hardware seam
///
/// Owns its collaborators for the duration of one boot. Construct it in the
/// platform entry point with real peripherals, or in a test with scripted
/// fakes, then call [`run`](Self::run) exactly once.
pub struct LifecycleController<S, C, T, D, P, N, U, L>
where
    S: StateStore,
    C: ConfigStore,
    T: TimeSource,
    D: Delay,
    P: MoistureProbe,
    N: NetworkControl,
    U: TelemetryTransport,
    L: ProvisioningLink,
{
    identity: DeviceIdentity,
    sampler: Sampler,
    state_store: S,
    config_store: C,
    clock: T,
    delay: D,
    probe: P,
    network: N,
    transport: U,
    link: L,
}

impl<S, C, T, D, P, N, U, L> LifecycleController<S, C, T, D, P, N, U, L>
where
    S: StateStore,
    C: ConfigStore,
    T: TimeSource,
    D: Delay,
    P: MoistureProbe,
    N: NetworkControl,
    U: TelemetryTransport,
    L: ProvisioningLink,
{
    /// Controller over the given collaborators, with the default sampler
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: DeviceIdentity,
        state_store: S,
        config_store: C,
        clock: T,
        delay: D,
        probe: P,
        network: N,
        transport: U,
        link: L,
    ) -> Self {
        Self {
            identity,
            sampler: Sampler::new(),
            state_store,
            config_store,
            clock,
            delay,
            probe,
            network,
            transport,
            link,
        }
    }

    /// Override the sampler configuration
    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Decide the boot mode from the wake cause and durable state
    ///
    /// A motion interrupt opens a provisioning window unless the reentrancy
    /// guard says one was already open when power was lost. Every other wake
    /// measures, including the guarded motion wake that clears the stale
    /// guard on its way through.
    pub fn boot_mode(wake: WakeCause, state: &PersistedState) -> BootMode {
        match wake {
            WakeCause::MotionInterrupt if !state.in_provisioning() => BootMode::Provisioning,
            WakeCause::MotionInterrupt => {
                info!("motion wake with provisioning guard set; measuring instead");
                BootMode::Measuring
            }
            WakeCause::ColdBoot | WakeCause::TimerExpiry => BootMode::Measuring,
        }
    }

    /// Run one full boot and return the sleep to arm
    pub fn run(&mut self, wake: WakeCause) -> SleepRequest {
        let mut state = self.state_store.load();
        let mode = Self::boot_mode(wake, &state);

        // A set guard here means a window lost power mid-flight; clear it so
        // the next motion wake can open a fresh one.
        if state.in_provisioning() {
            state.set_in_provisioning(false);
            save_or_log(&mut self.state_store, &state);
        }

        match mode {
            BootMode::Provisioning => self.run_provisioning(&mut state),
            BootMode::Measuring => self.run_measurement(&mut state),
        }

        // Motion wake stays armed even for a disconnected device, so the
        // owner can always re-provision by shaking it.
        SleepRequest {
            duration_us: state.sleep_interval_us(),
            motion_wake: true,
        }
    }

    /// One provisioning window: AP up, serve until complete or timed out
    fn run_provisioning(&mut self, state: &mut PersistedState) {
        // Guard first, before the link can fail: a crash mid-window must not
        // leave the next motion wake reopening a half-torn-down AP.
        state.set_in_provisioning(true);
        save_or_log(&mut self.state_store, state);

        match self.link.open() {
            Ok(()) => {
                self.serve_window(state);
                self.link.close();
            }
            Err(e) => error!("provisioning link not opened: {}", e),
        }

        state.set_in_provisioning(false);
        save_or_log(&mut self.state_store, state);
    }

    fn serve_window(&mut self, state: &mut PersistedState) {
        let Self {
            identity,
            config_store,
            network,
            link,
            clock,
            delay,
            ..
        } = self;

        let mut service = ProvisioningService::new(identity, config_store, network, state);
        let started = clock.now();
        info!("provisioning window open");

        loop {
            let now = clock.now();
            if now.saturating_sub(started) >= PROVISIONING_TIMEOUT_MS {
                warn!("provisioning window timed out");
                break;
            }

            link.pump(&mut service, now);

            if service.is_complete(now) {
                info!("provisioning complete");
                break;
            }

            delay.delay_ms(COMPLETION_POLL_INTERVAL_MS);
        }
    }

    /// One measurement cycle: sample, associate, upload
    fn run_measurement(&mut self, state: &mut PersistedState) {
        if state.disconnected() {
            info!("device is disconnected; skipping measurement cycle");
            return;
        }

        let moisture = self.sampler.sample(&mut self.probe, &mut self.delay);

        let config = match self.config_store.load() {
            Some(config) if config.is_valid() => config,
            _ => {
                warn!("no complete credentials; reading {} discarded", moisture);
                return;
            }
        };

        if let Err(e) = self.network.associate(config.ssid(), config.password()) {
            warn!("association failed; reading {} discarded: {}", moisture, e);
            return;
        }

        match uplink::upload(
            &mut self.transport,
            &mut self.config_store,
            &mut self.state_store,
            state,
            moisture,
        ) {
            Ok(()) => info!("reading {} uploaded", moisture),
            Err(e) => warn!("upload failed: {}", e),
        }
    }
}
