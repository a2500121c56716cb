//! One full measurement boot on the host, no hardware required.
//!
//! Builds a controller over in-memory stores and scripted peripherals,
//! runs a single cycle, and prints the sleep the platform would arm.
//! The fake server answers the upload with a sleep-interval instruction
//! to show the downlink channel working.
//!
//! Run with: `cargo run --example host_cycle`

use hydroping_core::errors::{AssociationError, LinkError, TransportError};
use hydroping_core::provision::{NetworkControl, ProvisioningLink, ProvisioningService};
use hydroping_core::sampler::MoistureProbe;
use hydroping_core::store::{ConfigStore, MemoryConfigStore, MemoryStateStore};
use hydroping_core::time::{Delay, FixedClock, Timestamp};
use hydroping_core::uplink::{TelemetryResponse, TelemetryTransport};
use hydroping_core::{Configuration, DeviceIdentity, LifecycleController, WakeCause};

/// Probe that reads like a pot of moderately damp soil.
struct DampSoil;

impl MoistureProbe for DampSoil {
    fn read_raw(&mut self) -> u32 {
        620
    }
}

/// Delay that advances the simulated clock instead of sleeping.
struct SimDelay<'a>(&'a FixedClock);

impl Delay for SimDelay<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

struct FriendlyNetwork;

impl NetworkControl for FriendlyNetwork {
    fn associate(&mut self, ssid: &str, _password: &str) -> Result<(), AssociationError> {
        println!("[network] associated to {ssid}");
        Ok(())
    }
}

/// Server that acknowledges the reading and pushes a 2 h sleep interval.
struct FakeServer;

impl TelemetryTransport for FakeServer {
    fn post(&mut self, _token: &str, payload: &[u8]) -> Result<TelemetryResponse, TransportError> {
        println!("[server] received {}", String::from_utf8_lossy(payload));
        Ok(TelemetryResponse {
            status: 200,
            body: br#"{"sleepTimeout":7200000000}"#.to_vec(),
        })
    }
}

/// Link for a boot that never opens a provisioning window.
struct UnusedLink;

impl ProvisioningLink for UnusedLink {
    fn open(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
    fn close(&mut self) {}
    fn pump<C: ConfigStore, N: NetworkControl>(
        &mut self,
        _service: &mut ProvisioningService<'_, C, N>,
        _now: Timestamp,
    ) {
    }
}

fn main() {
    let clock = FixedClock::new(0);
    let config = Configuration::new("greenhouse", "secret", "user-42", "token-42")
        .expect("static credentials are complete");

    let mut controller = LifecycleController::new(
        DeviceIdentity::new("AA:BB:CC:DD:EE:FF"),
        MemoryStateStore::new(),
        MemoryConfigStore::with_config(config),
        &clock,
        SimDelay(&clock),
        DampSoil,
        FriendlyNetwork,
        FakeServer,
        UnusedLink,
    );

    let sleep = controller.run(WakeCause::TimerExpiry);

    println!(
        "[device] sleeping for {} s (motion wake armed: {})",
        sleep.duration_us / 1_000_000,
        sleep.motion_wake
    );
}
