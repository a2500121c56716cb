//! Time and delay abstraction for the lifecycle
//!
//! The controller only ever measures intervals — provisioning timeout,
//! completion grace, settling delays — so a monotonic millisecond counter is
//! all it needs. The traits here let the same state machine run against a
//! hardware timer on the device and against a scripted clock in tests.
//!
//! Implementations:
//! - [`FixedClock`] — settable/advancing clock for deterministic tests
//! - [`SystemClock`] — monotonic host clock (std only)
//! - [`NoopDelay`] / [`ThreadDelay`] — delay providers for tests and hosts

use core::cell::Cell;

/// Timestamp in milliseconds since an arbitrary monotonic epoch
/// (typically device boot)
pub type Timestamp = u64;

/// Source of monotonic time for the lifecycle
///
/// `now()` must never go backwards within one boot. The epoch is arbitrary;
/// only differences are meaningful.
pub trait TimeSource {
    /// Get the current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

// Shared references are enough to read a clock; this lets a test keep a
// handle to the clock it hands to the controller.
impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Blocking (or cooperatively yielding) delay provider
///
/// Used between raw sensor reads and between provisioning poll ticks. On
/// hardware this maps to a timer wait; in tests it usually advances a
/// [`FixedClock`] instead of sleeping.
pub trait Delay {
    /// Wait for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Controllable clock for deterministic tests
///
/// Interior mutability lets a test advance the clock through a shared
/// reference while the controller reads it through another.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: Cell<Timestamp>,
}

impl FixedClock {
    /// Create a clock starting at `start_ms`
    pub fn new(start_ms: Timestamp) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Jump the clock to an absolute timestamp
    pub fn set(&self, timestamp: Timestamp) {
        self.now_ms.set(timestamp);
    }

    /// Move the clock forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.now_ms.get()
    }
}

/// Delay provider that does nothing
///
/// Useful where the settling time is irrelevant (simulators, sampler tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl Delay for NoopDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

/// Monotonic host clock, milliseconds since construction (std only)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Create a clock whose epoch is "now"
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Delay provider backed by `std::thread::sleep` (std only)
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

#[cfg(feature = "std")]
impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
