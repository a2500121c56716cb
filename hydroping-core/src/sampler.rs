//! Capacitive moisture sampling
//!
//! The sampler bridges to the platform's calibrated read primitive through
//! [`MoistureProbe`] and averages a fixed number of raw reads, each followed
//! by a short settling delay so the sense line recovers between touches.
//!
//! There is deliberately no error path: the hot measurement path stays
//! branch-free so it runs in deterministic time, and a stuck probe simply
//! yields a degenerate (zero or saturated) mean that downstream consumers
//! carry as-is.

use crate::constants::{INTER_SAMPLE_DELAY_MS, SAMPLE_COUNT};
use crate::time::Delay;

/// Calibrated capacitive read primitive, one raw scalar per call
pub trait MoistureProbe {
    /// Read one raw moisture level
    fn read_raw(&mut self) -> u32;
}

/// Averaging sampler over a [`MoistureProbe`]
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    sample_count: u32,
    inter_sample_delay_ms: u32,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            sample_count: SAMPLE_COUNT,
            inter_sample_delay_ms: INTER_SAMPLE_DELAY_MS,
        }
    }
}

impl Sampler {
    /// Sampler with the shipped defaults (8 reads, 5 ms apart)
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the number of reads per sample (at least 1)
    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count.max(1);
        self
    }

    /// Override the settling delay between reads
    pub fn with_inter_sample_delay(mut self, delay_ms: u32) -> Self {
        self.inter_sample_delay_ms = delay_ms;
        self
    }

    /// Arithmetic mean of `sample_count` raw reads
    ///
    /// Accumulates in 64 bits so saturated probes cannot overflow the sum.
    pub fn sample<P: MoistureProbe, D: Delay>(&self, probe: &mut P, delay: &mut D) -> u32 {
        let mut total: u64 = 0;

        for _ in 0..self.sample_count {
            total += u64::from(probe.read_raw());
            delay.delay_ms(self.inter_sample_delay_ms);
        }

        (total / u64::from(self.sample_count)) as u32
    }
}
