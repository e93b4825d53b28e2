//! Ballpit Metrics - timing and instrumentation for the simulation driver
//!
//! [`ScopedTimer`] is always compiled: the driver derives its physics step
//! from measured wall-clock time, so timing is not optional.
//!
//! Everything else is instrumentation that vanishes in production builds
//! via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable instrumentation (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use ballpit_metrics::{PhaseProfiler, ScopedTimer};
//!
//! let (_, elapsed) = ScopedTimer::measure(|| engine_step());
//! let mut profiler = PhaseProfiler::new();
//! profiler.record("physics", elapsed);
//! ```

mod timer;

pub use timer::ScopedTimer;

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use counter::Counter;
#[cfg(feature = "metrics")]
pub use phase_profiler::{PhaseProfiler, PhaseTiming};
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTiming {
    pub total: std::time::Duration,
    pub calls: u64,
}

#[cfg(not(feature = "metrics"))]
impl PhaseTiming {
    pub fn mean(&self) -> std::time::Duration { std::time::Duration::ZERO }
}

#[cfg(not(feature = "metrics"))]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn record(&mut self, _name: &'static str, _elapsed: std::time::Duration) {}
    pub fn get_timing(&self, _name: &str) -> PhaseTiming { PhaseTiming::default() }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PhaseTiming)> + '_ { std::iter::empty() }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer;

#[cfg(not(feature = "metrics"))]
impl RingBuffer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn push(&mut self, _sample: f64) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
    pub fn average(&self) -> f64 { 0.0 }
    pub fn min_max(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self { Self }
    pub fn increment(&mut self, _name: &'static str) {}
    pub fn get(&self, _name: &str) -> u64 { 0 }
    pub fn reset_all(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ { std::iter::empty() }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_with_or_without_metrics() {
        let mut profiler = super::PhaseProfiler::new();
        let mut history = super::RingBuffer::new(8);
        let mut counter = super::Counter::new();

        let value = profiler.time_phase("physics", || 3);
        history.push(120.0);
        counter.increment("frames_rendered");

        assert_eq!(value, 3);
        let (_, elapsed) = super::ScopedTimer::measure(|| ());
        assert!(elapsed <= std::time::Duration::from_secs(1));
    }
}
