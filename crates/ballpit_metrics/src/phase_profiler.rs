//! Accumulated timings for the phases of a driver iteration

use std::collections::BTreeMap;
use std::time::Duration;

use crate::ScopedTimer;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTiming {
    pub total: Duration,
    pub calls: u64,
}

impl PhaseTiming {
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls as u32
        }
    }
}

pub struct PhaseProfiler {
    timings: BTreeMap<&'static str, PhaseTiming>,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self {
            timings: BTreeMap::new(),
        }
    }

    pub fn time_phase<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let (result, elapsed) = ScopedTimer::measure(f);
        self.record(name, elapsed);
        result
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let timing = self.timings.entry(name).or_default();
        timing.total += elapsed;
        timing.calls += 1;
    }

    pub fn get_timing(&self, name: &str) -> PhaseTiming {
        self.timings.get(name).copied().unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PhaseTiming)> + '_ {
        self.timings.iter().map(|(&name, &timing)| (name, timing))
    }
}

impl Default for PhaseProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_total_and_mean() {
        let mut profiler = PhaseProfiler::new();
        profiler.record("physics", Duration::from_millis(4));
        profiler.record("physics", Duration::from_millis(6));

        let timing = profiler.get_timing("physics");
        assert_eq!(timing.calls, 2);
        assert_eq!(timing.total, Duration::from_millis(10));
        assert_eq!(timing.mean(), Duration::from_millis(5));
        assert_eq!(profiler.get_timing("render"), PhaseTiming::default());
    }

    #[test]
    fn test_time_phase_passes_result_through() {
        let mut profiler = PhaseProfiler::new();
        let value = profiler.time_phase("resort", || 7);
        assert_eq!(value, 7);
        assert_eq!(profiler.get_timing("resort").calls, 1);
    }
}
