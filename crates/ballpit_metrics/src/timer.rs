//! Scoped wall-clock timing

use std::time::{Duration, Instant};

/// Measures the wall-clock duration of one operation.
///
/// The interval is only meaningful once the scope has been closed with
/// [`ScopedTimer::stop`]; before that it reads as zero.
pub struct ScopedTimer {
    start: Instant,
    interval: Option<Duration>,
}

impl ScopedTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            interval: None,
        }
    }

    /// Close the scope and return the measured interval.
    ///
    /// Stopping twice keeps the first measurement.
    pub fn stop(&mut self) -> Duration {
        *self.interval.get_or_insert_with(|| self.start.elapsed())
    }

    pub fn interval(&self) -> Duration {
        self.interval.unwrap_or(Duration::ZERO)
    }

    /// Run `f` inside a timed scope.
    pub fn measure<F, R>(f: F) -> (R, Duration)
    where
        F: FnOnce() -> R,
    {
        let mut timer = Self::start();
        let result = f();
        (result, timer.stop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_is_zero_until_stopped() {
        let timer = ScopedTimer::start();
        assert_eq!(timer.interval(), Duration::ZERO);
    }

    #[test]
    fn test_stop_keeps_first_measurement() {
        let mut timer = ScopedTimer::start();
        std::thread::sleep(Duration::from_millis(2));
        let first = timer.stop();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(timer.stop(), first);
        assert_eq!(timer.interval(), first);
        assert!(first >= Duration::from_millis(2));
    }

    #[test]
    fn test_measure_returns_result_and_interval() {
        let (value, elapsed) = ScopedTimer::measure(|| {
            std::thread::sleep(Duration::from_millis(1));
            42
        });
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::from_millis(1));
    }
}
