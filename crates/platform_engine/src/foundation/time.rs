//! Time management utilities

use std::time::{Duration, Instant};

/// Slack when comparing simulated time against a deadline
pub const TIME_EPSILON: f32 = 1e-4;

/// Simulation clock advanced by explicit fixed steps.
///
/// The running total is kept in `f64` so summing many short steps does not
/// drift below the exact tick time.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick of `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += f64::from(delta_time);
        self.frame_count += 1;
    }

    /// Get the length of the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time
    #[allow(clippy::cast_possible_truncation)]
    pub fn total_time(&self) -> f32 {
        self.total_time as f32
    }

    /// Get the number of ticks advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fires once each time simulated time reaches the next deadline.
///
/// The deadline moves forward by exactly one interval per firing, so a
/// late poll never skips the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    next: f32,
    interval: f32,
}

impl IntervalTimer {
    /// Create a timer first due at `first` and then every `interval`
    pub fn new(first: f32, interval: f32) -> Self {
        Self { next: first, interval }
    }

    /// Time at which the timer next fires
    pub fn next_due(&self) -> f32 {
        self.next
    }

    /// Returns true (and advances the deadline) when `now` has reached it,
    /// within [`TIME_EPSILON`]
    pub fn poll(&mut self, now: f32) -> bool {
        if now + TIME_EPSILON >= self.next {
            self.next += self.interval;
            true
        } else {
            false
        }
    }
}

/// Simple stopwatch for measuring elapsed wall-clock time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start_time = Some(Instant::now());
        stopwatch
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Total elapsed time, including a running lap
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }
}
