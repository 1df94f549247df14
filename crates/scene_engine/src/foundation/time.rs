//! Time management utilities

use std::time::{Duration, Instant};

/// Frame clock shared with every module hook
///
/// Advanced exactly once per update tick by the scene manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTime {
    delta: Duration,
    elapsed: Duration,
    frame: u64,
}

impl FrameTime {
    /// Start a new tick that lasted `delta`
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }

    /// Time covered by the current tick
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time covered by the current tick in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total time accumulated over all ticks
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of ticks so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: Duration,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Measure the time since the previous tick (should be called once per frame)
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the duration of the last frame
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time spent since the last tick
    pub fn elapsed_since_tick(&self) -> Duration {
        self.last_frame.elapsed()
    }
}

/// Simple stopwatch for measuring elapsed time
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
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}
