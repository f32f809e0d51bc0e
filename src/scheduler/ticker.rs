//! Frame timestamp source for the host loop.

use std::time::{Duration, Instant};

/// How timestamps advance between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Sleep until each frame's deadline and report wall-clock time
    Realtime,
    /// Advance by exactly one interval per frame without sleeping
    Simulated,
}

/// Produces monotonically increasing frame timestamps in milliseconds
#[derive(Debug, Clone)]
pub struct Ticker {
    mode: TickMode,
    interval: Duration,
    origin: Instant,
    frame: u64,
}

impl Ticker {
    pub fn new(mode: TickMode, fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            mode,
            interval: Duration::from_secs_f64(1.0 / fps),
            origin: Instant::now(),
            frame: 0,
        }
    }

    pub fn realtime(fps: f64) -> Self {
        Self::new(TickMode::Realtime, fps)
    }

    pub fn simulated(fps: f64) -> Self {
        Self::new(TickMode::Simulated, fps)
    }

    pub fn mode(&self) -> TickMode {
        self.mode
    }

    /// Timestamp of the next frame; the first frame is at 0 ms
    pub fn next_timestamp_ms(&mut self) -> f64 {
        let scheduled = self.interval.mul_f64(self.frame as f64);
        self.frame += 1;

        match self.mode {
            TickMode::Simulated => scheduled.as_secs_f64() * 1000.0,
            TickMode::Realtime => {
                let deadline = self.origin + scheduled;
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                }
                self.origin.elapsed().as_secs_f64() * 1000.0
            }
        }
    }
}
