//! Per-frame metrics for logging and export.

use serde::{Deserialize, Serialize};

/// Counters reported by a single layer after a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub particle_count: usize,
    pub link_count: usize,
    pub flake_count: usize,
    /// Applied parallax translation (px)
    pub parallax_offset_px: f32,
}

impl LayerStats {
    /// Sum of two layers' counters; the parallax offset of `other` wins when set
    pub fn merge(self, other: LayerStats) -> LayerStats {
        LayerStats {
            particle_count: self.particle_count + other.particle_count,
            link_count: self.link_count + other.link_count,
            flake_count: self.flake_count + other.flake_count,
            parallax_offset_px: if other.parallax_offset_px != 0.0 {
                other.parallax_offset_px
            } else {
                self.parallax_offset_px
            },
        }
    }
}

/// Aggregated stage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Timestamp of the latest frame (ms)
    pub timestamp_ms: f64,
    /// Frames recorded so far
    pub frame_count: u64,
    /// Frames counted over the last complete one-second window
    pub fps: u32,
    /// Layer counters from the latest frame
    pub layers: LayerStats,

    #[serde(skip)]
    window_start_ms: Option<f64>,
    #[serde(skip)]
    window_frames: u32,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `timestamp_ms` with the counters the layers reported
    pub fn record_frame(&mut self, timestamp_ms: f64, layers: LayerStats) {
        self.timestamp_ms = timestamp_ms;
        self.frame_count += 1;
        self.layers = layers;

        let window_start = *self.window_start_ms.get_or_insert(timestamp_ms);
        self.window_frames += 1;
        if timestamp_ms - window_start >= 1000.0 {
            self.fps = self.window_frames;
            self.window_frames = 0;
            self.window_start_ms = Some(timestamp_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_over_one_second() {
        let mut metrics = FrameMetrics::new();
        for i in 0..=60 {
            metrics.record_frame(i as f64 * 1000.0 / 60.0, LayerStats::default());
        }
        assert_eq!(metrics.frame_count, 61);
        assert_eq!(metrics.fps, 61);
    }

    #[test]
    fn test_merge_counts() {
        let field = LayerStats {
            particle_count: 40,
            link_count: 12,
            flake_count: 0,
            parallax_offset_px: -3.0,
        };
        let snow = LayerStats {
            flake_count: 90,
            ..Default::default()
        };
        let merged = field.merge(snow);
        assert_eq!(merged.particle_count, 40);
        assert_eq!(merged.flake_count, 90);
        assert_eq!(merged.parallax_offset_px, -3.0);
    }
}
