//! CSV time-series export for frame metrics.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::FrameMetrics;

/// One CSV row
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    /// Frame timestamp (ms)
    pub time_ms: f64,
    pub frame: u64,
    pub fps: u32,
    pub particle_count: usize,
    pub link_count: usize,
    pub flake_count: usize,
    /// Applied parallax translation (px)
    pub parallax_offset_px: f32,
}

impl From<&FrameMetrics> for FrameRecord {
    fn from(m: &FrameMetrics) -> Self {
        Self {
            time_ms: m.timestamp_ms,
            frame: m.frame_count,
            fps: m.fps,
            particle_count: m.layers.particle_count,
            link_count: m.layers.link_count,
            flake_count: m.layers.flake_count,
            parallax_offset_px: m.layers.parallax_offset_px,
        }
    }
}

/// CSV exporter for frame metrics
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Minimum time between rows (ms)
    sample_interval_ms: f64,
    last_sample_ms: Option<f64>,
    path: PathBuf,
}

impl CsvExporter {
    /// Create an exporter writing to `exports/frames_YYYYMMDD_HHMMSS.csv`
    pub fn new(sample_interval_ms: f64) -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::create(dir.join(format!("frames_{}.csv", timestamp)), sample_interval_ms)
    }

    /// Create an exporter writing to `path`
    pub fn create<P: AsRef<Path>>(path: P, sample_interval_ms: f64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = csv::Writer::from_writer(File::create(&path)?);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval_ms,
            last_sample_ms: None,
            path,
        })
    }

    /// Record a row if the sample interval has elapsed
    pub fn maybe_record(&mut self, metrics: &FrameMetrics) -> Result<bool> {
        let due = match self.last_sample_ms {
            Some(last) => metrics.timestamp_ms - last >= self.sample_interval_ms,
            None => true,
        };
        if due {
            self.record(metrics)?;
        }
        Ok(due)
    }

    /// Record a row regardless of interval
    pub fn record(&mut self, metrics: &FrameMetrics) -> Result<()> {
        self.writer.serialize(FrameRecord::from(metrics))?;
        self.last_sample_ms = Some(metrics.timestamp_ms);
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
