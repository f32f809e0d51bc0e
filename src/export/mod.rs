//! Export functionality.
//!
//! Provides PNG frame capture, CSV frame-metrics export, and JSON stats snapshots.

mod csv_export;
mod json_export;
mod screenshot;

pub use csv_export::{CsvExporter, FrameRecord};
pub use json_export::{export_stats_json, export_stats_json_to, StatsExport};
pub use screenshot::{save_frame, save_frame_as, save_frame_to};
