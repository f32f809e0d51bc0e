//! JSON snapshot of fetched repository stats.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::stats::RepoStats;

/// Snapshot file layout
#[derive(Debug, Clone, Serialize)]
pub struct StatsExport {
    pub exported_at: String,
    /// Crate version that wrote the file
    pub version: &'static str,
    pub repo: String,
    pub stats: RepoStats,
}

impl StatsExport {
    fn now(repo: &str, stats: &RepoStats) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            repo: repo.to_string(),
            stats: stats.clone(),
        }
    }
}

/// Export stats to `exports/stats_YYYYMMDD_HHMMSS.json`
pub fn export_stats_json(repo: &str, stats: &RepoStats) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let filename = format!("stats_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    export_stats_json_to(repo, stats, &path)?;
    Ok(path)
}

/// Export stats to a specific file
pub fn export_stats_json_to(repo: &str, stats: &RepoStats, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &StatsExport::now(repo, stats))?;

    log::info!("Stats exported: {}", path.display());
    Ok(())
}
