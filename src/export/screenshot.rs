//! PNG capture of a composited frame.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::render::PixelCanvas;

/// Save a frame to the screenshots directory.
///
/// Creates the screenshots directory if it doesn't exist.
/// Filename is auto-generated with timestamp: `frame_YYYYMMDD_HHMMSS.png`
pub fn save_frame(canvas: &PixelCanvas) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    save_frame_as(canvas, &format!("frame_{}.png", timestamp))
}

/// Save a frame to the screenshots directory under `filename`
pub fn save_frame_as(canvas: &PixelCanvas, filename: &str) -> Result<PathBuf> {
    let dir = PathBuf::from("screenshots");
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(filename);
    save_frame_to(canvas, &path)?;
    Ok(path)
}

/// Save a frame to an explicit path
pub fn save_frame_to(canvas: &PixelCanvas, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &canvas.to_rgba8(),
        canvas.width_px(),
        canvas.height_px(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Frame saved: {}", path.display());
    Ok(())
}
