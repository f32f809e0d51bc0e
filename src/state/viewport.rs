//! Viewport signal snapshot.

use serde::{Deserialize, Serialize};

/// Size of the visible page area in CSS pixels plus its device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width (CSS px)
    pub width: f32,
    /// Height (CSS px)
    pub height: f32,
    /// Physical pixels per CSS pixel as reported by the host
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Viewport at a device pixel ratio of 1
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, device_pixel_ratio: f32) -> Self {
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }

    /// Area in CSS px², never negative
    pub fn area(&self) -> f64 {
        (self.width.max(0.0) as f64) * (self.height.max(0.0) as f64)
    }

    /// Device pixel ratio used for buffers: unknown or sub-unit ratios count as 1
    pub fn effective_dpr(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() {
            self.device_pixel_ratio.max(1.0)
        } else {
            1.0
        }
    }

    /// Backing buffer size in physical pixels
    pub fn buffer_size(&self) -> (u32, u32) {
        let dpr = self.effective_dpr();
        (
            (self.width.max(0.0) * dpr).floor() as u32,
            (self.height.max(0.0) * dpr).floor() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
