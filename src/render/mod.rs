//! Rendering module: drawing surfaces and the layer draw routines.
//!
//! Animators draw through the [`Surface`] trait in CSS pixel coordinates.
//! [`PixelCanvas`] rasterizes in software for compositing and export;
//! [`RecordingSurface`] keeps the draw calls for inspection.

mod color;
mod raster;
mod recording;
pub mod scene;

pub use color::{Palette, Rgb, Rgba};
pub use raster::{PixelCanvas, MAX_BUFFER_PIXELS};
pub use recording::{DrawCommand, RecordingSurface};
pub use scene::{draw_field, draw_snowfall};

use anyhow::Result;
use glam::Vec2;

use crate::state::Viewport;

/// Soft shadow drawn under a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur reach past the shape edge (CSS px)
    pub blur: f32,
    pub color: Rgba,
}

/// A 2D drawing context sized to the viewport
pub trait Surface {
    /// Reallocate the backing buffer for `viewport`, scaled by its device pixel ratio
    fn resize(&mut self, viewport: Viewport) -> Result<()>;

    /// Viewport the buffer was last sized for
    fn viewport(&self) -> Viewport;

    /// Make every pixel transparent
    fn clear(&mut self);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba, glow: Option<Glow>);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}
