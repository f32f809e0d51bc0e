//! Software 2D canvas.
//!
//! Pixels are stored as premultiplied RGBA floats so layers can be
//! composited with plain source-over blending. Drawing coordinates are in
//! CSS pixels and scaled by the device pixel ratio on the way in.

use anyhow::{bail, Result};
use glam::Vec2;

use super::color::Rgba;
use super::{Glow, Surface};
use crate::state::Viewport;

/// Largest backing buffer accepted, in pixels (8K x 8K)
pub const MAX_BUFFER_PIXELS: u64 = 8192 * 8192;

/// CPU-backed drawing surface
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    viewport: Viewport,
    width_px: u32,
    height_px: u32,
    scale: f32,
    pixels: Vec<[f32; 4]>,
}

impl PixelCanvas {
    /// Allocate a transparent canvas for `viewport`
    ///
    /// Fails when the viewport has no area or the buffer would be too large.
    pub fn new(viewport: Viewport) -> Result<Self> {
        let mut canvas = Self {
            viewport,
            width_px: 0,
            height_px: 0,
            scale: 1.0,
            pixels: Vec::new(),
        };
        canvas.resize(viewport)?;
        Ok(canvas)
    }

    /// Buffer width in physical pixels
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Buffer height in physical pixels
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Premultiplied pixel at physical coordinates
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        self.pixels.get((y as usize) * (self.width_px as usize) + x as usize).copied()
    }

    /// Straight-alpha RGBA8 bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            let a = px[3].clamp(0.0, 1.0);
            let unpremultiply = |c: f32| {
                if a > 0.0 {
                    ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8
                } else {
                    0
                }
            };
            bytes.extend_from_slice(&[
                unpremultiply(px[0]),
                unpremultiply(px[1]),
                unpremultiply(px[2]),
                (a * 255.0).round() as u8,
            ]);
        }
        bytes
    }

    /// Composite `layer` over this canvas, shifted vertically by `offset_y_css` CSS px
    pub fn draw_canvas(&mut self, layer: &PixelCanvas, offset_y_css: f32) {
        let offset = (offset_y_css * self.scale).round() as i64;
        let width = self.width_px.min(layer.width_px) as usize;

        for y in 0..self.height_px as i64 {
            let src_y = y - offset;
            if src_y < 0 || src_y >= layer.height_px as i64 {
                continue;
            }
            let dst_row = (y as usize) * self.width_px as usize;
            let src_row = (src_y as usize) * layer.width_px as usize;
            for x in 0..width {
                let src = layer.pixels[src_row + x];
                blend(&mut self.pixels[dst_row + x], src, 1.0);
            }
        }
    }

    fn blend_at(&mut self, x: i64, y: i64, color: [f32; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.width_px as i64 || y >= self.height_px as i64 || coverage <= 0.0 {
            return;
        }
        let idx = (y as usize) * self.width_px as usize + x as usize;
        blend(&mut self.pixels[idx], color, coverage);
    }

    /// Physical pixel bounding box around a CSS-space point with a CSS-space reach
    fn bounds(&self, center: Vec2, reach: f32) -> (i64, i64, i64, i64) {
        let c = center * self.scale;
        let r = reach * self.scale;
        (
            (c.x - r).floor().max(0.0) as i64,
            (c.y - r).floor().max(0.0) as i64,
            (c.x + r).ceil().min(self.width_px as f32) as i64,
            (c.y + r).ceil().min(self.height_px as f32) as i64,
        )
    }
}

/// Source-over blend of a premultiplied colour scaled by `coverage`
fn blend(dst: &mut [f32; 4], src: [f32; 4], coverage: f32) {
    let k = coverage.clamp(0.0, 1.0);
    let src_a = src[3] * k;
    let keep = 1.0 - src_a;
    for i in 0..3 {
        dst[i] = src[i] * k + dst[i] * keep;
    }
    dst[3] = src_a + dst[3] * keep;
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for PixelCanvas {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let (width_px, height_px) = viewport.buffer_size();
        if width_px == 0 || height_px == 0 {
            bail!("viewport {}x{} has no drawable area", viewport.width, viewport.height);
        }
        let pixel_count = width_px as u64 * height_px as u64;
        if pixel_count > MAX_BUFFER_PIXELS {
            bail!("canvas buffer {width_px}x{height_px} exceeds {MAX_BUFFER_PIXELS} pixels");
        }

        self.viewport = viewport;
        self.width_px = width_px;
        self.height_px = height_px;
        self.scale = viewport.effective_dpr();
        self.pixels = vec![[0.0; 4]; pixel_count as usize];
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let start = origin * self.scale;
        let end = (origin + size) * self.scale;
        let x0 = start.x.floor().max(0.0) as i64;
        let y0 = start.y.floor().max(0.0) as i64;
        let x1 = end.x.ceil().min(self.width_px as f32) as i64;
        let y1 = end.y.ceil().min(self.height_px as f32) as i64;
        let src = color.premultiplied();
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_at(x, y, src, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba, glow: Option<Glow>) {
        let blur = glow.map(|g| g.blur.max(0.0)).unwrap_or(0.0);
        let (x0, y0, x1, y1) = self.bounds(center, radius + blur + 1.0);
        let c = center * self.scale;
        let r = radius * self.scale;
        let blur_px = blur * self.scale;
        let fill_src = fill.premultiplied();
        let glow_src = glow.map(|g| g.color.premultiplied());

        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(c);

                if let Some(glow_src) = glow_src {
                    if blur_px > 0.0 && d < r + blur_px {
                        let falloff = if d <= r {
                            1.0
                        } else {
                            let t = 1.0 - (d - r) / blur_px;
                            t * t
                        };
                        self.blend_at(x, y, glow_src, falloff);
                    }
                }

                let coverage = (r - d + 0.5).clamp(0.0, 1.0);
                self.blend_at(x, y, fill_src, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = (width * self.scale * 0.5).max(0.0);
        let a = from * self.scale;
        let b = to * self.scale;
        let x0 = (a.x.min(b.x) - half - 1.0).floor().max(0.0) as i64;
        let y0 = (a.y.min(b.y) - half - 1.0).floor().max(0.0) as i64;
        let x1 = (a.x.max(b.x) + half + 1.0).ceil().min(self.width_px as f32) as i64;
        let y1 = (a.y.max(b.y) + half + 1.0).ceil().min(self.height_px as f32) as i64;
        let src = color.premultiplied();

        for y in y0..y1 {
            for x in x0..x1 {
                let d = distance_to_segment(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), a, b);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                self.blend_at(x, y, src, coverage);
            }
        }
    }
}
