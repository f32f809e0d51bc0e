//! The two backdrop layers: particle network (z = 0) and snowfall (z = 1).

use anyhow::Result;

use super::signals::{Signal, Subscription};
use super::{Layer, MountContext};
use crate::physics::{Parallax, ParticleField, Snowfall};
use crate::render::{draw_field, draw_snowfall, Palette, PixelCanvas, Surface};
use crate::scheduler::{FrameLoop, FrameRequest, FrameScheduler, FrameSlot};
use crate::state::{LayerStats, Viewport};

/// Particle network with its own canvas and scroll parallax
pub struct FieldLayer {
    field: ParticleField,
    parallax: Parallax,
    palette: Palette,
    canvas: PixelCanvas,
    drawable: bool,
    link_count: usize,
    simulation: FrameLoop,
    parallax_loop: FrameLoop,
    _subscriptions: [Subscription; 2],
}

impl FieldLayer {
    pub const Z_INDEX: i32 = 0;

    /// Acquire a canvas, start both loops and listen for resize and scroll
    pub fn mount(ctx: &MountContext, field: ParticleField, palette: Palette) -> Result<Self> {
        let canvas = PixelCanvas::new(ctx.viewport())?;

        let mut parallax = Parallax::new(field.tuning().parallax_factor);
        parallax.set_scroll(ctx.scroll_y());

        let mut simulation = ctx.frame_loop(FrameSlot::Simulation);
        let mut parallax_loop = ctx.frame_loop(FrameSlot::Parallax);
        simulation.start();
        parallax_loop.start();

        Ok(Self {
            field,
            parallax,
            palette,
            canvas,
            drawable: true,
            link_count: 0,
            simulation,
            parallax_loop,
            _subscriptions: [ctx.subscribe(Signal::Resize), ctx.subscribe(Signal::Scroll)],
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }
}

impl Layer for FieldLayer {
    fn name(&self) -> &'static str {
        "particle-field"
    }

    fn z_index(&self) -> i32 {
        Self::Z_INDEX
    }

    fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        match request.slot {
            FrameSlot::Simulation => {
                if self.simulation.fire(request.token) {
                    self.field.step(timestamp_ms);
                    if self.drawable {
                        self.link_count = draw_field(&self.field, &self.palette, &mut self.canvas);
                    }
                }
            }
            FrameSlot::Parallax => {
                if self.parallax_loop.fire(request.token) {
                    self.parallax.advance();
                }
            }
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.drawable = match self.canvas.resize(viewport) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Particle field canvas unavailable: {:#}", e);
                false
            }
        };
        self.field.resize(viewport);
    }

    fn on_scroll(&mut self, scroll_y: f32) {
        self.parallax.set_scroll(scroll_y);
    }

    fn composite_into(&self, target: &mut PixelCanvas) {
        if self.drawable {
            target.draw_canvas(&self.canvas, self.parallax.offset_px());
        }
    }

    fn stats(&self) -> LayerStats {
        LayerStats {
            particle_count: self.field.particles().len(),
            link_count: self.link_count,
            flake_count: 0,
            parallax_offset_px: self.parallax.offset_px(),
        }
    }
}

/// Snowfall with its own transparent canvas
pub struct SnowLayer {
    snowfall: Snowfall,
    canvas: PixelCanvas,
    drawable: bool,
    simulation: FrameLoop,
    _resize: Subscription,
}

impl SnowLayer {
    pub const Z_INDEX: i32 = 1;

    /// Acquire a canvas, start the loop and listen for resize
    pub fn mount(ctx: &MountContext, snowfall: Snowfall) -> Result<Self> {
        let canvas = PixelCanvas::new(ctx.viewport())?;
        let mut simulation = ctx.frame_loop(FrameSlot::Simulation);
        simulation.start();

        Ok(Self {
            snowfall,
            canvas,
            drawable: true,
            simulation,
            _resize: ctx.subscribe(Signal::Resize),
        })
    }

    pub fn snowfall(&self) -> &Snowfall {
        &self.snowfall
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }
}

impl Layer for SnowLayer {
    fn name(&self) -> &'static str {
        "snowfall"
    }

    fn z_index(&self) -> i32 {
        Self::Z_INDEX
    }

    fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        if request.slot == FrameSlot::Simulation && self.simulation.fire(request.token) {
            self.snowfall.step(timestamp_ms);
            if self.drawable {
                draw_snowfall(&self.snowfall, &mut self.canvas);
            }
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.drawable = match self.canvas.resize(viewport) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Snowfall canvas unavailable: {:#}", e);
                false
            }
        };
        self.snowfall.resize(viewport);
    }

    fn composite_into(&self, target: &mut PixelCanvas) {
        if self.drawable {
            target.draw_canvas(&self.canvas, 0.0);
        }
    }

    fn stats(&self) -> LayerStats {
        LayerStats {
            flake_count: self.snowfall.flakes().len(),
            ..Default::default()
        }
    }
}
