//! Surface that records draw calls instead of rasterizing them.

use anyhow::Result;
use glam::Vec2;

use super::color::Rgba;
use super::{Glow, Surface};
use crate::state::Viewport;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Viewport),
    Clear,
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Rgba,
        glow: Option<Glow>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// Surface that keeps every draw call for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.viewport = viewport;
        self.commands.push(DrawCommand::Resize(viewport));
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba, glow: Option<Glow>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            glow,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
