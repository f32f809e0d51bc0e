//! Simulation module for the backdrop layers.
//!
//! This module implements:
//! - the particle network (noise-driven drift, damping, edge wrap, links)
//! - snowfall (depth parallax, per-flake respawn)
//! - scroll parallax easing
//! - the stacked-sine noise both animators sample

pub mod field;
pub mod noise;
pub mod parallax;
pub mod snowfall;

pub use field::{particle_count, FieldTuning, Link, ParticleField, ResizeOutcome};
pub use parallax::Parallax;
pub use snowfall::{flake_alpha, flake_count, Snowfall};

/// Delta used when no previous frame exists or the clock did not move
pub const DEFAULT_FRAME_MS: f64 = 16.0;

/// Milliseconds since the previous frame, capped at `max_ms`
///
/// A missing previous frame or a zero delta counts as one 16 ms frame; a
/// clock that went backwards counts as no time at all.
pub fn frame_delta_ms(timestamp_ms: f64, last_ms: Option<f64>, max_ms: f64) -> f64 {
    let raw = match last_ms {
        Some(last) => timestamp_ms - last,
        None => DEFAULT_FRAME_MS,
    };
    if raw == 0.0 || raw.is_nan() {
        DEFAULT_FRAME_MS.min(max_ms)
    } else {
        raw.clamp(0.0, max_ms)
    }
}
