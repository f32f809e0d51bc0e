//! Particle network simulation.
//!
//! Nodes drift under a small noise-driven acceleration with strong
//! velocity damping, wrap around the viewport edges, and pulse their
//! radius. Pairs closer than the line distance are linked.
//!
//! Integration per frame (t in ms, k = dt / 16.6):
//! 1. a = noise(seed, t) * gain
//! 2. v = v * 0.992 + a * k
//! 3. x = x + v * k, then wrap at the edges ± 20 px

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{frame_delta_ms, noise};
use crate::config::ParticleFieldParameters;
use crate::state::{Particle, Viewport};

/// Lower bound on the particle count for tiny viewports
pub const MIN_PARTICLES: usize = 12;

/// Distance past an edge at which a particle reappears on the opposite side
pub const WRAP_MARGIN_PX: f32 = 20.0;

/// Relative area change above which the particle set is rebuilt on resize
pub const REGENERATE_AREA_DELTA: f64 = 0.25;

/// Frame delta cap, avoids large jumps after a stalled tab
pub const MAX_FRAME_MS: f64 = 40.0;

const VELOCITY_DAMPING: f32 = 0.992;
const TIME_SCALE: f32 = 0.7;
const REFERENCE_FRAME_MS: f32 = 16.6;
const PHASE_DIVISOR: f32 = 1400.0;
const LINE_WIDTH_PX: f32 = 0.45;

/// Number of particles for a viewport area: max(12, floor(area / density))
pub fn particle_count(area: f64, density: f64) -> usize {
    let count = (area / density).floor();
    if count.is_finite() && count > 0.0 {
        (count as usize).max(MIN_PARTICLES)
    } else {
        MIN_PARTICLES
    }
}

/// Visual and motion constants derived from the intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTuning {
    /// Clamped intensity
    pub intensity: f32,
    pub parallax_factor: f32,
    pub line_distance_px: f32,
    pub line_width_px: f32,
    pub node_alpha: f32,
    pub line_max_alpha: f32,
    pub glow_alpha: f32,
    pub glow_blur_px: f32,
    pub node_radius_base: f32,
    pub base_speed: f32,
    pub accel_gain: f32,
}

impl FieldTuning {
    pub fn from_parameters(params: &ParticleFieldParameters) -> Self {
        let params = params.sanitized();
        let i = params.intensity;
        Self {
            intensity: i,
            parallax_factor: params.parallax_factor,
            line_distance_px: params.line_distance_px,
            line_width_px: LINE_WIDTH_PX,
            node_alpha: (0.12 * i * 1.25).min(0.55),
            line_max_alpha: (0.18 * i * 1.2).min(0.6),
            glow_alpha: (0.28 * i).min(0.6),
            glow_blur_px: (6.0 * i).round(),
            node_radius_base: 0.9 * i,
            base_speed: 0.28 * (1.0 + i * 0.08),
            accel_gain: 0.6 + i * 0.12,
        }
    }
}

/// A visible connection between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Line alpha after distance falloff and shimmer, in [0, 1]
    pub alpha: f32,
}

/// What a resize did to the particle set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The set was rebuilt for the new area
    Regenerated,
    /// Existing particles were clamped into the new bounds
    Clamped,
}

/// Particle network animator state
pub struct ParticleField {
    particles: Vec<Particle>,
    params: ParticleFieldParameters,
    tuning: FieldTuning,
    viewport: Viewport,
    /// Area at the last regeneration; resize deltas are measured against it
    regenerated_area: f64,
    last_timestamp_ms: Option<f64>,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field with an entropy-seeded generator
    pub fn new(params: &ParticleFieldParameters, viewport: Viewport) -> Self {
        Self::with_rng(params, viewport, StdRng::from_entropy())
    }

    /// Create a field drawing randomness from `rng`
    pub fn with_rng(params: &ParticleFieldParameters, viewport: Viewport, rng: StdRng) -> Self {
        let params = params.sanitized();
        let tuning = FieldTuning::from_parameters(&params);
        let mut field = Self {
            particles: Vec::new(),
            params,
            tuning,
            viewport,
            regenerated_area: viewport.area(),
            last_timestamp_ms: None,
            rng,
        };
        field.regenerate();
        field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn tuning(&self) -> &FieldTuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Timestamp of the last update, if any
    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    fn regenerate(&mut self) {
        let count = particle_count(self.viewport.area(), self.params.density);
        let (tuning, viewport) = (self.tuning, self.viewport);
        let rng = &mut self.rng;
        self.particles = (0..count).map(|_| make_particle(rng, &tuning, viewport)).collect();
    }

    /// Adapt to a new viewport
    ///
    /// Rebuilds the set when the area moved by more than 25% since the last
    /// rebuild; otherwise clamps positions so small resizes do not jump.
    pub fn resize(&mut self, viewport: Viewport) -> ResizeOutcome {
        self.viewport = viewport;
        let area = viewport.area();
        let delta = (area - self.regenerated_area).abs() / area.max(1.0);

        if self.particles.is_empty() || delta > REGENERATE_AREA_DELTA {
            self.regenerated_area = area;
            self.regenerate();
            log::info!(
                "Particle field regenerated: {} particles for {}x{}",
                self.particles.len(),
                viewport.width,
                viewport.height
            );
            ResizeOutcome::Regenerated
        } else {
            let max = Vec2::new(viewport.width.max(0.0), viewport.height.max(0.0));
            for p in &mut self.particles {
                p.position = p.position.clamp(Vec2::ZERO, max);
            }
            ResizeOutcome::Clamped
        }
    }

    /// Advance the simulation to `timestamp_ms`
    pub fn step(&mut self, timestamp_ms: f64) {
        let dt = frame_delta_ms(timestamp_ms, self.last_timestamp_ms, MAX_FRAME_MS) as f32 * TIME_SCALE;
        self.last_timestamp_ms = Some(timestamp_ms);

        let k = dt / REFERENCE_FRAME_MS;
        let gain = self.tuning.accel_gain;
        let width = self.viewport.width;
        let height = self.viewport.height;

        for p in &mut self.particles {
            let drift = noise::field_drift(p.jitter_seed, timestamp_ms);
            let sway = (p.phase as f64 + timestamp_ms * 0.001 * (p.phase_speed as f64 * 0.6)).sin() as f32;
            p.acceleration = Vec2::new(
                (drift * 0.05 + sway * 0.01) * gain,
                noise::field_lift(p.jitter_seed, timestamp_ms) * gain,
            );

            p.velocity = p.velocity * VELOCITY_DAMPING + p.acceleration * k;
            p.position += p.velocity * k;

            wrap_axis(&mut p.position.x, width);
            wrap_axis(&mut p.position.y, height);

            p.phase = (p.phase + p.phase_speed * dt / PHASE_DIVISOR).rem_euclid(std::f32::consts::TAU);
        }
    }

    /// Pairs closer than the line distance, with their shimmering alpha
    pub fn links(&self) -> Vec<Link> {
        let max_distance = self.tuning.line_distance_px;
        let t = self.last_timestamp_ms.unwrap_or(0.0);
        let mut links = Vec::new();

        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let distance = a.position.distance(b.position);
                if distance < max_distance {
                    let base_alpha = (1.0 - distance / max_distance) * self.tuning.line_max_alpha;
                    let shimmer = noise::pair_shimmer(a.jitter_seed, b.jitter_seed, t);
                    links.push(Link {
                        a: i,
                        b: j,
                        distance,
                        alpha: (base_alpha * shimmer).clamp(0.0, 1.0),
                    });
                }
            }
        }
        links
    }
}

fn wrap_axis(value: &mut f32, extent: f32) {
    if *value < -WRAP_MARGIN_PX {
        *value = extent + WRAP_MARGIN_PX;
    }
    if *value > extent + WRAP_MARGIN_PX {
        *value = -WRAP_MARGIN_PX;
    }
}

fn make_particle(rng: &mut StdRng, tuning: &FieldTuning, viewport: Viewport) -> Particle {
    let rb = tuning.node_radius_base;
    let i = tuning.intensity;
    Particle {
        position: Vec2::new(
            rng.gen::<f32>() * viewport.width.max(0.0),
            rng.gen::<f32>() * viewport.height.max(0.0),
        ),
        velocity: Vec2::new(
            (rng.gen::<f32>() - 0.5) * tuning.base_speed,
            (rng.gen::<f32>() - 0.5) * tuning.base_speed,
        ),
        acceleration: Vec2::ZERO,
        radius: rng.gen::<f32>() * 1.6 * rb + 0.6 * rb,
        phase: rng.gen::<f32>() * std::f32::consts::TAU,
        phase_speed: (rng.gen::<f32>() * 0.4 + 0.12) * (0.6 + i * 0.08),
        jitter_seed: rng.gen::<f32>() * 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(w: f32, h: f32) -> ParticleField {
        ParticleField::with_rng(
            &ParticleFieldParameters::default(),
            Viewport::new(w, h),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_particle_count_formula() {
        assert_eq!(particle_count(1920.0 * 1080.0, 15000.0), 138);
        assert_eq!(particle_count(100.0 * 100.0, 15000.0), 12);
        assert_eq!(particle_count(0.0, 15000.0), 12);
    }

    #[test]
    fn test_tuning_at_default_intensity() {
        let tuning = FieldTuning::from_parameters(&ParticleFieldParameters::default());
        assert!((tuning.node_alpha - 0.24).abs() < 1e-5);
        assert!((tuning.line_max_alpha - 0.3456).abs() < 1e-5);
        assert!((tuning.glow_alpha - 0.448).abs() < 1e-5);
        assert_eq!(tuning.glow_blur_px, 10.0);
    }

    #[test]
    fn test_tuning_caps_alpha() {
        let params = ParticleFieldParameters {
            intensity: 2.5,
            ..Default::default()
        };
        let tuning = FieldTuning::from_parameters(&params);
        assert!((tuning.node_alpha - 0.375).abs() < 1e-5);
        assert!((tuning.line_max_alpha - 0.54).abs() < 1e-5);
        assert_eq!(tuning.glow_alpha, 0.6);
    }

    #[test]
    fn test_wrap_axis() {
        let mut x = -20.5;
        wrap_axis(&mut x, 100.0);
        assert_eq!(x, 120.0);

        let mut x = 120.5;
        wrap_axis(&mut x, 100.0);
        assert_eq!(x, -20.0);

        let mut x = 50.0;
        wrap_axis(&mut x, 100.0);
        assert_eq!(x, 50.0);
    }

    #[test]
    fn test_damping_slows_free_particle() {
        let mut field = field(400.0, 400.0);
        field.particles.truncate(1);
        field.particles[0].velocity = Vec2::new(50.0, 0.0);
        field.step(0.0);
        assert!(field.particles[0].velocity.x < 50.0);
    }

    #[test]
    fn test_links_respect_distance() {
        let mut field = field(400.0, 400.0);
        field.particles.truncate(3);
        field.particles[0].position = Vec2::new(10.0, 10.0);
        field.particles[1].position = Vec2::new(60.0, 10.0);
        field.particles[2].position = Vec2::new(300.0, 300.0);

        let links = field.links();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].distance - 50.0).abs() < 1e-4);
        assert!(links[0].alpha > 0.0 && links[0].alpha <= 1.0);
    }

    #[test]
    fn test_phase_wraps() {
        let mut field = field(400.0, 400.0);
        field.particles[0].phase = std::f32::consts::TAU - 1e-4;
        field.particles[0].phase_speed = 1.0;
        field.step(0.0);
        let phase = field.particles[0].phase;
        assert!((0.0..std::f32::consts::TAU).contains(&phase));
        assert!(phase < 0.1);
    }

    #[test]
    fn test_phase_advances() {
        let mut field = field(400.0, 400.0);
        let before = field.particles[0].phase;
        field.step(16.0);
        assert!(field.particles[0].phase > before);
    }
}
