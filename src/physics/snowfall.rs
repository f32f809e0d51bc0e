//! Snowfall simulation.
//!
//! Flakes fall at a depth-derived speed in real seconds, so the fall rate
//! does not depend on the frame rate. Each flake respawns on its own once
//! it leaves the bottom edge; the set is only rebuilt on resize.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{frame_delta_ms, noise};
use crate::config::SnowfallParameters;
use crate::state::{Snowflake, Viewport};

/// Lower bound on the flake count for small viewports
pub const MIN_FLAKES: usize = 60;

/// Distance below the bottom edge at which a flake respawns
pub const RESPAWN_MARGIN_PX: f32 = 10.0;

/// Horizontal wrap margin
pub const WRAP_MARGIN_PX: f32 = 15.0;

/// Frame delta cap
pub const MAX_FRAME_MS: f64 = 50.0;

/// Peak horizontal jitter (px/s) before depth scaling
const JITTER_PX_PER_SEC: f32 = 20.0;

/// Number of flakes for a viewport area: max(60, floor(area / density))
pub fn flake_count(area: f64, density: f64) -> usize {
    let count = (area / density).floor();
    if count.is_finite() && count > 0.0 {
        (count as usize).max(MIN_FLAKES)
    } else {
        MIN_FLAKES
    }
}

/// Flake opacity for this frame: base opacity times twinkle, in [0, 1]
pub fn flake_alpha(flake: &Snowflake, t_ms: f64) -> f32 {
    (flake.opacity * noise::twinkle(flake.noise_seed, t_ms)).clamp(0.0, 1.0)
}

/// Snowfall animator state
pub struct Snowfall {
    flakes: Vec<Snowflake>,
    params: SnowfallParameters,
    viewport: Viewport,
    last_timestamp_ms: Option<f64>,
    respawned: u64,
    rng: StdRng,
}

impl Snowfall {
    /// Create a snowfall with an entropy-seeded generator
    pub fn new(params: &SnowfallParameters, viewport: Viewport) -> Self {
        Self::with_rng(params, viewport, StdRng::from_entropy())
    }

    /// Create a snowfall drawing randomness from `rng`
    pub fn with_rng(params: &SnowfallParameters, viewport: Viewport, rng: StdRng) -> Self {
        let mut snowfall = Self {
            flakes: Vec::new(),
            params: params.sanitized(),
            viewport,
            last_timestamp_ms: None,
            respawned: 0,
            rng,
        };
        snowfall.regenerate();
        snowfall
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    /// Flakes respawned at the top since creation
    pub fn respawn_count(&self) -> u64 {
        self.respawned
    }

    fn regenerate(&mut self) {
        let count = flake_count(self.viewport.area(), self.params.density);
        let (width, height) = (self.viewport.width, self.viewport.height);
        let rng = &mut self.rng;
        self.flakes = (0..count).map(|_| Snowflake::spawn(rng, width, height)).collect();
    }

    /// Rebuild the flake set for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
        log::info!(
            "Snowfall regenerated: {} flakes for {}x{}",
            self.flakes.len(),
            viewport.width,
            viewport.height
        );
    }

    /// Advance the simulation to `timestamp_ms`
    pub fn step(&mut self, timestamp_ms: f64) {
        let dt_sec = (frame_delta_ms(timestamp_ms, self.last_timestamp_ms, MAX_FRAME_MS) / 1000.0) as f32;
        self.last_timestamp_ms = Some(timestamp_ms);

        let width = self.viewport.width;
        let height = self.viewport.height;

        for flake in &mut self.flakes {
            let jitter = noise::snow_drift(flake.noise_seed, timestamp_ms);
            let drift = flake.base_drift_px_per_sec + jitter * JITTER_PX_PER_SEC * (0.3 + flake.closeness());

            flake.position += Vec2::new(drift, flake.fall_speed_px_per_sec) * dt_sec;

            if flake.position.y > height + RESPAWN_MARGIN_PX {
                flake.respawn(&mut self.rng, width);
                self.respawned += 1;
            }

            if flake.position.x > width + WRAP_MARGIN_PX {
                flake.position.x = -WRAP_MARGIN_PX;
            }
            if flake.position.x < -WRAP_MARGIN_PX {
                flake.position.x = width + WRAP_MARGIN_PX;
            }
        }
    }
}
