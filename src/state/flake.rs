//! Snowflake state and depth-derived attributes.
//!
//! Depth runs from 0 (closest to the viewer) to 1 (farthest). Closer
//! flakes are larger, fall faster, drift more and are more opaque.

use glam::Vec2;
use rand::Rng;

/// Height (px) above the viewport at which respawned flakes re-enter
pub const RESPAWN_Y_PX: f32 = -10.0;

/// Fall speed of the farthest flakes (px/s)
pub const MIN_FALL_SPEED_PX_PER_SEC: f32 = 12.0;

/// Extra fall speed of the closest flakes (px/s)
pub const FALL_SPEED_RANGE_PX_PER_SEC: f32 = 28.0;

/// A single falling flake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    /// Position (CSS px)
    pub position: Vec2,
    /// Radius (px)
    pub radius: f32,
    /// Distance from the viewer, in [0, 1)
    pub depth: f32,
    /// Vertical speed (px/s)
    pub fall_speed_px_per_sec: f32,
    /// Horizontal drift bias (px/s)
    pub base_drift_px_per_sec: f32,
    /// Seed for drift noise and twinkle, in [0, 1000)
    pub noise_seed: f32,
    /// Base opacity before twinkle
    pub opacity: f32,
}

impl Snowflake {
    /// Build a flake from its depth and the random samples the depth formulas consume.
    ///
    /// `radius_jitter` is in [0, 0.4), `drift_sample` in [-10, 10).
    pub fn from_depth(
        position: Vec2,
        depth: f32,
        radius_jitter: f32,
        drift_sample: f32,
        noise_seed: f32,
    ) -> Self {
        let closeness = 1.0 - depth;
        Self {
            position,
            radius: 0.9 + closeness * 2.1 + radius_jitter,
            depth,
            fall_speed_px_per_sec: MIN_FALL_SPEED_PX_PER_SEC + closeness * FALL_SPEED_RANGE_PX_PER_SEC,
            base_drift_px_per_sec: drift_sample * (0.4 + closeness),
            noise_seed,
            opacity: 0.45 + closeness * 0.4,
        }
    }

    /// Random flake at `position`
    pub fn random_at<R: Rng + ?Sized>(rng: &mut R, position: Vec2) -> Self {
        let depth = rng.gen_range(0.0..1.0);
        let radius_jitter = rng.gen_range(0.0..0.4);
        let drift_sample = rng.gen_range(-10.0..10.0);
        let noise_seed = rng.gen_range(0.0..1000.0);
        Self::from_depth(position, depth, radius_jitter, drift_sample, noise_seed)
    }

    /// Random flake anywhere inside a `width` x `height` area
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let position = Vec2::new(
            rng.gen::<f32>() * width.max(0.0),
            rng.gen::<f32>() * height.max(0.0),
        );
        Self::random_at(rng, position)
    }

    /// Re-enter from the top with freshly randomized attributes
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32) {
        let position = Vec2::new(rng.gen::<f32>() * width.max(0.0), RESPAWN_Y_PX);
        *self = Self::random_at(rng, position);
    }

    /// 1 for the closest flakes, approaching 0 for the farthest
    pub fn closeness(&self) -> f32 {
        1.0 - self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_closest_flake_attributes() {
        let flake = Snowflake::from_depth(Vec2::ZERO, 0.0, 0.0, 10.0, 1.0);
        assert!((flake.radius - 3.0).abs() < 1e-5);
        assert!((flake.fall_speed_px_per_sec - 40.0).abs() < 1e-5);
        assert!((flake.base_drift_px_per_sec - 14.0).abs() < 1e-5);
        assert!((flake.opacity - 0.85).abs() < 1e-5);
    }

    #[test]
    fn test_farthest_flake_attributes() {
        let flake = Snowflake::from_depth(Vec2::ZERO, 1.0, 0.0, 10.0, 1.0);
        assert!((flake.radius - 0.9).abs() < 1e-5);
        assert!((flake.fall_speed_px_per_sec - 12.0).abs() < 1e-5);
        assert!((flake.base_drift_px_per_sec - 4.0).abs() < 1e-5);
        assert!((flake.opacity - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_respawn_moves_to_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut flake = Snowflake::spawn(&mut rng, 800.0, 600.0);
        flake.position.y = 700.0;
        flake.respawn(&mut rng, 800.0);
        assert_eq!(flake.position.y, RESPAWN_Y_PX);
        assert!(flake.position.x >= 0.0 && flake.position.x <= 800.0);
        assert!((0.0..1.0).contains(&flake.depth));
    }
}
