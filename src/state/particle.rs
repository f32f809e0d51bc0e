//! Particle network node.

use glam::Vec2;

/// A single node of the particle network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position (CSS px)
    pub position: Vec2,
    /// Velocity (px per 16.6 ms frame)
    pub velocity: Vec2,
    /// Acceleration from the last update, recomputed every frame
    pub acceleration: Vec2,
    /// Base radius before pulsing (px)
    pub radius: f32,
    /// Pulse phase (rad)
    pub phase: f32,
    /// Pulse phase advance rate
    pub phase_speed: f32,
    /// Seed for noise sampling, in [0, 1000)
    pub jitter_seed: f32,
}

impl Particle {
    /// Radius after applying the sinusoidal pulse, never below 0.4 px
    pub fn pulsed_radius(&self, intensity: f32) -> f32 {
        let pulse = 1.0 + self.phase.sin() * 0.09 * intensity;
        (self.radius * pulse).max(0.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(radius: f32, phase: f32) -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            radius,
            phase,
            phase_speed: 0.2,
            jitter_seed: 0.0,
        }
    }

    #[test]
    fn test_pulse_bounds() {
        let p = particle(2.0, std::f32::consts::FRAC_PI_2);
        assert!((p.pulsed_radius(1.0) - 2.18).abs() < 1e-4);
    }

    #[test]
    fn test_pulse_floor() {
        let p = particle(0.1, 0.0);
        assert_eq!(p.pulsed_radius(2.5), 0.4);
    }
}
