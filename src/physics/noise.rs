//! Smooth pseudo-noise from stacked sine waves.
//!
//! Each function sums a few sines at seed-scaled phases and slow time
//! frequencies. The output is deterministic for a (seed, time) pair but
//! never visibly repeats at animation time scales. Time is in milliseconds
//! and evaluated in f64 so long-running clocks keep their precision.

/// Horizontal drift for particle-network nodes, in [-1, 1]
pub fn field_drift(seed: f32, t_ms: f64) -> f32 {
    let s = seed as f64;
    ((s * 0.31 + t_ms * 0.0011).sin() * 0.45 + (s * 0.17 + t_ms * 0.0007).sin() * 0.55) as f32
}

/// Vertical acceleration term for particle-network nodes, in [-0.06, 0.06]
pub fn field_lift(seed: f32, t_ms: f64) -> f32 {
    let s = seed as f64;
    ((s * 0.29 + t_ms * 0.0008).cos() * 0.045 + (t_ms * 0.00045 + s).sin() * 0.015) as f32
}

/// Shimmer factor for the link between two nodes, in [0.5, 1.2]
pub fn pair_shimmer(seed_a: f32, seed_b: f32, t_ms: f64) -> f32 {
    let s = seed_a as f64 + seed_b as f64;
    (0.85 + 0.35 * (s * 0.11 + t_ms * 0.0006).sin()) as f32
}

/// Horizontal jitter for snowflakes, in [-1, 1]
pub fn snow_drift(seed: f32, t_ms: f64) -> f32 {
    let s = seed as f64;
    ((s * 0.73 + t_ms * 0.0009).sin() * 0.6 + (s * 1.37 + t_ms * 0.0005).sin() * 0.4) as f32
}

/// Opacity multiplier for snowflakes, in [0.65, 1.05]
pub fn twinkle(seed: f32, t_ms: f64) -> f32 {
    let s = seed as f64;
    (0.85 + (t_ms * 0.0013 + s * 0.6).sin() * 0.15 + (t_ms * 0.0007 + s * 1.3).sin() * 0.05) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        for i in 0..500 {
            let seed = i as f32 * 1.97;
            let t = i as f64 * 37.3;
            assert!(field_drift(seed, t).abs() <= 1.0);
            assert!(field_lift(seed, t).abs() <= 0.0601);
            let shimmer = pair_shimmer(seed, seed * 0.5, t);
            assert!((0.49..=1.21).contains(&shimmer));
            assert!(snow_drift(seed, t).abs() <= 1.0);
            let tw = twinkle(seed, t);
            assert!((0.649..=1.051).contains(&tw));
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(field_drift(12.5, 1000.0), field_drift(12.5, 1000.0));
        assert_ne!(snow_drift(12.5, 1000.0), snow_drift(13.5, 1000.0));
    }

    #[test]
    fn test_known_value() {
        // sin(0) * 0.45 + sin(0) * 0.55
        assert_eq!(field_drift(0.0, 0.0), 0.0);
        assert!((twinkle(0.0, 0.0) - 0.85).abs() < 1e-6);
    }
}
