//! Scroll-driven parallax easing.
//!
//! The target translation follows the scroll offset immediately; the
//! applied translation eases toward it once per parallax frame, so the
//! smoothing is decoupled from the simulation's frame delta.

/// Fraction of the remaining distance covered per parallax frame
pub const PARALLAX_EASING: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    factor: f32,
    target_px: f32,
    applied_px: f32,
}

impl Parallax {
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.max(0.0),
            target_px: 0.0,
            applied_px: 0.0,
        }
    }

    /// Record a new vertical scroll offset (px)
    pub fn set_scroll(&mut self, scroll_y: f32) {
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        self.target_px = -scroll_y * self.factor;
    }

    /// Ease one frame toward the target and return the applied translation
    pub fn advance(&mut self) -> f32 {
        self.applied_px += (self.target_px - self.applied_px) * PARALLAX_EASING;
        self.applied_px
    }

    /// Currently applied translation (px)
    pub fn offset_px(&self) -> f32 {
        self.applied_px
    }

    pub fn target_px(&self) -> f32 {
        self.target_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_eases() {
        let mut parallax = Parallax::new(0.12);
        parallax.set_scroll(1000.0);
        assert!((parallax.target_px() + 120.0).abs() < 1e-4);
        assert!((parallax.advance() + 14.4).abs() < 1e-4);
    }

    #[test]
    fn test_converges_to_target() {
        let mut parallax = Parallax::new(0.2);
        parallax.set_scroll(500.0);
        for _ in 0..200 {
            parallax.advance();
        }
        assert!((parallax.offset_px() + 100.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_factor_stays_put() {
        let mut parallax = Parallax::new(0.0);
        parallax.set_scroll(800.0);
        assert_eq!(parallax.advance(), 0.0);
    }
}
