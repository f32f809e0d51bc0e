//! Draw routines for the two backdrop layers.

use glam::Vec2;

use super::color::{Palette, Rgb};
use super::{Glow, Surface};
use crate::physics::{flake_alpha, ParticleField, Snowfall};

/// Paint the particle network: background, glowing nodes, then links
///
/// Returns the number of links drawn.
pub fn draw_field(field: &ParticleField, palette: &Palette, surface: &mut dyn Surface) -> usize {
    let viewport = field.viewport();
    let tuning = field.tuning();

    surface.fill_rect(
        Vec2::ZERO,
        Vec2::new(viewport.width, viewport.height),
        palette.background.with_alpha(1.0),
    );

    let fill = palette.primary.with_alpha(tuning.node_alpha);
    let glow = Glow {
        blur: tuning.glow_blur_px,
        color: palette.primary.with_alpha(tuning.glow_alpha),
    };
    for p in field.particles() {
        surface.fill_circle(p.position, p.pulsed_radius(tuning.intensity), fill, Some(glow));
    }

    let links = field.links();
    let particles = field.particles();
    for link in &links {
        surface.stroke_line(
            particles[link.a].position,
            particles[link.b].position,
            tuning.line_width_px,
            palette.primary.with_alpha(link.alpha),
        );
    }
    links.len()
}

/// Clear and paint every flake as a soft white dot
pub fn draw_snowfall(snowfall: &Snowfall, surface: &mut dyn Surface) {
    surface.clear();
    let t = snowfall.last_timestamp_ms().unwrap_or(0.0);

    for flake in snowfall.flakes() {
        let color = Rgb::WHITE.with_alpha(flake_alpha(flake, t));
        let glow = Glow {
            blur: flake.radius * 1.3,
            color,
        };
        surface.fill_circle(flake.position, flake.radius, color, Some(glow));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParticleFieldParameters, SnowfallParameters};
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::state::Viewport;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_field_draws_background_first() {
        let viewport = Viewport::new(300.0, 200.0);
        let field = ParticleField::with_rng(&ParticleFieldParameters::default(), viewport, StdRng::seed_from_u64(1));
        let mut surface = RecordingSurface::new(viewport);

        let links = draw_field(&field, &Palette::default(), &mut surface);

        assert!(matches!(surface.commands[0], DrawCommand::FillRect { .. }));
        assert_eq!(surface.circles().count(), field.particles().len());
        assert_eq!(surface.lines().count(), links);

        surface.reset();
        assert!(surface.commands.is_empty());
        assert_eq!(draw_field(&field, &Palette::default(), &mut surface), links);
        assert_eq!(surface.circles().count(), field.particles().len());
    }

    #[test]
    fn test_snowfall_clears_each_frame() {
        let viewport = Viewport::new(300.0, 200.0);
        let snow = Snowfall::with_rng(&SnowfallParameters::default(), viewport, StdRng::seed_from_u64(1));
        let mut surface = RecordingSurface::new(viewport);

        draw_snowfall(&snow, &mut surface);

        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert_eq!(surface.circles().count(), snow.flakes().len());
        for cmd in surface.circles() {
            if let DrawCommand::Circle { fill, glow, radius, .. } = cmd {
                assert!((0.0..=1.0).contains(&fill.alpha));
                let glow = glow.expect("flakes glow");
                assert!((glow.blur - radius * 1.3).abs() < 1e-5);
            }
        }
    }
}
