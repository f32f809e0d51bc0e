//! Animator benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use portfolio_backdrop::config::{ParticleFieldParameters, SnowfallParameters};
use portfolio_backdrop::render::{draw_field, draw_snowfall, Palette, PixelCanvas};
use portfolio_backdrop::{ParticleField, Snowfall, Viewport};

fn viewport() -> Viewport {
    Viewport::new(1920.0, 1080.0)
}

fn bench_field_step(c: &mut Criterion) {
    let mut field = ParticleField::with_rng(&ParticleFieldParameters::default(), viewport(), StdRng::seed_from_u64(1));
    let mut t = 0.0;

    c.bench_function("field_step", |b| {
        b.iter(|| {
            t += 16.0;
            field.step(black_box(t));
        })
    });
}

fn bench_field_links(c: &mut Criterion) {
    let field = ParticleField::with_rng(&ParticleFieldParameters::default(), viewport(), StdRng::seed_from_u64(1));

    c.bench_function("field_links", |b| b.iter(|| black_box(&field).links()));
}

fn bench_field_frame(c: &mut Criterion) {
    let mut field = ParticleField::with_rng(&ParticleFieldParameters::default(), viewport(), StdRng::seed_from_u64(1));
    let mut canvas = PixelCanvas::new(viewport()).expect("canvas");
    let palette = Palette::default();
    let mut t = 0.0;

    c.bench_function("field_frame", |b| {
        b.iter(|| {
            t += 16.0;
            field.step(t);
            draw_field(&field, &palette, &mut canvas)
        })
    });
}

fn bench_snowfall_frame(c: &mut Criterion) {
    let mut snow = Snowfall::with_rng(&SnowfallParameters::default(), viewport(), StdRng::seed_from_u64(1));
    let mut canvas = PixelCanvas::new(viewport()).expect("canvas");
    let mut t = 0.0;

    c.bench_function("snowfall_frame", |b| {
        b.iter(|| {
            t += 16.0;
            snow.step(t);
            draw_snowfall(&snow, &mut canvas);
        })
    });
}

criterion_group!(
    benches,
    bench_field_step,
    bench_field_links,
    bench_field_frame,
    bench_snowfall_frame
);
criterion_main!(benches);
