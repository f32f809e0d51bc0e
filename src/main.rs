//! Portfolio Backdrop - Entry point
//!
//! Runs the backdrop layers headlessly for a number of frames and
//! optionally captures the result.
//!
//! CLI Usage:
//!   cargo run                                  # 600 simulated frames at 1280x720
//!   cargo run -- --frames 120 --screenshot     # Save the final frame as PNG
//!   cargo run -- --repo rust-lang/rust         # Fetch and export repository stats

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use portfolio_backdrop::{
    config::Parameters,
    export::{export_stats_json, save_frame, CsvExporter},
    render::Palette,
    scheduler::Ticker,
    stage::Stage,
    state::Viewport,
    stats::{GithubClient, MemoryStore, RepoStatsFetcher},
};

/// Target frame rate for the ticker
const FRAME_RATE_HZ: f64 = 60.0;

/// Minimum time between CSV rows (ms)
const CSV_SAMPLE_INTERVAL_MS: f64 = 100.0;

struct CliOptions {
    frames: u64,
    width: f32,
    height: f32,
    dpr: f32,
    scroll_px: Option<f32>,
    snow: bool,
    realtime: bool,
    screenshot: bool,
    csv: bool,
    config_dir: Option<PathBuf>,
    repo: Option<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            frames: 600,
            width: viewport.width,
            height: viewport.height,
            dpr: viewport.device_pixel_ratio,
            scroll_px: None,
            snow: true,
            realtime: false,
            screenshot: false,
            csv: false,
            config_dir: None,
            repo: None,
        }
    }
}

/// Parse command line arguments
fn parse_args() -> CliOptions {
    let args: Vec<String> = std::env::args().collect();
    let mut options = CliOptions::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "-n" | "--frames" => {
                options.frames = value.and_then(|v| v.parse().ok()).unwrap_or(options.frames);
                i += 1;
            }
            "--width" => {
                options.width = value.and_then(|v| v.parse().ok()).unwrap_or(options.width);
                i += 1;
            }
            "--height" => {
                options.height = value.and_then(|v| v.parse().ok()).unwrap_or(options.height);
                i += 1;
            }
            "--dpr" => {
                options.dpr = value.and_then(|v| v.parse().ok()).unwrap_or(options.dpr);
                i += 1;
            }
            "--scroll" => {
                options.scroll_px = value.and_then(|v| v.parse().ok());
                i += 1;
            }
            "--config" => {
                options.config_dir = value.map(PathBuf::from);
                i += 1;
            }
            "--repo" => {
                options.repo = value.cloned();
                i += 1;
            }
            "--no-snow" => options.snow = false,
            "--realtime" => options.realtime = true,
            "--screenshot" => options.screenshot = true,
            "--csv" => options.csv = true,
            "--help" | "-h" => {
                println!("Portfolio Backdrop - particle network and snowfall backdrop");
                println!();
                println!("Usage: portfolio-backdrop [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --frames N     Frames to run (default: 600)");
                println!("  --width W          Viewport width in CSS px (default: 1280)");
                println!("  --height H         Viewport height in CSS px (default: 720)");
                println!("  --dpr D            Device pixel ratio (default: 1)");
                println!("  --scroll PX        Scroll offset applied after the first frame");
                println!("  --no-snow          Disable the snowfall layer");
                println!("  --realtime         Pace frames at 60 Hz on the wall clock");
                println!("  --screenshot       Save the final composited frame as PNG");
                println!("  --csv              Export per-frame metrics as CSV");
                println!("  --config DIR       Load parameters from DIR");
                println!("  --repo OWNER/NAME  Fetch repository stats and export them as JSON");
                println!("  --help, -h         Show this help");
                std::process::exit(0);
            }
            other => log::warn!("Ignoring unknown argument {}", other),
        }
        i += 1;
    }

    options
}

fn main() -> Result<()> {
    env_logger::init();

    let options = parse_args();

    log::info!("Portfolio Backdrop starting...");

    let params = match &options.config_dir {
        Some(dir) => Parameters::load_from_dir(dir),
        None => Parameters::load_or_default(),
    };

    let viewport =
        Viewport::new(options.width, options.height).with_device_pixel_ratio(options.dpr);
    let mut stage = Stage::new(viewport);
    stage.mount_particle_field(&params.field, Palette::from_theme(&params.theme));
    if options.snow {
        stage.mount_snowfall(&params.snowfall);
    }
    log::info!("Layers: {:?}", stage.layer_names());

    // Stats are fetched while the frames run
    let fetch = match &options.repo {
        Some(repo) => {
            let client = GithubClient::new(&params.stats)?;
            let mut fetcher = RepoStatsFetcher::new(Arc::new(client), Arc::new(MemoryStore::new()));
            let handle = fetcher.watch(repo);
            Some((repo.clone(), fetcher, handle))
        }
        None => None,
    };

    let mut ticker = if options.realtime {
        Ticker::realtime(FRAME_RATE_HZ)
    } else {
        Ticker::simulated(FRAME_RATE_HZ)
    };
    let mut csv = if options.csv {
        Some(CsvExporter::new(CSV_SAMPLE_INTERVAL_MS)?)
    } else {
        None
    };

    let start_time = Instant::now();
    for frame in 0..options.frames {
        let timestamp_ms = ticker.next_timestamp_ms();
        stage.tick(timestamp_ms);

        if frame == 0 {
            if let Some(scroll_px) = options.scroll_px {
                stage.scroll_to(scroll_px);
            }
        }

        if let Some(csv) = csv.as_mut() {
            csv.maybe_record(stage.metrics())?;
        }

        if frame % 60 == 0 {
            let stats = stage.stats();
            log::debug!(
                "frame={} t={:.0}ms particles={} links={} flakes={} parallax={:.2}px",
                frame,
                timestamp_ms,
                stats.particle_count,
                stats.link_count,
                stats.flake_count,
                stats.parallax_offset_px
            );
        }
    }
    let elapsed = start_time.elapsed();

    let metrics = stage.metrics();
    println!("=== Portfolio Backdrop ===");
    println!(
        "Viewport: {}x{} CSS px @ {}x",
        viewport.width, viewport.height, viewport.device_pixel_ratio
    );
    println!("Frames: {} in {:.2?}", metrics.frame_count, elapsed);
    println!("Particles: {}", metrics.layers.particle_count);
    println!("Links: {}", metrics.layers.link_count);
    println!("Flakes: {}", metrics.layers.flake_count);
    println!("Parallax offset: {:.2} px", metrics.layers.parallax_offset_px);
    if options.realtime {
        println!("FPS: {}", metrics.fps);
    }

    if let Some(csv) = csv {
        let path = csv.finish()?;
        println!("CSV: {}", path.display());
    }

    if options.screenshot {
        let canvas = stage.composite()?;
        let path = save_frame(&canvas)?;
        println!("Screenshot: {}", path.display());
    }

    if let Some((repo, fetcher, handle)) = fetch {
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::warn!("Stats refresh thread panicked");
            }
        }
        let stats = fetcher.current();
        let show = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "{}: {} stars, {} forks, updated {}",
            repo,
            show(stats.stars),
            show(stats.forks),
            stats.updated_at.as_deref().unwrap_or("-")
        );
        let path = export_stats_json(&repo, &stats)?;
        println!("Stats: {}", path.display());
    }

    Ok(())
}
