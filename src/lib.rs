//! Portfolio Backdrop - animated particle-network and snowfall backdrop
//!
//! Headless rendition of a portfolio page background: a drifting,
//! interconnected particle field with scroll parallax, a depth-layered
//! snowfall overlay, and a cached GitHub repository stats fetcher.

pub mod config;
pub mod export;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod stats;

pub use config::Parameters;
pub use physics::{Parallax, ParticleField, Snowfall};
pub use render::{Palette, PixelCanvas, RecordingSurface, Surface};
pub use scheduler::{FrameLoop, FrameQueue, Ticker};
pub use stage::{FieldLayer, Layer, SnowLayer, Stage};
pub use state::{FrameMetrics, Viewport};
pub use stats::{GithubClient, MemoryStore, RepoStats, RepoStatsFetcher, SessionStore, StatsSource};
