//! State data structures for the backdrop layers.
//!
//! Contains the per-entity records mutated by the animators, the viewport
//! snapshot they are sized against, and the metrics they report.

mod flake;
mod metrics;
mod particle;
mod viewport;

pub use flake::{Snowflake, RESPAWN_Y_PX};
pub use metrics::{FrameMetrics, LayerStats};
pub use particle::Particle;
pub use viewport::Viewport;
