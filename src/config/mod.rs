//! Configuration module for loading layer and fetcher parameters.

mod parameters;

pub use parameters::{
    Parameters, ParticleFieldParameters, SnowfallParameters, StatsParameters, ThemeParameters,
};
