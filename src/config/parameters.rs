//! Parameter structures for the backdrop layers and the stats fetcher.
//!
//! Every structure can be loaded from a JSON file and falls back to its
//! defaults when the file is missing or malformed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level parameters container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Particle network layer
    pub field: ParticleFieldParameters,
    /// Snowfall layer
    pub snowfall: SnowfallParameters,
    /// Colours shared by the layers
    pub theme: ThemeParameters,
    /// Repository stats endpoint
    pub stats: StatsParameters,
}

impl Parameters {
    /// Load parameters from the default directory, or use defaults
    pub fn load_or_default() -> Self {
        Self::load_from_dir("data/parameters")
    }

    /// Load parameters from a specific directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            field: ParticleFieldParameters::load_or_default(dir.join("field.json")),
            snowfall: SnowfallParameters::load_or_default(dir.join("snowfall.json")),
            theme: ThemeParameters::load_or_default(dir.join("theme.json")),
            stats: StatsParameters::load_or_default(dir.join("stats.json")),
        }
    }
}

fn load_json_or_default<T, P>(path: P, label: &str) -> T
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    match std::fs::read_to_string(path.as_ref()) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(params) => {
                log::info!("Loaded {} parameters from {:?}", label, path.as_ref());
                params
            }
            Err(e) => {
                log::warn!("Failed to parse {} parameters: {}, using defaults", label, e);
                T::default()
            }
        },
        Err(_) => {
            log::info!("{} parameters file not found, using defaults", label);
            T::default()
        }
    }
}

/// Particle network tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldParameters {
    /// Viewport area (px²) per particle; larger means fewer particles
    pub density: f64,
    /// Maximum distance (px) at which two particles are linked
    pub line_distance_px: f32,
    /// Visual strength, clamped to [0.4, 2.5]
    pub intensity: f32,
    /// Fraction of the scroll offset applied as a canvas translation
    pub parallax_factor: f32,
}

impl ParticleFieldParameters {
    pub const MIN_INTENSITY: f32 = 0.4;
    pub const MAX_INTENSITY: f32 = 2.5;

    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_json_or_default(path, "particle field")
    }

    /// Copy with out-of-range values replaced or clamped
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();

        let density = if self.density.is_finite() && self.density > 0.0 {
            self.density
        } else {
            defaults.density
        };
        let line_distance_px = if self.line_distance_px.is_finite() && self.line_distance_px > 0.0 {
            self.line_distance_px
        } else {
            defaults.line_distance_px
        };
        // Zero and NaN both mean "unset" for intensity
        let intensity = if self.intensity.is_finite() && self.intensity != 0.0 {
            self.intensity
        } else {
            1.0
        };
        let parallax_factor = if self.parallax_factor.is_finite() && self.parallax_factor != 0.0 {
            self.parallax_factor
        } else {
            defaults.parallax_factor
        };

        Self {
            density,
            line_distance_px,
            intensity: intensity.clamp(Self::MIN_INTENSITY, Self::MAX_INTENSITY),
            parallax_factor: parallax_factor.max(0.0),
        }
    }
}

impl Default for ParticleFieldParameters {
    fn default() -> Self {
        Self {
            density: 15000.0,
            line_distance_px: 140.0,
            intensity: 1.6,
            parallax_factor: 0.12,
        }
    }
}

/// Snowfall tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowfallParameters {
    /// When false the layer is never mounted
    pub enabled: bool,
    /// Viewport area (px²) per flake; larger means fewer flakes
    pub density: f64,
}

impl SnowfallParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_json_or_default(path, "snowfall")
    }

    /// Copy with a usable density
    pub fn sanitized(&self) -> Self {
        let density = if self.density.is_finite() && self.density > 0.0 {
            self.density
        } else {
            Self::default().density
        };
        Self {
            enabled: self.enabled,
            density,
        }
    }
}

impl Default for SnowfallParameters {
    fn default() -> Self {
        Self {
            enabled: true,
            density: 22000.0,
        }
    }
}

/// Theme colours as `#rrggbb` strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeParameters {
    /// Page background, painted under the particle network
    pub background: String,
    /// Particle and link colour
    pub primary: String,
}

impl ThemeParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_json_or_default(path, "theme")
    }
}

impl Default for ThemeParameters {
    fn default() -> Self {
        Self {
            background: "#0a0f17".to_string(),
            primary: "#00838f".to_string(),
        }
    }
}

/// Repository stats endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsParameters {
    /// Base URL; repositories are fetched from `{api_base_url}/repos/{owner}/{name}`
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header (GitHub rejects requests without one)
    pub user_agent: String,
}

impl StatsParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_json_or_default(path, "stats")
    }
}

impl Default for StatsParameters {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            timeout_secs: 10,
            user_agent: concat!("portfolio-backdrop/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
