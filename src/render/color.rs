//! Colours and theme palette.

use anyhow::{bail, Context, Result};

use crate::config::ThemeParameters;

/// Opaque 8-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let raw = hex.trim().trim_start_matches('#');
        if raw.len() != 6 || !raw.is_ascii() {
            bail!("expected a #rrggbb colour, got {hex:?}");
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&raw[range], 16).with_context(|| format!("invalid hex colour {hex:?}"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Colour with straight (non-premultiplied) alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// Premultiplied linear components in [0, 1]
    pub fn premultiplied(&self) -> [f32; 4] {
        let a = self.alpha;
        [
            self.rgb.r as f32 / 255.0 * a,
            self.rgb.g as f32 / 255.0 * a,
            self.rgb.b as f32 / 255.0 * a,
            a,
        ]
    }
}

/// Colours the layers paint with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub primary: Rgb,
}

impl Palette {
    /// Resolve theme strings, falling back per colour when one does not parse
    pub fn from_theme(theme: &ThemeParameters) -> Self {
        let defaults = Self::default();
        let resolve = |value: &str, fallback: Rgb, label: &str| match Rgb::from_hex(value) {
            Ok(rgb) => rgb,
            Err(e) => {
                log::warn!("Theme {} colour unusable ({:#}), using default", label, e);
                fallback
            }
        };
        Self {
            background: resolve(&theme.background, defaults.background, "background"),
            primary: resolve(&theme.primary, defaults.primary, "primary"),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x0a, 0x0f, 0x17),
            primary: Rgb::new(0x00, 0x83, 0x8f),
        }
    }
}
