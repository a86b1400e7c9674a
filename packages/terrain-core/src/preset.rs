use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Shape parameters for midpoint displacement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetParams {
    /// Starting ground level (y grows downwards).
    pub base_height: f32,
    /// Maximum midpoint offset at the first subdivision.
    pub variation: f32,
    /// Factor applied to `variation` at each halving, in `(0, 1)`.
    pub roughness: f32,
}

impl PresetParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.roughness > 0.0 && self.roughness < 1.0) {
            return Err(TerrainError::InvalidRoughness(self.roughness));
        }
        if !self.variation.is_finite() || self.variation < 0.0 {
            return Err(TerrainError::InvalidVariation(self.variation));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainPreset {
    #[default]
    RollingHills,
    FlatPlains,
    Mountains,
    Cratered,
}

impl TerrainPreset {
    pub const ALL: [TerrainPreset; 4] = [
        TerrainPreset::RollingHills,
        TerrainPreset::FlatPlains,
        TerrainPreset::Mountains,
        TerrainPreset::Cratered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TerrainPreset::RollingHills => "Rolling Hills",
            TerrainPreset::FlatPlains => "Flat Plains",
            TerrainPreset::Mountains => "Mountains",
            TerrainPreset::Cratered => "Cratered",
        }
    }

    pub fn params(&self) -> PresetParams {
        match self {
            TerrainPreset::RollingHills => PresetParams {
                base_height: 420.0,
                variation: 90.0,
                roughness: 0.5,
            },
            TerrainPreset::FlatPlains => PresetParams {
                base_height: 450.0,
                variation: 30.0,
                roughness: 0.35,
            },
            TerrainPreset::Mountains => PresetParams {
                base_height: 360.0,
                variation: 160.0,
                roughness: 0.62,
            },
            TerrainPreset::Cratered => PresetParams {
                base_height: 430.0,
                variation: 70.0,
                roughness: 0.5,
            },
        }
    }

    /// Whether generation stamps pregenerated depressions into the profile.
    pub fn has_pregenerated_craters(&self) -> bool {
        matches!(self, TerrainPreset::Cratered)
    }
}

impl fmt::Display for TerrainPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TerrainPreset {
    type Err = TerrainError;

    /// Accepts `rolling_hills`, `rolling-hills`, `RollingHills` and the label,
    /// ignoring case. Anything else is an error, never a fallback.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "rollinghills" => Ok(TerrainPreset::RollingHills),
            "flatplains" => Ok(TerrainPreset::FlatPlains),
            "mountains" => Ok(TerrainPreset::Mountains),
            "cratered" => Ok(TerrainPreset::Cratered),
            _ => Err(TerrainError::UnknownPreset(s.to_string())),
        }
    }
}
