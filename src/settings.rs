use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::classifier::BiomeThresholds;
use crate::error::TerrainResult;
use crate::features::FeatureSettings;
use crate::height::HeightLayers;
use crate::smoothing::SmoothingSettings;

/// Which noise function feeds the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Sine hash; reproduces the reference boards exactly
    #[default]
    TrigHash,
    /// Seeded Perlin gradient noise
    Perlin,
}

/// Every tunable of the generator. Defaults are the reference values; a
/// settings file only needs the fields it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub noise: NoiseKind,
    pub layers: HeightLayers,
    pub thresholds: BiomeThresholds,
    pub smoothing: SmoothingSettings,
    pub features: FeatureSettings,
}

impl GenerationSettings {
    pub fn validate(&self) -> TerrainResult<()> {
        self.layers.validate()?;
        self.thresholds.validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> TerrainResult<Self> {
        let settings: GenerationSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> TerrainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
