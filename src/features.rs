use serde::{Deserialize, Serialize};

use crate::noise_field::{generate_noise_layer, NoiseSource};
use crate::terrain::TerrainType;

/// Island and lake overlay, driven by its own noise layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    pub scale: f64,
    pub salt: i64,
    /// Water above this noise value becomes a beach islet
    pub island_threshold: f64,
    /// Lowland/highland above this noise value becomes a lake
    pub lake_threshold: f64,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        FeatureSettings {
            scale: 3.0,
            salt: 4,
            island_threshold: 0.85,
            lake_threshold: 0.90,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureInjector {
    pub settings: FeatureSettings,
}

impl FeatureInjector {
    pub fn new(settings: FeatureSettings) -> Self {
        FeatureInjector { settings }
    }

    /// Single overlay pass: no iteration, no neighbour checks.
    pub fn inject(
        &self,
        grid: Vec<Vec<TerrainType>>,
        source: &dyn NoiseSource,
        seed: i64,
    ) -> Vec<Vec<TerrainType>> {
        let n = grid.len();
        let feature = generate_noise_layer(source, self.settings.scale, self.settings.salt, seed, n);
        grid.into_iter()
            .zip(feature)
            .map(|(row, noise_row)| {
                row.into_iter()
                    .zip(noise_row)
                    .map(|(cell, value)| self.apply(cell, value))
                    .collect()
            })
            .collect()
    }

    pub fn apply(&self, cell: TerrainType, feature: f64) -> TerrainType {
        match cell {
            TerrainType::DeepWater | TerrainType::ShallowWater
                if feature > self.settings.island_threshold =>
            {
                TerrainType::Beach
            }
            TerrainType::Lowland | TerrainType::Highland if feature > self.settings.lake_threshold => {
                TerrainType::ShallowWater
            }
            other => other,
        }
    }
}
