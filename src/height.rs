use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::noise_field::{generate_noise_layer, NoiseSource};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// One octave of the height field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub scale: f64,
    pub salt: i64,
    pub weight: f64,
}

/// The three octaves summed into the height field.
///
/// Weights must add up to one: shifting weight onto the continental layer
/// grows larger contiguous landmasses, onto detail gives a noisier board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightLayers {
    pub continental: LayerSpec, // broad landmass shape
    pub mountain: LayerSpec,    // mid-frequency relief
    pub detail: LayerSpec,      // fine texture
}

impl Default for HeightLayers {
    fn default() -> Self {
        HeightLayers {
            continental: LayerSpec { scale: 1.0, salt: 1, weight: 0.5 },
            mountain: LayerSpec { scale: 2.0, salt: 2, weight: 0.3 },
            detail: LayerSpec { scale: 4.0, salt: 3, weight: 0.2 },
        }
    }
}

impl HeightLayers {
    pub fn layers(&self) -> [(&'static str, LayerSpec); 3] {
        [
            ("continental", self.continental),
            ("mountain", self.mountain),
            ("detail", self.detail),
        ]
    }

    pub fn weight_sum(&self) -> f64 {
        self.layers().iter().map(|(_, layer)| layer.weight).sum()
    }

    pub fn validate(&self) -> TerrainResult<()> {
        for (name, layer) in self.layers() {
            if !layer.scale.is_finite() {
                return Err(TerrainError::InvalidScale { layer: name, scale: layer.scale });
            }
        }
        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(TerrainError::InvalidWeights { sum });
        }
        Ok(())
    }

    /// Weighted sum of the three noise layers, cell by cell.
    pub fn synthesize(&self, source: &dyn NoiseSource, seed: i64, n: usize) -> Vec<Vec<f64>> {
        let mut height = vec![vec![0.0; n]; n];
        for (_, layer) in self.layers() {
            let field = generate_noise_layer(source, layer.scale, layer.salt, seed, n);
            for (out_row, noise_row) in height.iter_mut().zip(&field) {
                for (h, value) in out_row.iter_mut().zip(noise_row) {
                    *h += value * layer.weight;
                }
            }
        }
        height
    }
}
