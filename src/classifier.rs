use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::terrain::TerrainType;

/// Upper bounds (exclusive) of each height band; anything at or above
/// `highland` is mountain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    pub deep_water: f64,
    pub shallow_water: f64,
    pub beach: f64,
    pub lowland: f64,
    pub highland: f64,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        BiomeThresholds {
            deep_water: 0.30,
            shallow_water: 0.40,
            beach: 0.45,
            lowland: 0.60,
            highland: 0.75,
        }
    }
}

impl BiomeThresholds {
    pub fn as_array(&self) -> [f64; 5] {
        [self.deep_water, self.shallow_water, self.beach, self.lowland, self.highland]
    }

    pub fn validate(&self) -> TerrainResult<()> {
        let bounds = self.as_array();
        let ascending = bounds.windows(2).all(|pair| pair[0] < pair[1]);
        if !ascending || bounds.iter().any(|b| !b.is_finite()) {
            return Err(TerrainError::InvalidThresholds(bounds));
        }
        Ok(())
    }

    /// Half-open, lower-inclusive bands. NaN falls through to mountain.
    pub fn classify(&self, height: f64) -> TerrainType {
        if height < self.deep_water {
            TerrainType::DeepWater
        } else if height < self.shallow_water {
            TerrainType::ShallowWater
        } else if height < self.beach {
            TerrainType::Beach
        } else if height < self.lowland {
            TerrainType::Lowland
        } else if height < self.highland {
            TerrainType::Highland
        } else {
            TerrainType::Mountain
        }
    }

    pub fn classify_field(&self, heights: &[Vec<f64>]) -> Vec<Vec<TerrainType>> {
        heights
            .iter()
            .map(|row| row.iter().map(|&h| self.classify(h)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_boundaries_are_lower_inclusive() {
        let t = BiomeThresholds::default();
        assert_eq!(t.classify(0.0), TerrainType::DeepWater);
        assert_eq!(t.classify(0.2999), TerrainType::DeepWater);
        assert_eq!(t.classify(0.30), TerrainType::ShallowWater);
        assert_eq!(t.classify(0.40), TerrainType::Beach);
        assert_eq!(t.classify(0.45), TerrainType::Lowland);
        assert_eq!(t.classify(0.60), TerrainType::Highland);
        assert_eq!(t.classify(0.75), TerrainType::Mountain);
        assert_eq!(t.classify(3.0), TerrainType::Mountain);
    }

    #[test]
    fn test_out_of_range_inputs() {
        let t = BiomeThresholds::default();
        assert_eq!(t.classify(-5.0), TerrainType::DeepWater);
        assert_eq!(t.classify(f64::NEG_INFINITY), TerrainType::DeepWater);
        assert_eq!(t.classify(f64::INFINITY), TerrainType::Mountain);
        assert_eq!(t.classify(f64::NAN), TerrainType::Mountain);
    }

    #[test]
    fn test_validate_rejects_unordered() {
        let mut t = BiomeThresholds::default();
        assert!(t.validate().is_ok());
        t.beach = 0.35;
        assert!(matches!(t.validate(), Err(TerrainError::InvalidThresholds(_))));
        t.beach = 0.40;
        assert!(matches!(t.validate(), Err(TerrainError::InvalidThresholds(_))));
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(a in -1.0f64..2.0, b in -1.0f64..2.0) {
            let t = BiomeThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.classify(lo) <= t.classify(hi));
        }
    }
}
