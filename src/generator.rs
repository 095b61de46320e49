//! The terrain pipeline: noise → height → biome → smoothing → features.
//!
//! The output is a pure function of `(seed, size, settings)`. Seed `1` is
//! reserved for the baked-in reference board.

use tracing::debug;

use crate::error::{TerrainError, TerrainResult};
use crate::features::FeatureInjector;
use crate::noise_field::{NoiseSource, PerlinNoise, TrigHashNoise};
use crate::settings::{GenerationSettings, NoiseKind};
use crate::smoothing::CoastalSmoother;
use crate::terrain::{TerrainGrid, TerrainType};

/// Seed that selects the fixed first-load board.
pub const REFERENCE_SEED: i64 = 1;

pub const DEFAULT_GRID_SIZE: usize = 6;

pub struct TerrainGenerator {
    settings: GenerationSettings,
    noise: Box<dyn NoiseSource>,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        TerrainGenerator {
            settings: GenerationSettings::default(),
            noise: Box::new(TrigHashNoise),
        }
    }
}

impl TerrainGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `settings` and picks the noise source they name.
    pub fn with_settings(settings: GenerationSettings) -> TerrainResult<Self> {
        let noise: Box<dyn NoiseSource> = match settings.noise {
            NoiseKind::TrigHash => Box::new(TrigHashNoise),
            NoiseKind::Perlin => Box::new(PerlinNoise::default()),
        };
        Self::with_noise(settings, noise)
    }

    /// Like `with_settings` but with a caller-supplied noise source;
    /// `settings.noise` is ignored.
    pub fn with_noise(settings: GenerationSettings, noise: Box<dyn NoiseSource>) -> TerrainResult<Self> {
        settings.validate()?;
        Ok(TerrainGenerator { settings, noise })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn generate(&self, seed: i64, size: usize) -> TerrainGrid {
        if seed == REFERENCE_SEED {
            debug!(seed, requested_size = size, "using reference terrain");
            return TerrainGrid::reference();
        }

        let classified = self.classify(seed, size);
        let smoothed = CoastalSmoother::new(self.settings.smoothing).smooth(classified);
        let featured = FeatureInjector::new(self.settings.features).inject(smoothed, self.noise.as_ref(), seed);

        let grid = TerrainGrid::from_rows(featured);
        debug!(
            seed,
            size,
            sea = grid.sea_tiles().len(),
            beach = grid.count(TerrainType::Beach),
            "generated terrain"
        );
        grid
    }

    /// Combined height field before classification.
    pub fn height_field(&self, seed: i64, size: usize) -> Vec<Vec<f64>> {
        self.settings.layers.synthesize(self.noise.as_ref(), seed, size)
    }

    /// Biome grid straight out of the classifier, before smoothing.
    pub fn classify(&self, seed: i64, size: usize) -> Vec<Vec<TerrainType>> {
        let heights = self.height_field(seed, size);
        self.settings.thresholds.classify_field(&heights)
    }
}

/// Generate a board with the reference settings.
pub fn generate_terrain(seed: i64, size: usize) -> TerrainGrid {
    TerrainGenerator::default().generate(seed, size)
}

/// Entry point for signed sizes from untrusted callers: negative sizes are
/// rejected instead of being wrapped or truncated.
pub fn generate_terrain_checked(seed: i64, size: i64) -> TerrainResult<TerrainGrid> {
    Ok(generate_terrain(seed, grid_size(size)?))
}

pub fn grid_size(size: i64) -> TerrainResult<usize> {
    usize::try_from(size).map_err(|_| TerrainError::InvalidGridSize(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::{neighbor_counts, relax_beach};
    use crate::terrain::TerrainType::*;
    use proptest::prelude::*;

    #[test]
    fn test_deterministic_for_sizes() {
        for seed in [0, 2, 42, 1337, -7] {
            for size in [1, 6, 10] {
                assert_eq!(generate_terrain(seed, size), generate_terrain(seed, size));
            }
        }
    }

    #[test]
    fn test_reference_seed_ignores_size() {
        let reference = TerrainGrid::reference();
        assert_eq!(generate_terrain(REFERENCE_SEED, 6), reference);
        assert_eq!(generate_terrain(REFERENCE_SEED, 10), reference);
        assert_eq!(generate_terrain(REFERENCE_SEED, 0), reference);
    }

    #[test]
    fn test_zero_size_is_empty() {
        let grid = generate_terrain(42, 0);
        assert!(grid.is_empty());
        assert!(grid.rows().is_empty());
    }

    #[test]
    fn test_seed_42_board() {
        let grid = generate_terrain(42, DEFAULT_GRID_SIZE);
        let expected = vec![
            vec![ShallowWater, Lowland, Lowland, ShallowWater, DeepWater, Lowland],
            vec![Lowland, Highland, Highland, Highland, Lowland, Highland],
            vec![Highland, Highland, Beach, DeepWater, ShallowWater, Lowland],
            vec![ShallowWater, Beach, ShallowWater, DeepWater, Lowland, Highland],
            vec![Lowland, Highland, Highland, Highland, Mountain, Lowland],
            vec![Mountain, Lowland, DeepWater, Lowland, Highland, Beach],
        ];
        assert_eq!(grid.rows(), expected.as_slice());
        assert!(!grid.sea_tiles().is_empty());
    }

    #[test]
    fn test_every_default_board_has_sea() {
        for seed in 2..300 {
            let grid = generate_terrain(seed, DEFAULT_GRID_SIZE);
            assert!(!grid.sea_tiles().is_empty(), "seed {seed} produced no sea tiles");
        }
    }

    #[test]
    fn test_checked_rejects_negative_size() {
        assert!(matches!(
            generate_terrain_checked(5, -1),
            Err(TerrainError::InvalidGridSize(-1))
        ));
        assert_eq!(generate_terrain_checked(5, 6).unwrap(), generate_terrain(5, 6));
    }

    #[test]
    fn test_with_settings_validates() {
        let mut settings = GenerationSettings::default();
        settings.layers.continental.weight = 0.1;
        assert!(TerrainGenerator::with_settings(settings).is_err());
    }

    #[test]
    fn test_generator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerrainGenerator>();
    }

    #[test]
    fn test_stub_noise_drives_whole_pipeline() {
        // Height 0.5 everywhere -> lowland; feature noise 0.95 turns it into lakes.
        let noise = |_: f64, _: f64, _: i64, salt: i64| if salt == 4 { 0.95 } else { 0.5 };
        let generator = TerrainGenerator::with_noise(GenerationSettings::default(), Box::new(noise)).unwrap();
        let grid = generator.generate(9, 4);
        assert_eq!(grid.count(ShallowWater), 16);

        let calm = |_: f64, _: f64, _: i64, _: i64| 0.5;
        let generator = TerrainGenerator::with_noise(GenerationSettings::default(), Box::new(calm)).unwrap();
        assert_eq!(generator.generate(9, 4).count(Lowland), 16);
    }

    #[test]
    fn test_perlin_pipeline_is_deterministic() {
        let settings = GenerationSettings { noise: NoiseKind::Perlin, ..Default::default() };
        let generator = TerrainGenerator::with_settings(settings).unwrap();
        assert_eq!(generator.generate(77, 8), generator.generate(77, 8));
        assert_eq!(generator.generate(77, 8).size(), 8);
    }

    #[test]
    fn test_corners_smoothed_in_bounds() {
        let generator = TerrainGenerator::default();
        for seed in 2..50 {
            let before = generator.classify(seed, 6);
            let after = crate::smoothing::smooth_pass(&before, false);
            for (row, col) in [(0, 0), (0, 5), (5, 0), (5, 5)] {
                if before[row][col] == Beach {
                    let (water, land) = neighbor_counts(&before, row, col, false);
                    assert_eq!(water + land, 3);
                    let expected = relax_beach(water, land).unwrap_or(Beach);
                    assert_eq!(after[row][col], expected);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn shape_and_determinism(seed in any::<i64>(), size in 1usize..16) {
            prop_assume!(seed != REFERENCE_SEED);
            let grid = generate_terrain(seed, size);
            prop_assert_eq!(grid.size(), size);
            prop_assert_eq!(grid.rows().len(), size);
            for row in grid.rows() {
                prop_assert_eq!(row.len(), size);
            }
            prop_assert_eq!(&grid, &generate_terrain(seed, size));
        }

        #[test]
        fn labels_are_closed(seed in -10_000i64..10_000) {
            let grid = generate_terrain(seed, DEFAULT_GRID_SIZE);
            let json = serde_json::to_value(&grid).unwrap();
            let labels: Vec<&str> = TerrainType::ALL.iter().map(|t| t.label()).collect();
            for row in json.as_array().unwrap() {
                for cell in row.as_array().unwrap() {
                    prop_assert!(labels.contains(&cell.as_str().unwrap()));
                }
            }
        }
    }
}
