//! Deterministic procedural terrain for the tactical battleship board.
//!
//! `generate_terrain(seed, size)` turns a seed into a square biome grid by
//! summing noise layers into a height field, classifying heights into six
//! terrain categories, smoothing stray beaches, and overlaying islands and
//! lakes. The result can be cached per key, rendered, and used to place a
//! fleet on its sea tiles.

pub mod cache;
pub mod classifier;
pub mod error;
pub mod features;
pub mod generator;
pub mod height;
pub mod noise_field;
pub mod renderer;
pub mod settings;
pub mod ships;
pub mod smoothing;
pub mod terrain;

pub use cache::TerrainCache;
pub use error::{TerrainError, TerrainResult};
pub use generator::{
    generate_terrain, generate_terrain_checked, TerrainGenerator, DEFAULT_GRID_SIZE, REFERENCE_SEED,
};
pub use noise_field::{NoiseSource, PerlinNoise, TrigHashNoise};
pub use settings::{GenerationSettings, NoiseKind};
pub use ships::{default_fleet, place_fleet, reveal_moves, Fleet, Move, ShipSpec};
pub use terrain::{cell_label, TerrainGrid, TerrainType};
