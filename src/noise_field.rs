//! Reproducible scalar noise fields.
//!
//! Every field is a pure function of `(x, y, seed, salt)`: there is no RNG
//! state to thread through the pipeline, so the same inputs always produce
//! the same layer regardless of call order.

use noise::{NoiseFn, Perlin};

const DOT_X: f64 = 12.9898;
const DOT_Y: f64 = 78.233;
const DOT_SEED: f64 = 43758.5453;
const DOT_SALT: f64 = 7919.0;
const SCRAMBLE: f64 = 43758.5453;

/// Source of per-coordinate noise in `[0, 1)`.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64, seed: i64, salt: i64) -> f64;

    /// Fill an `n`×`n` layer. Sources with per-`(seed, salt)` setup override
    /// this to do that work once per layer instead of once per cell.
    fn layer(&self, scale: f64, salt: i64, seed: i64, n: usize) -> Vec<Vec<f64>> {
        fill_layer(scale, n, |x, y| self.sample(x, y, seed, salt))
    }
}

/// Closures work as noise sources, which keeps test stubs short.
impl<F> NoiseSource for F
where
    F: Fn(f64, f64, i64, i64) -> f64 + Send + Sync,
{
    fn sample(&self, x: f64, y: f64, seed: i64, salt: i64) -> f64 {
        self(x, y, seed, salt)
    }
}

/// The sine hash the tactical board has always used.
///
/// Not random in any statistical sense, but stable and stateless. `sin`
/// goes through `libm` so the bits match on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigHashNoise;

impl NoiseSource for TrigHashNoise {
    fn sample(&self, x: f64, y: f64, seed: i64, salt: i64) -> f64 {
        trig_hash(x, y, seed, salt)
    }
}

/// `((sin(dot) * K) mod 1 + 1) / 2`; `%` keeps the dividend's sign, so the
/// fractional part lies in `(-1, 1)` before the shift.
pub fn trig_hash(x: f64, y: f64, seed: i64, salt: i64) -> f64 {
    let dot = x * DOT_X + y * DOT_Y + seed as f64 * DOT_SEED + salt as f64 * DOT_SALT;
    ((libm::sin(dot) * SCRAMBLE) % 1.0 + 1.0) / 2.0
}

/// Seeded Perlin gradient noise behind the same contract.
///
/// Produces smoother fields than the hash; boards will not match the
/// reference visuals when this source is selected.
#[derive(Debug, Clone, Copy)]
pub struct PerlinNoise {
    /// Multiplier applied to the layer coordinates before sampling
    pub frequency: f64,
}

impl Default for PerlinNoise {
    fn default() -> Self {
        PerlinNoise { frequency: 1.7 }
    }
}

impl PerlinNoise {
    fn sample_with(&self, perlin: &Perlin, x: f64, y: f64, salt: i64) -> f64 {
        // Offset off the integer lattice, where Perlin is always zero.
        let offset = 0.5 + salt as f64 * 0.137;
        let value = perlin.get([x * self.frequency + offset, y * self.frequency + offset]);
        ((value + 1.0) / 2.0).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64, seed: i64, salt: i64) -> f64 {
        self.sample_with(&Perlin::new(mix_seed(seed, salt)), x, y, salt)
    }

    fn layer(&self, scale: f64, salt: i64, seed: i64, n: usize) -> Vec<Vec<f64>> {
        let perlin = Perlin::new(mix_seed(seed, salt));
        fill_layer(scale, n, |x, y| self.sample_with(&perlin, x, y, salt))
    }
}

fn mix_seed(seed: i64, salt: i64) -> u32 {
    let mixed = (seed as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((salt as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9));
    (mixed ^ (mixed >> 32)) as u32
}

/// Fill an `n`×`n` layer; cell (i, j) samples `(i/n*scale, j/n*scale)`.
pub fn generate_noise_layer(
    source: &dyn NoiseSource,
    scale: f64,
    salt: i64,
    seed: i64,
    n: usize,
) -> Vec<Vec<f64>> {
    source.layer(scale, salt, seed, n)
}

fn fill_layer(scale: f64, n: usize, sample: impl Fn(f64, f64) -> f64) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let nx = i as f64 / n as f64 * scale;
                    let ny = j as f64 / n as f64 * scale;
                    sample(nx, ny)
                })
                .collect()
        })
        .collect()
}
