#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure terrain classification system driving procedural map generation.
//!
//! Classification maps one coherent-noise height sample to a cell kind and
//! height byte. The noise source and the random stream feeding the resource
//! rolls are both injected seams, so generation is reproducible for a given
//! seed and tests can script every draw.

use noise::{NoiseFn, Perlin};
use outpost_core::CellType;
use rand::Rng;

/// Tuning knobs for the coherent-noise height source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Base frequency applied to both noise axes; lower values produce
    /// larger terrain features.
    pub frequency: f64,
    /// Scale applied to raw noise samples before classification.
    pub amplitude: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            amplitude: 1.0,
        }
    }
}

/// Deterministic coherent-noise height source sampled once per cell.
pub trait NoiseSource {
    /// Produces the height sample for the provided cell coordinates.
    fn height(&self, x: u32, y: u32) -> f64;
}

/// Seeded Perlin height source with frequency and amplitude shaping.
#[derive(Clone, Copy, Debug)]
pub struct PerlinHeight {
    perlin: Perlin,
    config: GenerationConfig,
}

impl PerlinHeight {
    /// Creates a height source for the provided seed and tuning.
    #[must_use]
    pub fn new(seed: u32, config: GenerationConfig) -> Self {
        Self {
            perlin: Perlin::new(seed),
            config,
        }
    }
}

impl NoiseSource for PerlinHeight {
    fn height(&self, x: u32, y: u32) -> f64 {
        let sample = self.perlin.get([
            f64::from(x) * self.config.frequency,
            f64::from(y) * self.config.frequency,
        ]);
        sample * self.config.amplitude
    }
}

/// Injected stream of uniform random draws consumed by classification.
pub trait RandomStream {
    /// Draws a uniform integer in `[0, bound)`.
    fn next_below(&mut self, bound: u32) -> u32;
}

/// Production [`RandomStream`] backed by a seedable `rand` generator.
#[derive(Clone, Debug)]
pub struct RngStream<R> {
    rng: R,
}

impl<R: Rng> RngStream<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomStream for RngStream<R> {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

const WATER_BELOW: i64 = 10;
const GRASS_BELOW: i64 = 20;
const WOOD_ABOVE: i64 = 40;
const RESOURCE_CHANCE_BOUND: u32 = 5;
const RESOURCE_CHANCE_HIT: u32 = 1;

/// Classifies one height sample into a cell kind and height byte.
///
/// The threshold chain is a sequence of overrides, not exclusive ranges, and
/// the secondary resource checks are independent `if`s so a later match
/// overwrites an earlier one. Both properties, together with the draw order
/// (roll before chance), are fixed: changing any of them changes every world
/// generated from a given seed.
#[must_use]
pub fn classify(height_sample: f64, rolls: &mut impl RandomStream) -> (CellType, u8) {
    let value = (height_sample.abs() * 100.0) as i64;

    let mut kind = CellType::Grass;
    let mut height = 0u8;
    if value < WATER_BELOW {
        kind = CellType::Water;
        height = saturate(value * 2);
    } else if value < GRASS_BELOW {
        kind = CellType::Grass;
    } else if value > WOOD_ABOVE {
        kind = CellType::Wood;
    }

    if kind == CellType::Grass {
        height = saturate(value);
        let roll = rolls.next_below(100);
        if rolls.next_below(RESOURCE_CHANCE_BOUND) == RESOURCE_CHANCE_HIT {
            if (70..=73).contains(&roll) {
                kind = CellType::Gold;
            }
            if (60..=70).contains(&roll) {
                kind = CellType::Stone;
            }
            if (50..=53).contains(&roll) {
                kind = CellType::Food;
            }
        }
    }

    (kind, height)
}

fn saturate(value: i64) -> u8 {
    u8::try_from(value.clamp(0, i64::from(u8::MAX))).unwrap_or(u8::MAX)
}
