//! Multi-octave noise field.

use super::octave::{DEFAULT_SHUFFLES, NoiseOctave};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Output scale applied when none is given.
pub const DEFAULT_SCALE: f64 = 0.188;
/// Per-octave frequency multiplier for [`NoiseField::fractal`].
pub const DEFAULT_LACUNARITY: f64 = 2.0;
/// Per-octave amplitude multiplier for [`NoiseField::fractal`].
pub const DEFAULT_GAIN: f64 = 0.65;

/// An ordered stack of independently shuffled octaves.
///
/// Evaluation is a pure function of the input once constructed.
#[derive(Debug, Clone)]
pub struct NoiseField {
    octaves: Vec<NoiseOctave>,
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
    scale: f64,
}

impl NoiseField {
    /// Build `octave_count` octaves, each shuffled from `rng`.
    ///
    /// `frequency[i] = 2^-i` and `amplitude[i] = persistence^(octave_count - i)`.
    pub fn new<R: Rng + ?Sized>(
        octave_count: usize,
        persistence: f64,
        scale: Option<f64>,
        rng: &mut R,
    ) -> Self {
        let octaves = (0..octave_count)
            .map(|_| NoiseOctave::new(DEFAULT_SHUFFLES, rng))
            .collect();
        let frequencies = (0..octave_count).map(|i| 0.5f64.powi(i as i32)).collect();
        let amplitudes = (0..octave_count)
            .map(|i| persistence.powi((octave_count - i) as i32))
            .collect();

        Self {
            octaves,
            frequencies,
            amplitudes,
            scale: scale.unwrap_or(DEFAULT_SCALE),
        }
    }

    /// Same as [`NoiseField::new`] with a private `StdRng` seeded from `seed`.
    pub fn seeded(octave_count: usize, persistence: f64, scale: Option<f64>, seed: u64) -> Self {
        Self::new(
            octave_count,
            persistence,
            scale,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    pub fn octaves(&self) -> &[NoiseOctave] {
        &self.octaves
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sum of every octave at `x * frequency[i]`, weighted by `amplitude[i]`.
    pub fn noise(&self, x: f64) -> f64 {
        self.octaves
            .iter()
            .zip(self.frequencies.iter().zip(&self.amplitudes))
            .map(|(octave, (freq, amp))| octave.noise(x * freq, self.scale) * amp)
            .sum()
    }

    /// Fractal composition: frequency starts at `1 / hgrid` and amplitude at
    /// `gain`; after each octave they are multiplied by `lacunarity` and
    /// `gain` respectively.
    pub fn fractal(&self, x: f64, hgrid: f64, lacunarity: f64, gain: f64) -> f64 {
        let mut frequency = 1.0 / hgrid;
        let mut amplitude = gain;
        let mut total = 0.0;

        for octave in &self.octaves {
            total += octave.noise(x * frequency, self.scale) * amplitude;
            frequency *= lacunarity;
            amplitude *= gain;
        }

        total
    }
}

/// Map a roughly [-1, 1] noise value into [0, 1], clamping outliers.
#[inline]
pub fn normalize(v: f64) -> f64 {
    ((1.0 + v) / 2.0).clamp(0.0, 1.0)
}
