//! # Noise
//!
//! 1D Perlin noise with explicit, seedable permutation tables.
//!
//! - [`octave`]: one shuffled permutation table and its noise function
//! - [`field`]: octave stacks with classic and fractal composition
//!
//! ## Example
//!
//! ```
//! use geomancy::noise::{NoiseField, normalize};
//!
//! let field = NoiseField::seeded(8, 0.1, Some(0.4), 42);
//! let v = normalize(field.fractal(17.0, 100.0, 2.5, 0.4));
//! assert!((0.0..=1.0).contains(&v));
//! ```

pub mod field;
pub mod octave;

pub use field::{DEFAULT_GAIN, DEFAULT_LACUNARITY, DEFAULT_SCALE, NoiseField, normalize};
pub use octave::{DEFAULT_SHUFFLES, NoiseOctave};
