//! Single-octave 1D Perlin noise.

use rand::Rng;
use rand::seq::SliceRandom;

/// Number of times the identity permutation is reshuffled.
pub const DEFAULT_SHUFFLES: usize = 100;

/// One octave: a shuffled 0..=255 permutation, stored twice so lookups at
/// `i + 1` never need a wrap-around check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseOctave {
    perm: [u8; 512],
}

impl NoiseOctave {
    /// Shuffle the identity permutation `shuffles` times using `rng`.
    pub fn new<R: Rng + ?Sized>(shuffles: usize, rng: &mut R) -> Self {
        let mut supply: Vec<u8> = (0..=255).collect();
        for _ in 0..shuffles {
            supply.shuffle(rng);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&supply);
        perm[256..].copy_from_slice(&supply);
        Self { perm }
    }

    /// The full 512-entry lookup table.
    pub fn permutation(&self) -> &[u8] {
        &self.perm
    }

    /// Noise at `x`, scaled by `scale`. Zero at every integer lattice point.
    pub fn noise(&self, x: f64, scale: f64) -> f64 {
        let floor = x.floor();
        let i0 = floor as i64;
        let f0 = x - floor;
        let f1 = f0 - 1.0;
        let i1 = ((i0 + 1) & 255) as usize;
        let i0 = (i0 & 255) as usize;

        let s = fade(f0);
        let n0 = grad(self.perm[i0], f0);
        let n1 = grad(self.perm[i1], f1);

        scale * lerp(s, n0, n1)
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Gradient of magnitude 1..=8 from the low three bits, negated by bit 3.
#[inline]
pub fn grad(hash: u8, x: f64) -> f64 {
    let h = hash & 15;
    let g = 1.0 + (h & 7) as f64;
    if h & 8 != 0 { -g * x } else { g * x }
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}
