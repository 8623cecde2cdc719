//! # Geomancy - Procedural Vector Geometry
//!
//! Geomancy generates reproducible, parameterized, recursively defined
//! shapes for image-editing hosts. It provides:
//!
//! - **Point algebra**: rotation, reflection and polar construction
//! - **Color model**: WCAG luminance, contrast ratios and blending
//! - **Noise**: seedable 1D Perlin noise with fractal composition
//! - **Generators**: Koch curves, Sierpinski triangles, fractal trees,
//!   concentric ellipses, lightning bolts and guide grids
//!
//! Generators return typed geometry (sides, depth layers, ellipses, bolt
//! paths) that converts into a uniform [`Drawing`]. Randomness is always
//! injected, so the same seed gives the same shape.
//!
//! ## Quick Start
//!
//! ```
//! use geomancy::fractal::{self, Generator};
//! use geomancy::geometry::Canvas;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut tree = fractal::by_name("tree").unwrap();
//! tree.set_param("max_depth", "6").unwrap();
//!
//! let canvas = Canvas::new(800, 600);
//! let drawing = tree.draw(&canvas, &mut StdRng::seed_from_u64(7));
//! assert_eq!(drawing.strokes.len(), 63);
//!
//! # Ok::<(), String>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Points, canvas bounds and drawings |
//! | [`color`] | Colors, luminance and gradients |
//! | [`noise`] | Perlin noise octaves and fields |
//! | [`fractal`] | Shape generators and the generator registry |
//! | [`render`] | PNG previews |
//! | [`error`] | Error types |

pub mod color;
pub mod error;
pub mod fractal;
pub mod geometry;
pub mod noise;
pub mod render;

// Re-exports for convenience
pub use color::Color;
pub use error::GeomancyError;
pub use fractal::Generator;
pub use geometry::{Canvas, Drawing, Point, Stroke};
