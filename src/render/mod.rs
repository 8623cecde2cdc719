//! # Rendering Module
//!
//! PNG previews of generated geometry. The generators themselves never touch
//! pixels; this module is the only consumer of the `image` crate.
//!
//! ## Usage Example
//!
//! ```
//! use geomancy::color::Color;
//! use geomancy::fractal::koch;
//! use geomancy::geometry::Canvas;
//! use geomancy::render::rasterize;
//!
//! let canvas = Canvas::new(320, 240);
//! let params = koch::Params::default();
//! let drawing = koch::generate(&params, &canvas).to_drawing(&canvas, params.color, params.brush);
//!
//! let img = rasterize(&drawing, &Color::WHITE);
//! assert_eq!(img.dimensions(), (320, 240));
//! ```

pub mod raster;

pub use raster::{rasterize, save_png};
