//! # Geometry
//!
//! Point algebra, the working canvas and the drawing output format.
//!
//! - [`point`]: [`Point`] with rotation, reflection, jitter and friends
//! - [`canvas`]: [`Canvas`] bounds, padding clamp, percent resolution
//! - [`drawing`]: [`Drawing`] / [`Stroke`] returned to hosts

pub mod canvas;
pub mod drawing;
pub mod point;

pub use canvas::Canvas;
pub use drawing::{Drawing, Stroke};
pub use point::{Point, bounds};

/// A polyline: an ordered run of points.
pub type Polyline = Vec<Point>;
