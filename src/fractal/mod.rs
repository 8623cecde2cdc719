//! # Generators
//!
//! Recursive curve and shape generators. Each generator lives in its own
//! module with a typed `Params` struct, a typed output, and a struct
//! implementing the [`Generator`] trait so hosts can drive any of them by
//! name.
//!
//! ## Adding a New Generator
//!
//! 1. Create `src/fractal/mygen.rs` with a struct implementing [`Generator`]
//! 2. Add `pub mod mygen;` below
//! 3. Add to [`GENERATORS`] and the `by_name*` lookups

pub mod ellipses;
pub mod guides;
pub mod koch;
pub mod lightning;
pub mod polygon;
pub mod sierpinski;
pub mod tree;

use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing};
use rand::RngCore;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// All available generators, in display order.
pub const GENERATORS: &[&str] = &[
    "koch",
    "sierpinski",
    "tree",
    "ellipses",
    "lightning",
    "guides",
];

/// Trait for geometry generators.
pub trait Generator: Send + Sync {
    /// Generator name (lowercase, e.g., "koch").
    fn name(&self) -> &'static str;

    /// Run the generator over `canvas`. Deterministic generators ignore `rng`.
    fn draw(&self, canvas: &Canvas, rng: &mut dyn RngCore) -> Drawing;

    /// One-line summary of the current parameters.
    fn params_description(&self) -> String;

    /// Set a parameter from its string form. Values are clamped when used,
    /// so only unknown names and unparsable values are errors.
    fn set_param(&mut self, name: &str, value: &str) -> Result<(), String>;

    /// Current parameter values as `(name, value)` pairs.
    fn list_params(&self) -> Vec<(&'static str, String)>;

    /// Replace all parameters from a JSON object. Missing fields take defaults.
    fn load_config(&mut self, json: &str) -> Result<(), GeomancyError>;
}

/// Get a generator with default parameters.
pub fn by_name(name: &str) -> Option<Box<dyn Generator>> {
    match name.to_lowercase().as_str() {
        "koch" | "snowflake" => Some(Box::new(koch::Koch::default())),
        "sierpinski" => Some(Box::new(sierpinski::Sierpinski::default())),
        "tree" => Some(Box::new(tree::FractalTree::default())),
        "ellipses" => Some(Box::new(ellipses::Ellipses::default())),
        "lightning" => Some(Box::new(lightning::Lightning::default())),
        "guides" => Some(Box::new(guides::Guides::default())),
        _ => None,
    }
}

/// Get a generator with parameters drawn from `rng`.
pub fn by_name_random(name: &str, rng: &mut dyn RngCore) -> Option<Box<dyn Generator>> {
    match name.to_lowercase().as_str() {
        "koch" | "snowflake" => Some(Box::new(koch::Koch::random(rng))),
        "sierpinski" => Some(Box::new(sierpinski::Sierpinski::random(rng))),
        "tree" => Some(Box::new(tree::FractalTree::random(rng))),
        "ellipses" => Some(Box::new(ellipses::Ellipses::random(rng))),
        "lightning" => Some(Box::new(lightning::Lightning::random(rng))),
        "guides" => Some(Box::new(guides::Guides::default())),
        _ => None,
    }
}

/// Parse a `set_param` value, naming the offending input on failure.
pub(crate) fn parse_value<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("Invalid value '{}': {}", value, e))
}

/// Parse a count. Negative input clamps to zero rather than failing.
pub(crate) fn parse_count(value: &str) -> Result<u32, String> {
    parse_value::<i64>(value).map(clamp_count)
}

/// Serde counterpart of [`parse_count`] for `u32` count fields.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_count)
}

fn clamp_count(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}

/// Parse a boolean flag, accepting the usual spellings.
pub(crate) fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("Invalid value '{}': expected true/false", value)),
    }
}

pub(crate) fn unknown_param(name: &str, generator: &str) -> String {
    format!("Unknown param '{}' for {}", name, generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_by_name() {
        assert!(by_name("koch").is_some());
        assert!(by_name("KOCH").is_some()); // Case insensitive
        assert!(by_name("snowflake").is_some()); // Alias
        assert!(by_name("mandelbrot").is_none());
    }

    #[test]
    fn test_registry_names_match() {
        for &name in GENERATORS {
            let generator = by_name(name).expect("registered generator");
            assert_eq!(generator.name(), name);
            let mut rng = StdRng::seed_from_u64(3);
            assert!(by_name_random(name, &mut rng).is_some());
        }
    }

    #[test]
    fn test_random_params_follow_seed() {
        for &name in GENERATORS {
            let a = by_name_random(name, &mut StdRng::seed_from_u64(17)).unwrap();
            let b = by_name_random(name, &mut StdRng::seed_from_u64(17)).unwrap();
            assert_eq!(a.list_params(), b.list_params(), "{} ignored the seed", name);
        }
    }

    #[test]
    fn test_parse_count_clamps_negative() {
        assert_eq!(parse_count("-3"), Ok(0));
        assert_eq!(parse_count(" 7 "), Ok(7));
        assert_eq!(parse_count("99999999999"), Ok(u32::MAX));
        assert!(parse_count("2.5").is_err());
    }

    #[test]
    fn test_negative_counts_are_accepted() {
        for &name in GENERATORS {
            let mut generator = by_name(name).unwrap();
            for (param, _) in generator.list_params() {
                if matches!(param, "max_depth" | "sides" | "size" | "branches" | "main_bolts" | "side_bolts") {
                    assert!(generator.set_param(param, "-1").is_ok(), "{}.{}", name, param);
                }
            }
        }
    }

    #[test]
    fn test_every_generator_draws_something() {
        let canvas = Canvas::new(400, 300);
        for &name in GENERATORS {
            let generator = by_name(name).unwrap();
            let mut rng = StdRng::seed_from_u64(42);
            let drawing = generator.draw(&canvas, &mut rng);
            assert_eq!((drawing.width, drawing.height), (400, 300));
            assert!(drawing.point_count() > 0, "{} drew nothing", name);
        }
    }

    #[test]
    fn test_set_param_errors() {
        let mut generator = by_name("koch").unwrap();
        assert!(generator.set_param("angle", "45").is_ok());
        assert!(generator.set_param("angle", "wide").is_err());
        assert!(generator.set_param("nonsense", "1").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("Yes"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }
}
