//! # Geomancy CLI
//!
//! Command-line host for the geometry generators.
//!
//! ## Usage
//!
//! ```bash
//! # List available generators and their parameters
//! geomancy list
//!
//! # Dump a Koch snowflake as JSON on stdout
//! geomancy draw koch
//!
//! # Render a seeded tree to PNG
//! geomancy draw tree --seed 42 --set branches=3 --png tree.png
//!
//! # Load parameters from a JSON file, write both outputs
//! geomancy draw lightning --config storm.json --png bolt.png --json bolt.json
//!
//! # Randomized parameters
//! geomancy draw ellipses --random --png nest.png
//! ```

use clap::{Parser, Subcommand};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use geomancy::{
    Canvas, Color, GeomancyError,
    fractal::{self, GENERATORS, Generator},
    render,
};

/// Geomancy - procedural vector geometry
#[derive(Parser, Debug)]
#[command(name = "geomancy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List generators and their default parameters
    List,

    /// Run a generator
    Draw {
        /// Generator name (see `geomancy list`)
        name: String,

        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Random seed (a fresh one is picked and printed when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Override a parameter, e.g. --set angle=45 (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Load all parameters from a JSON file (applied before --set)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Start from randomized parameters
        #[arg(long)]
        random: bool,

        /// Render to a PNG file
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Write the drawing as JSON to a file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// PNG background color
        #[arg(long, default_value = "#ffffff")]
        background: String,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GeomancyError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("Available generators:");
            for &name in GENERATORS {
                if let Some(generator) = fractal::by_name(name) {
                    println!("  {}", name);
                    for (param, value) in generator.list_params() {
                        println!("    {:<16} {}", param, value);
                    }
                }
            }
        }
        Commands::Draw {
            name,
            width,
            height,
            seed,
            set,
            config,
            random,
            png,
            json,
            background,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut generator = lookup(&name, random.then_some(&mut rng))?;

            if let Some(path) = config {
                let text = std::fs::read_to_string(&path)?;
                generator.load_config(&text)?;
                info!("loaded parameters from {}", path.display());
            }

            for assignment in &set {
                apply_assignment(generator.as_mut(), assignment)?;
            }

            let to_stdout = png.is_none() && json.is_none();
            let canvas = Canvas::new(width, height);

            if !to_stdout {
                println!(
                    "Generating {} ({}x{}, seed {}): {}",
                    generator.name(),
                    width,
                    height,
                    seed,
                    generator.params_description()
                );
            }

            let drawing = generator.draw(&canvas, &mut rng);
            info!(
                "{}: {} strokes, {} points",
                generator.name(),
                drawing.strokes.len(),
                drawing.point_count()
            );
            if let Some((lo, hi)) = drawing.bounding_box() {
                info!("bounds {} to {}", lo, hi);
            }

            if to_stdout {
                println!("{}", serde_json::to_string_pretty(&drawing)?);
                return Ok(());
            }

            if let Some(path) = json {
                std::fs::write(&path, serde_json::to_string_pretty(&drawing)?)?;
                println!("Saved to {}", path.display());
            }

            if let Some(path) = png {
                let background = Color::from_hex(&background)?;
                render::save_png(&render::rasterize(&drawing, &background), &path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Find a generator, drawing its parameters from `rng` when one is given.
fn lookup(name: &str, rng: Option<&mut StdRng>) -> Result<Box<dyn Generator>, GeomancyError> {
    let found = match rng {
        Some(rng) => fractal::by_name_random(name, rng),
        None => fractal::by_name(name),
    };
    found.ok_or_else(|| {
        GeomancyError::UnknownGenerator(format!(
            "'{}'. Run `geomancy list` to see available generators.",
            name
        ))
    })
}

/// Apply one `key=value` override.
fn apply_assignment(generator: &mut dyn Generator, assignment: &str) -> Result<(), GeomancyError> {
    let (key, value) = assignment.split_once('=').ok_or_else(|| {
        GeomancyError::InvalidParam(format!("expected KEY=VALUE, got '{}'", assignment))
    })?;
    generator
        .set_param(key.trim(), value)
        .map_err(GeomancyError::InvalidParam)
}
