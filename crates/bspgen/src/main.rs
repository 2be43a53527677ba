//! BSP dungeon generator
//!
//! Prints a generated map to stdout. Logs go to stderr.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bsp_core::{DungeonError, GenerationConfig, generate};
use render::{GlyphMode, OutputFormat, Report};

/// Exit status for a configuration the generator rejects
const EXIT_INVALID_CONFIG: u8 = 2;

/// Generate a dungeon by binary space partition
#[derive(Parser, Debug)]
#[command(name = "bspgen")]
#[command(author, version, about = "Generate a room-and-corridor dungeon map", long_about = None)]
struct Args {
    /// Map width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Map height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Smallest room side
    #[arg(long = "min-room-size")]
    min_room_size: Option<i32>,

    /// Depth down to which regions are always split
    #[arg(long = "min-depth")]
    min_depth: Option<u32>,

    /// Probability of splitting a region past the minimum depth
    #[arg(long = "split-chance")]
    split_chance: Option<f64>,

    /// Seed (defaults to the current time)
    #[arg(short = 's', long)]
    seed: Option<u32>,

    /// JSON configuration file; flags above override its fields
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Glyph style for text output (classic, box)
    #[arg(short = 'g', long, default_value_t = GlyphMode::Classic)]
    glyphs: GlyphMode,

    /// Mark partition region borders on empty cells (text) or include them (json)
    #[arg(long)]
    regions: bool,

    /// List connections after the map
    #[arg(long)]
    links: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Configuration file (or defaults) with command-line overrides applied
    fn generation_config(&self) -> Result<GenerationConfig> {
        let mut config: GenerationConfig = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => GenerationConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(size) = self.min_room_size {
            config.min_room_size = size;
        }
        if let Some(depth) = self.min_depth {
            config.min_depth = depth;
        }
        if let Some(chance) = self.split_chance {
            config.split_chance = chance;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.generation_config()?;
    let dungeon = generate(&config)?;
    info!(
        seed = dungeon.seed,
        rooms = dungeon.rooms.len(),
        connections = dungeon.connections.len(),
        "dungeon generated"
    );

    let mut out = String::new();
    match args.format {
        OutputFormat::Text => {
            let glyphs = render::glyph_set(args.glyphs);
            out.push_str(&render::text(&dungeon, glyphs.as_ref(), args.regions));
            out.push_str(&render::summary(&dungeon));
            out.push('\n');
            if args.links {
                out.push_str(&render::links(&dungeon));
            }
        }
        OutputFormat::Json => {
            let report = Report::new(&dungeon, args.regions);
            out = serde_json::to_string_pretty(&report).context("Failed to serialize dungeon")?;
            out.push('\n');
        }
    }

    io::stdout()
        .lock()
        .write_all(out.as_bytes())
        .context("Failed to write map")?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bspgen: {err:#}");
            if err.downcast_ref::<DungeonError>().is_some() {
                ExitCode::from(EXIT_INVALID_CONFIG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
