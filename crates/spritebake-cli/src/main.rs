//! spritebake CLI - camera framing and spritesheet packing for animated 3D assets
//!
//! This binary exposes the host-independent parts of the export pipeline:
//! previewing camera placement, sizing sheet grids, packing rendered frame
//! sequences, checking model files and validating export configurations.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use spritebake_cli::commands;
use spritebake_cli::commands::frame::FrameOptions;
use spritebake_cli::commands::pack::PackOptions;

/// spritebake - Fixed-camera sprite export
#[derive(Parser)]
#[command(name = "spritebake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the camera placement for a bounding box
    Frame {
        /// Minimum bound corner as x,y,z
        #[arg(long, allow_hyphen_values = true)]
        min: String,

        /// Maximum bound corner as x,y,z
        #[arg(long, allow_hyphen_values = true)]
        max: String,

        /// Export configuration file (JSON) used as the base settings
        #[arg(short, long)]
        config: Option<String>,

        /// Angle preset
        #[arg(short, long, value_parser = ["front", "isometric", "side", "custom"])]
        angle: Option<String>,

        /// Orbit orientation for the custom preset
        #[arg(long, value_parser = ["side", "up", "down"])]
        orientation: Option<String>,

        /// Orbit angle in degrees for the custom preset (-180..=180)
        #[arg(long, allow_hyphen_values = true)]
        degrees: Option<i32>,

        /// Padding percent (1..=100)
        #[arg(short, long)]
        padding: Option<f64>,

        /// Disable padding
        #[arg(long, conflicts_with = "padding")]
        no_padding: bool,

        /// Do not mirror the camera through the object center
        #[arg(long)]
        no_flip: bool,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the spritesheet grid for a number of frames
    Grid {
        /// Number of frames
        #[arg(short, long)]
        frames: u32,

        /// Frame size in pixels (64, 128, 256, 512, 1024 or 2048)
        #[arg(short, long, default_value_t = 512)]
        cell_size: u32,

        /// Manual grid columns (1..=20)
        #[arg(long)]
        columns: Option<u32>,

        /// Manual grid rows (1..=20)
        #[arg(long)]
        rows: Option<u32>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Pack a rendered frame sequence into a spritesheet
    Pack {
        /// Directory containing {base}_frame_NNNN files
        #[arg(short, long)]
        dir: String,

        /// Base name of the sequence (detected when the directory holds one)
        #[arg(short, long)]
        base: Option<String>,

        /// Output directory (default: the frame directory)
        #[arg(short, long)]
        out: Option<String>,

        /// Export configuration file (JSON) used as the base settings
        #[arg(short, long)]
        config: Option<String>,

        /// Image format of the frames and the sheet
        #[arg(short, long, value_parser = ["png", "webp"])]
        format: Option<String>,

        /// Manual grid columns (1..=20)
        #[arg(long)]
        columns: Option<u32>,

        /// Manual grid rows (1..=20)
        #[arg(long)]
        rows: Option<u32>,

        /// Vertical placement of the first row
        #[arg(long, value_parser = ["top_down", "bottom_up"])]
        origin: Option<String>,

        /// Also write the JSON metadata sidecar
        #[arg(long)]
        metadata: bool,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a model file's format and normalized import scale
    Model {
        /// Path to the model file (.fbx, .glb or .gltf)
        path: String,

        /// Scale stored in the file as x,y,z
        #[arg(short, long)]
        scale: Option<String>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an export configuration file
    Validate {
        /// Path to the configuration file (JSON)
        #[arg(short, long)]
        config: String,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Frame {
            min,
            max,
            config,
            angle,
            orientation,
            degrees,
            padding,
            no_padding,
            no_flip,
            json,
        } => commands::frame::run(&FrameOptions {
            min,
            max,
            config,
            angle,
            orientation,
            degrees,
            padding,
            no_padding,
            no_flip,
            json,
        }),
        Commands::Grid {
            frames,
            cell_size,
            columns,
            rows,
            json,
        } => commands::grid::run(frames, cell_size, columns, rows, json),
        Commands::Pack {
            dir,
            base,
            out,
            config,
            format,
            columns,
            rows,
            origin,
            metadata,
            json,
        } => commands::pack::run(&PackOptions {
            dir,
            base,
            out,
            config,
            format,
            columns,
            rows,
            origin,
            metadata,
            json,
        }),
        Commands::Model { path, scale, json } => {
            commands::model::run(&path, scale.as_deref(), json)
        }
        Commands::Validate { config, json } => commands::validate::run(&config, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
