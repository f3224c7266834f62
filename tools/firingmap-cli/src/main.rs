//! FiringMap CLI: render and inspect firing-event density maps.
//!
//! Usage:
//!   firingmap render <INPUT>    Render a density image to PNG
//!   firingmap nearest <INPUT>   Find the event nearest a window pixel
//!   firingmap info <INPUT>      Show event set information
//!   firingmap watch <INPUT>     Re-render whenever the input changes

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use firingmap_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "firingmap",
    about = "Smoothed density heat-maps of firing events",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a density image
    Render {
        /// Event file (.json, or a firings text table)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image width (defaults to the configured export width)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (defaults to the configured export height)
        #[arg(long)]
        height: Option<u32>,

        /// Gaussian smoothing width, in pixels
        #[arg(long)]
        tau: Option<f64>,
    },

    /// Find the event nearest to a window pixel
    Nearest {
        /// Event file (.json, or a firings text table)
        input: PathBuf,

        /// Window x coordinate
        #[arg(long)]
        x: f64,

        /// Window y coordinate
        #[arg(long)]
        y: f64,

        /// Window width
        #[arg(long, default_value = "800")]
        width: f64,

        /// Window height
        #[arg(long, default_value = "600")]
        height: f64,

        /// Grid columns (defaults to the configured grid width)
        #[arg(long)]
        grid_width: Option<u32>,
    },

    /// Show event set information
    Info {
        /// Event file (.json, or a firings text table)
        input: PathBuf,

        /// Epochs JSON file to lay out against the event extent
        #[arg(long)]
        epochs: Option<PathBuf>,

        /// Window width used for epoch layout
        #[arg(long, default_value = "800")]
        width: f64,

        /// Window height used for epoch layout
        #[arg(long, default_value = "600")]
        height: f64,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch an event file and re-render after changes settle
    Watch {
        /// Event file (.json, or a firings text table)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Debounce delay in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    firingmap_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Render {
            input,
            output,
            width,
            height,
            tau,
        } => {
            if let Some(tau) = tau {
                config.render.kernel_tau = tau;
            }
            commands::render::run(input, output, width, height, &config)
        }
        Commands::Nearest {
            input,
            x,
            y,
            width,
            height,
            grid_width,
        } => {
            if let Some(grid_width) = grid_width {
                config.render.grid_width = grid_width;
            }
            commands::nearest::run(input, x, y, width, height, &config)
        }
        Commands::Info {
            input,
            epochs,
            width,
            height,
            json,
        } => commands::info::run(input, epochs, width, height, json, &config),
        Commands::Watch {
            input,
            output,
            debounce_ms,
        } => {
            if let Some(ms) = debounce_ms {
                config.render.debounce_ms = ms;
            }
            commands::watch::run(input, output, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_width_is_a_nearest_flag_only() {
        let args = [
            "firingmap",
            "nearest",
            "e.json",
            "--x",
            "1",
            "--y",
            "2",
            "--grid-width",
            "64",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Nearest {
                grid_width: Some(64),
                ..
            }
        ));

        let args = ["firingmap", "render", "e.json", "--grid-width", "64"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_render_size_flags_are_optional() {
        let cli = Cli::try_parse_from(["firingmap", "render", "e.json", "--tau", "2.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render {
                width: None,
                height: None,
                tau: Some(t),
                ..
            } if t == 2.5
        ));
    }
}
