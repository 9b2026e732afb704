//! Airindex CLI - command-line interface for AQI prediction

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Logs go to stderr; stdout carries only the requested output

mod server;

use airindex_core::band::{render_bands_text, render_overview_text};
use airindex_core::pollutant::render_info_text;
use airindex_core::{config, predict, render_json, render_meter, render_text};
use airindex_core::{Pollutant, PollutantReadings};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "airindex")]
#[command(version)]
#[command(about = "Air Quality Index prediction from pollutant readings")]
struct Cli {
    /// Path to a JSON config file (default: discover in working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the AQI for a set of pollutant readings
    Predict {
        /// Particulate matter PM2.5 in μg/m³ (unset = 0)
        #[arg(long, allow_negative_numbers = true)]
        pm25: Option<f64>,

        /// Nitrogen dioxide in ppb (unset = 0)
        #[arg(long, allow_negative_numbers = true)]
        no2: Option<f64>,

        /// Ozone in ppb (unset = 0)
        #[arg(long, allow_negative_numbers = true)]
        o3: Option<f64>,

        /// Carbon monoxide in ppm (unset = 0)
        #[arg(long, allow_negative_numbers = true)]
        co: Option<f64>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the AQI levels and their health implications
    Bands {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show reference information for the pollutants
    Pollutants {
        /// Only show this pollutant (pm25, no2, o3, co)
        pollutant: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Run the HTTP prediction service
    Serve {
        /// Bind host (default: config or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (default: config or 8000)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let working_dir = std::env::current_dir()?;
    let resolved = config::load_and_resolve(&working_dir, cli.config.as_deref())?;
    if let Some(path) = &resolved.config_path {
        tracing::debug!(path = %path.display(), "using config");
    }

    match cli.command {
        Commands::Predict { pm25, no2, o3, co, format } => {
            let readings = PollutantReadings::from_optional(pm25, no2, o3, co);
            let prediction = predict(readings, &resolved.bands);

            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&prediction, &resolved.bands));
                }
                OutputFormat::Json => {
                    println!("{}", render_json(&prediction));
                }
            }
        }
        Commands::Bands { format } => match format {
            OutputFormat::Text => {
                println!("{}", render_overview_text());
                println!("AQI Levels and Health Implications\n");
                print!("{}", render_meter(&resolved.bands, None));
                println!();
                print!("{}", render_bands_text(&resolved.bands));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&resolved.bands)?);
            }
        },
        Commands::Pollutants { pollutant, format } => {
            let selected: Vec<Pollutant> = match pollutant {
                Some(key) => vec![key.parse()?],
                None => Pollutant::ALL.to_vec(),
            };

            match format {
                OutputFormat::Text => {
                    let sections: Vec<String> =
                        selected.into_iter().map(render_info_text).collect();
                    print!("{}", sections.join("\n"));
                }
                OutputFormat::Json => {
                    let infos: Vec<_> = selected.iter().map(|p| p.info()).collect();
                    println!("{}", serde_json::to_string_pretty(&infos)?);
                }
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(resolved.host);
            let port = port.unwrap_or(resolved.port);
            let addr = resolve_addr(&host, port)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(server::serve(addr, resolved.bands))?;
        }
    }

    Ok(())
}

/// Set up stderr logging; RUST_LOG takes precedence over -v
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve host and port to the first matching socket address
fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("invalid bind address: {}:{}", host, port))?
        .next()
        .ok_or_else(|| anyhow::anyhow!("no address found for {}:{}", host, port))
}
