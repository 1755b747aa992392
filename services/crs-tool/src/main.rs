//! Command-line front end for the operation registry.
//!
//! Lists the registered operations, describes their parameters and runs a
//! transform over coordinates given as arguments or read from stdin.

mod commands;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crs_common::Authority;
use operation::{OperationRegistry, RegistryConfig};

#[derive(Parser, Debug)]
#[command(name = "crs-tool")]
#[command(about = "Coordinate operation registry tool")]
struct Args {
    /// YAML configuration file (environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every registered operation
    List {
        /// Show names and codes from this authority (EPSG, OGC, ESRI, GeoTIFF, PROJ4)
        #[arg(short, long)]
        authority: Option<String>,
    },

    /// Describe the parameters of one operation
    Describe {
        /// Operation name, alias or AUTHORITY:CODE
        operation: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Transform coordinates with one operation
    Transform {
        /// Operation name, alias or AUTHORITY:CODE
        operation: String,

        /// Parameter value, as name=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Apply the inverse transform
        #[arg(long)]
        inverse: bool,

        /// Comma-separated coordinate tuples; stdin is read when none are given
        coords: Vec<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_format)?;

    let config = load_config(args.config.as_ref())?;
    debug!(
        grid_directories = ?config.grid_directories,
        grid_cache_entries = config.grid_cache_entries,
        include_deprecated = config.include_deprecated,
        "Loaded configuration"
    );

    let registry = OperationRegistry::new(config).context("Failed to build operation registry")?;
    info!(operations = registry.len(), "Operation registry ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::List { authority } => {
            let authority = authority
                .map(|a| a.parse::<Authority>())
                .transpose()
                .context("Invalid --authority")?;
            commands::list(&registry, authority, &mut out)?;
        }
        Command::Describe { operation, json } => {
            commands::describe(&registry, &operation, json, &mut out)?;
        }
        Command::Transform {
            operation,
            params,
            inverse,
            coords,
        } => {
            let transform = commands::build_transform(&registry, &operation, &params, inverse)?;
            if coords.is_empty() {
                let stdin = io::stdin();
                let lines = stdin.lock().lines();
                commands::transform_lines(transform.as_ref(), lines, &mut out)?;
            } else {
                let lines = coords.into_iter().map(Ok);
                commands::transform_lines(transform.as_ref(), lines, &mut out)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout carries results, so logs go to stderr
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<RegistryConfig> {
    let config = match path {
        Some(path) => RegistryConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .merge_env(),
        None => RegistryConfig::from_env(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
