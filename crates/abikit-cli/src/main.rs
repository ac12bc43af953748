//! # abikit
//!
//! Command-line interface for the abikit ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect a type signature
//! abikit parse "fixed128x128[][2]"
//!
//! # Encode arguments
//! abikit encode --types uint256,bytes --values '[5, "0x0102"]'
//!
//! # Decode call data
//! abikit decode --types uint256,bytes --data 0x0000...
//!
//! # Configuration
//! abikit config --show
//! abikit config --set-hex-prefix false
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod values;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Ethereum ABI encoder and decoder
#[derive(Parser, Debug)]
#[command(name = "abikit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log filter, overriding RUST_LOG and the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Config file path (default: ~/.abikit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a type signature and show its layout
    Parse {
        /// Type signature, e.g. uint256 or bytes32[3]
        signature: String,
    },
    /// Encode values as ABI data
    Encode {
        /// Comma-separated type signatures
        #[arg(long)]
        types: String,
        /// JSON array of values, one per type
        #[arg(long)]
        values: String,
    },
    /// Decode ABI data
    Decode {
        /// Comma-separated type signatures
        #[arg(long)]
        types: String,
        /// Hex-encoded data, 0x prefix optional
        #[arg(long)]
        data: String,
    },
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set whether hex output is 0x-prefixed
        #[arg(long)]
        set_hex_prefix: Option<bool>,
        /// Set the default log filter
        #[arg(long)]
        set_log_level: Option<String>,
        /// Set whether JSON output is the default
        #[arg(long)]
        set_json: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();
    let mut json = cli.json;

    if let Err(e) = run(cli, &mut json) {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, json: &mut bool) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(_) => Config::default(),
        None => Config::load(),
    };
    *json = cli.json || config.json;

    init_tracing(cli.log_level.as_deref(), &config.log_level);

    match cli.command {
        Commands::Parse { signature } => commands::parse::execute(&signature, *json),
        Commands::Encode { types, values } => {
            commands::encode::execute(&types, &values, &config, *json)
        }
        Commands::Decode { types, data } => {
            commands::decode::execute(&types, &data, &config, *json)
        }
        Commands::Config {
            show,
            set_hex_prefix,
            set_log_level,
            set_json,
        } => handle_config(
            &mut config,
            cli.config.as_deref(),
            show,
            set_hex_prefix,
            set_log_level,
            set_json,
            *json,
        ),
    }
}

/// Level precedence: `--log-level`, then `RUST_LOG`, then the config file
fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    set_hex_prefix: Option<bool>,
    set_log_level: Option<String>,
    set_json: Option<bool>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(prefix) = set_hex_prefix {
        config.hex_prefix = prefix;
        modified = true;
    }

    if let Some(level) = set_log_level {
        EnvFilter::try_new(&level)
            .map_err(|e| CliError::Config(format!("Invalid log level {}: {}", level, e)))?;
        config.log_level = level;
        modified = true;
    }

    if let Some(json_default) = set_json {
        config.json = json_default;
        modified = true;
    }

    if modified {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        tracing::info!("Configuration saved");
        Output::new(json)
            .field("status", "saved")
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field_bool("hex_prefix", config.hex_prefix)
            .field("log_level", &config.log_level)
            .field_bool("json", config.json)
            .message(&format!(
                "Hex prefix: {}\nLog level:  {}\nJSON:       {}",
                config.hex_prefix, config.log_level, config.json
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-hex-prefix/--set-log-level/--set-json to modify")
            .print();
    }

    Ok(())
}
