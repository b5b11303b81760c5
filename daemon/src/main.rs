//! Bill daemon: entry point for replaying settlement scripts and quoting prices.

mod quote;
mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bill_engine::EngineConfig;
use bill_utils::LogFormat;

use crate::quote::Quote;
use crate::script::{Outcome, Script};

#[derive(Parser)]
#[command(name = "bill-daemon", about = "Bill settlement engine runner")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the configuration file.
    #[arg(long, env = "BILL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the configuration file.
    #[arg(long, env = "BILL_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON transaction script and print every receipt.
    Run {
        /// Path to the script.
        #[arg(long)]
        script: PathBuf,

        /// Print one JSON line per transaction instead of a pretty document.
        #[arg(long)]
        compact: bool,
    },
    /// Price calculators.
    Quote {
        #[command(subcommand)]
        quote: Quote,
    },
    /// Print the effective configuration.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    bill_utils::init_tracing(&config.log_level, format);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Run { script: path, compact } => {
            let parsed = Script::from_file(&path)?;
            let count = parsed.txs.len();
            let outcomes = script::replay(parsed, config)?;
            if compact {
                for outcome in &outcomes {
                    println!("{}", serde_json::to_string(outcome)?);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            }
            let rejected = outcomes
                .iter()
                .filter(|o| matches!(o.result, Outcome::Err { .. }))
                .count();
            tracing::info!(count, rejected, "replay finished");
        }
        Command::Quote { quote: request } => {
            println!("{}", quote::evaluate(request)?);
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
