use std::path::PathBuf;

use actuator_core::{DispatcherBuilder, DispatcherConfig, Params};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

mod demo;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "actuator", about = "Discover and run actions by name")]
struct Cli {
    /// JSON config file (defaults to $ACTUATOR_CONFIG_PATH).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra root to scan for actions; may be repeated.
    #[arg(long = "root", global = true)]
    roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print registered action names.
    List,
    /// Execute an action and print `{ value, status }` as JSON.
    Run {
        name: String,
        /// Keyword parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DispatcherConfig::load(path)?,
        None => DispatcherConfig::load_default()?,
    };
    config.import_paths.extend(cli.roots);

    let dispatcher = DispatcherBuilder::new()
        .config(config)
        .loader(demo::catalog())
        .build()?;
    let builtins = dispatcher.register_actions(&demo::Builtins, false);
    info!(builtins, "registered builtin actions");

    match cli.command {
        Command::List => {
            for name in dispatcher.registered_actions() {
                println!("{name}");
            }
        }
        Command::Run { name, params } => {
            let params = parse_params(&params)?;
            let result = dispatcher
                .execute(&name, params)
                .await
                .with_context(|| format!("action `{name}` failed upstream"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn parse_params(raw: &str) -> Result<Params> {
    let value: Value = serde_json::from_str(raw).context("--params is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("--params must be a JSON object, got {other}"),
    }
}
