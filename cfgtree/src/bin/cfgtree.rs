//! Command-line entrypoint: merge configuration files and print the result.

use std::io::{self, Write};

use camino::Utf8Path;
use cfgtree::{ConfigArgs, ConfigError, InitFactory};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parsed arguments for the `cfgtree` tool.
#[derive(Debug, Parser)]
#[command(name = "cfgtree")]
#[command(about = "Merge configuration documents, expand their macros and print the result")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    /// Path to print instead of the whole tree (repeat for several).
    #[arg(long = "get", value_name = "PATH")]
    get: Vec<String>,
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    run(&Cli::parse())
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let config = InitFactory::from_parsed(&cli.config).create()?;
    let mut out = io::stdout().lock();
    if cli.get.is_empty() {
        serde_json::to_string_pretty(&config.to_json())
            .map_err(ConfigError::from)
            .and_then(|text| writeln!(out, "{text}").map_err(stdout_error))
    } else {
        cli.get.iter().try_for_each(|path| {
            config
                .get_all::<String>(path.as_str())?
                .iter()
                .try_for_each(|value| writeln!(out, "{value}").map_err(stdout_error))
        })
    }
}

fn stdout_error(err: io::Error) -> ConfigError {
    ConfigError::io(Utf8Path::new("<stdout>"), err)
}
