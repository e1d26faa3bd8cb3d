// src/bin/keydb_migrate.rs
//! Database converter for key management tools

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use keydb_migrate::config::{resolve_config_path, ConfigFile, MigrationConfig, RunOptions};
use keydb_migrate::{
    CryptoAgent, Migrator, ProcessAgent, SoftwareAgent, SqliteLegacyReader, SqliteTargetStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keydb-migrate")]
#[command(about = "Database converter for key management tools", long_about = None)]
struct Cli {
    /// Folder containing the plain legacy databases
    input_folder: PathBuf,

    /// Folder to store the converted databases
    output_folder: PathBuf,

    /// Custom configuration file
    #[arg(short, long, value_name = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Use the dongles emulator instead of hardware
    #[arg(short, long)]
    emulator: bool,

    /// Development emulator mode (only with --emulator)
    #[arg(short, long)]
    development: bool,

    /// Sign and encrypt in-process instead of calling the dongles CLI
    #[arg(long)]
    software_agent: bool,

    /// Write a JSON report of the run
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Log every record
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => {
            println!("All databases converted.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[FATAL]: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref())?;
    let file = ConfigFile::load(&config_path)?;
    let config = MigrationConfig::build(
        RunOptions {
            input_folder: cli.input_folder,
            output_folder: cli.output_folder,
            emulator: cli.emulator,
            development: cli.development,
        },
        &file,
    )?;
    info!("Using configuration {}", config_path.display());

    let agent: Box<dyn CryptoAgent> = if cli.software_agent {
        info!("Using in-process software agent");
        Box::new(SoftwareAgent::new())
    } else {
        info!(
            "Using dongles CLI {} ({:?})",
            config.agent.cli_path.display(),
            config.agent.mode
        );
        Box::new(ProcessAgent::new(config.agent.clone()))
    };

    let migrator = Migrator::new(&config, SqliteLegacyReader, SqliteTargetStore, agent);
    let report = migrator.run()?;
    info!(
        "Converted {} database(s), {} record(s)",
        report.databases.len(),
        report.total_records()
    );

    if let Some(path) = cli.report {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
