use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use ballot_registry::{AuditLogSink, Ballot, FanoutSink, RecordingSink, SingleAdministrator};
use ballot_shared_types::Principal;

mod commands;
mod config;
mod store;

use commands::Command;
use config::NodeConfig;

/// Single-administrator voting registry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the per-user location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ballot state file, overrides the configured one
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Administrator principal, overrides the configured one
    #[arg(long, global = true)]
    administrator: Option<Principal>,

    /// Principal issuing the command (defaults to the administrator)
    #[arg(long, global = true)]
    caller: Option<Principal>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Stdout carries command output; logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> (NodeConfig, Option<confy::ConfyError>) {
    let (mut cfg, load_error) = match config::load(args.config.as_deref()) {
        Ok(cfg) => (cfg, None),
        Err(e) => (NodeConfig::default(), Some(e)),
    };

    if let Some(state_file) = &args.state_file {
        cfg.state_file = state_file.clone();
    }
    if let Some(administrator) = args.administrator {
        cfg.administrator = administrator;
    }
    if let Some(log_level) = &args.log_level {
        cfg.log_level = log_level.clone();
    }
    (cfg, load_error)
}

fn run(args: Args, cfg: NodeConfig) -> Result<()> {
    if args.command == Command::ConfigPath {
        let path = config::config_file_path(args.config.as_deref())?;
        println!("{}", path.display());
        return Ok(());
    }

    let snapshot = store::load_snapshot(&cfg.state_file)?;
    debug!("Loaded ballot state from {:?}", cfg.state_file);

    let recorder = RecordingSink::new();
    let ballot = Ballot::restore(
        snapshot,
        cfg.ballot.clone(),
        SingleAdministrator(cfg.administrator),
        FanoutSink::new(AuditLogSink, recorder.clone()),
    )
    .with_context(|| format!("ballot state in {:?} is invalid", cfg.state_file))?;

    let caller = args.caller.unwrap_or(cfg.administrator);
    let output = commands::execute(&ballot, &caller, &args.command)?;
    println!("{}", output);

    for event in recorder.events() {
        println!("event: {}", event);
    }

    if args.command.is_mutating() {
        store::save_snapshot(&cfg.state_file, &ballot.snapshot())?;
        info!("Saved ballot state to {:?}", cfg.state_file);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let (cfg, load_error) = load_config(&args);
    init_tracing(&cfg.log_level);
    if let Some(e) = load_error {
        error!("Failed to load configuration: {}. Using default.", e);
    }

    if let Err(e) = run(args, cfg) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
