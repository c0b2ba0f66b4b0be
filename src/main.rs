//! Backtest form - command line entry point
//!
//! This binary provides four subcommands:
//! - template: Print a fresh working copy built from config defaults
//! - edit: Apply list and field edits to a working copy
//! - validate: Check a working copy and report field errors
//! - submit: Validate, store and print the snapshot

use anyhow::Result;
use backtest_form::Config;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "backtest-form")]
#[command(about = "Build, validate and submit backtest configuration forms", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a blank working copy
    Template {
        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Edit a working copy (appends, then sets, then removals)
    Edit {
        /// Working copy to start from (defaults to the template)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Set a field, e.g. "superStrategies.0.strategies.0.type=RSI". Repeatable.
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,

        /// Append a super strategy with one blank strategy. Repeatable.
        #[arg(long, action = clap::ArgAction::Count)]
        add_super_strategy: u8,

        /// Append a blank strategy to the super strategy at this index. Repeatable.
        #[arg(long, value_name = "SUPER")]
        add_strategy: Vec<usize>,

        /// Remove the super strategy at this index. Repeatable.
        #[arg(long, value_name = "INDEX")]
        remove_super_strategy: Vec<usize>,

        /// Remove a strategy, given as "<super>.<index>". Repeatable.
        #[arg(long, value_name = "SUPER.INDEX")]
        remove_strategy: Vec<String>,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a working copy
    Validate {
        /// Working copy JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Print errors as a JSON object keyed by field path
        #[arg(long)]
        json: bool,
    },

    /// Validate and store a working copy, then print the snapshot
    Submit {
        /// Working copy JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Also write the snapshot to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool, command_name: &str, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = log_dir.join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never(log_dir, &log_filename);

    // Console on stderr so stdout carries only command output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Template { .. } => "template",
        Commands::Edit { .. } => "edit",
        Commands::Validate { .. } => "validate",
        Commands::Submit { .. } => "submit",
    };

    setup_logging(cli.verbose, command_name, &cli.log_dir)?;

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {}", path.display());
    }

    match cli.command {
        Commands::Template { output } => commands::template::run(&config, output),

        Commands::Edit {
            input,
            sets,
            add_super_strategy,
            add_strategy,
            remove_super_strategy,
            remove_strategy,
            output,
        } => commands::edit::run(
            &config,
            commands::edit::EditArgs {
                input,
                sets,
                add_super_strategy,
                add_strategy,
                remove_super_strategy,
                remove_strategy,
                output,
            },
        ),

        Commands::Validate { input, json } => commands::validate::run(input, json),

        Commands::Submit { input, output } => commands::submit::run(&config, input, output),
    }
}
