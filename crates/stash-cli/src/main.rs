//! # stash-cli
//!
//! Fetch a file, store it once per distinct content, and open it again by name.
//!
//! This is the entry point for the `stash` binary. It parses arguments, sets up
//! logging and the panic hook, and dispatches to the command handlers.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use stash_core::error::{StashError, StashResult};
use tracing::{error, info};

mod commands;
mod output;
mod viewer;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Content-addressed file stash
#[derive(Parser)]
#[command(name = "stash", version, about = "Fetch, deduplicate and view files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database holding stored files
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<Utf8PathBuf>,

    /// Read configuration from this file instead of searching for stash.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a URL and store its content
    Fetch {
        url: String,
        /// Store under this name instead of the one derived from the URL
        #[arg(long)]
        name: Option<String>,
        /// Open the file once it is stored
        #[arg(long)]
        open: bool,
    },
    /// Write a stored file to disk and open it
    Open {
        filename: String,
        /// Only write the file
        #[arg(long)]
        no_launch: bool,
    },
    /// List stored files
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting stash v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run_cli(cli) {
        error!("{}", err);
        eprintln!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> StashResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| StashError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async move {
        let ctx = CommandContext::new(cli.config.as_deref(), cli.database).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let directives = ["stash", "stash_core", "stash_store", "stash_fetch", "stash_config"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    // stdout is reserved for command output such as `list --json`
    tracing_subscriber::fmt()
        .with_env_filter(directives)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("stash encountered an unexpected error: {}", panic_info);
        eprintln!("stash crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/stash-rs/stash/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
