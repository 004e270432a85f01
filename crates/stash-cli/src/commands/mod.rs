//! Command implementations and dispatch logic.
//!
//! Each command is an async function that takes a `CommandContext`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use camino::{Utf8Path, Utf8PathBuf};
use stash_config::{ConfigLoader, StashToml};
use stash_core::error::{StashError, StashResult};
use stash_fetch::{FetchConfig, HttpFetcher, RetryConfig};
use stash_store::ContentStore;
use tracing::{debug, info};

pub mod fetch;
pub mod open;
pub mod list;


use crate::Commands;
use crate::output::OutputHandler;
use crate::viewer::{Launcher, SystemLauncher};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub config: StashToml,
    pub launcher: Arc<dyn Launcher>,
}

impl CommandContext {
    /// Create a command context from the working directory and global flags
    pub async fn new(config_path: Option<&Utf8Path>, database: Option<Utf8PathBuf>) -> StashResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| StashError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| StashError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("working directory is not valid UTF-8: {}", e),
        })?;

        let mut cli_overrides = HashMap::new();
        if let Some(database) = database {
            cli_overrides.insert("database".to_string(), database.into_string());
        }

        let (config, sources) = ConfigLoader::new(cwd.clone())
            .load(config_path, cli_overrides)
            .await?;
        debug!("Configuration sources: {:?}", sources);

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            config,
            launcher: Arc::new(SystemLauncher),
        })
    }

    /// Database location, relative paths taken from the working directory
    pub fn database_path(&self) -> PathBuf {
        self.cwd.join(&self.config.store.database).into_std_path_buf()
    }

    /// Directory retrieved files are written into
    pub fn output_dir(&self) -> PathBuf {
        self.cwd.join(&self.config.viewer.output_dir).into_std_path_buf()
    }

    pub fn open_store(&self) -> StashResult<ContentStore> {
        let timeout = Duration::from_millis(self.config.store.busy_timeout_ms);
        ContentStore::open_with_timeout(self.database_path(), timeout)
    }

    pub fn fetcher(&self) -> StashResult<HttpFetcher> {
        HttpFetcher::with_config(FetchConfig {
            timeout: Duration::from_secs(self.config.fetch.timeout_secs),
            user_agent: self.config.fetch.user_agent.clone(),
            retry: RetryConfig {
                max_retries: self.config.fetch.max_retries,
                ..RetryConfig::default()
            },
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> StashResult<()> {
    match command {
        Commands::Fetch { url, name, open } => {
            info!("Fetching {} (open: {})", url, open);
            fetch::execute(url, name, open, ctx).await
        }
        Commands::Open { filename, no_launch } => {
            info!("Opening {} (launch: {})", filename, !no_launch);
            open::execute(filename, no_launch, ctx).await
        }
        Commands::List { json } => list::execute(json, ctx).await,
        Commands::Version => show_version(ctx).await,
    }
}

async fn show_version(ctx: &CommandContext) -> StashResult<()> {
    ctx.output.info(&format!("stash v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.info(&format!("Target: {}", env!("STASH_TARGET")));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));
    ctx.output.info(&format!("Database: {}", ctx.database_path().display()));

    Ok(())
}
