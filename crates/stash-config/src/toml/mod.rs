//! stash.toml configuration parsing and serialization

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use stash_core::error::StashError;
use crate::ConfigResult;

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "files.db";

/// Complete stash.toml configuration
///
/// Every section and key is optional; missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StashToml {
    /// Where records are persisted
    pub store: StoreSection,

    /// Download behaviour
    pub fetch: FetchSection,

    /// Where retrieved files are written and whether they are opened
    pub viewer: ViewerSection,
}

/// Storage section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StoreSection {
    /// SQLite database path
    pub database: Utf8PathBuf,

    /// How long to wait on a database locked by another process
    pub busy_timeout_ms: u64,
}

/// Fetch section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchSection {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after a server or transport error
    pub max_retries: u32,

    /// User-Agent header
    pub user_agent: String,
}

/// Viewer section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewerSection {
    /// Directory retrieved files are written into
    pub output_dir: Utf8PathBuf,

    /// Hand the written file to the host's default application
    pub launch: bool,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            database: Utf8PathBuf::from(DEFAULT_DATABASE),
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            user_agent: format!("stash/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from("."),
            launch: true,
        }
    }
}

/// Parse TOML string to StashToml configuration
pub fn parse_stash_toml(content: &str) -> ConfigResult<StashToml> {
    let config: StashToml = toml::from_str(content)
        .map_err(|e| StashError::TomlParse { message: e.to_string() })?;

    validate_config(&config)?;

    Ok(config)
}

/// Deserialize an already-merged table
pub fn from_table(table: toml::Table) -> ConfigResult<StashToml> {
    let config: StashToml = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| StashError::TomlParse { message: e.to_string() })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize StashToml to TOML string
pub fn serialize_stash_toml(config: &StashToml) -> ConfigResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| StashError::TomlParse { message: format!("TOML serialization error: {}", e) })
}

/// Validate configuration values
pub fn validate_config(config: &StashToml) -> ConfigResult<()> {
    if config.store.database.as_str().trim().is_empty() {
        return Err(StashError::ConfigValidation {
            field: "store.database".to_string(),
            reason: "database path must not be empty".to_string(),
        });
    }

    if config.fetch.timeout_secs == 0 {
        return Err(StashError::ConfigValidation {
            field: "fetch.timeout-secs".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }

    if config.fetch.user_agent.trim().is_empty() {
        return Err(StashError::ConfigValidation {
            field: "fetch.user-agent".to_string(),
            reason: "user agent must not be empty".to_string(),
        });
    }

    if config.viewer.output_dir.as_str().is_empty() {
        return Err(StashError::ConfigValidation {
            field: "viewer.output-dir".to_string(),
            reason: "output directory must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Read a stash.toml file as a raw table, for layering
pub async fn load_table_from_file(path: &Utf8Path) -> ConfigResult<toml::Table> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| StashError::io(format!("Failed to read {}", path), e))?;

    content.parse::<toml::Table>()
        .map_err(|e| StashError::TomlParse { message: format!("In file {}: {}", path, e) })
}

/// Load and parse stash.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<StashToml> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| StashError::io(format!("Failed to read {}", path), e))?;

    parse_stash_toml(&content)
        .map_err(|e| match e {
            StashError::TomlParse { message } => StashError::TomlParse {
                message: format!("In file {}: {}", path, message),
            },
            StashError::ConfigValidation { field, reason } => StashError::ConfigValidation {
                field,
                reason: format!("{} (in {})", reason, path),
            },
            other => other,
        })
}
