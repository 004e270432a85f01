//! Configuration layering, fallback logic, and environment overrides
//!
//! Precedence, lowest first: built-in defaults, the global
//! `~/.stash/config.toml`, the project `stash.toml`, `STASH_*` environment
//! variables, command-line flags.

use std::collections::HashMap;
use std::str::FromStr;
use camino::{Utf8Path, Utf8PathBuf};
use stash_core::error::StashError;
use tracing::debug;
use crate::ConfigResult;
use crate::toml::{from_table, load_table_from_file, validate_config, StashToml};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "stash.toml";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Global config location, if a home directory is known
    global_path: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project stash.toml found by walking up from the working directory
    Project(Utf8PathBuf),
    /// File named with --config
    Explicit(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_path = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::try_from(home).ok())
            .map(|home| home.join(".stash").join("config.toml"));

        Self { cwd, global_path }
    }

    /// Override where the global config is looked up
    pub fn with_global_path(mut self, global_path: Option<Utf8PathBuf>) -> Self {
        self.global_path = global_path;
        self
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find stash.toml in the working directory or one of its parents
    pub fn find_project_config(&self) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load every layer and merge them
    ///
    /// `explicit` replaces the project lookup and must exist.
    pub async fn load(
        &self,
        explicit: Option<&Utf8Path>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(StashToml, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Default];

        let global = match &self.global_path {
            Some(path) if path.is_file() => {
                sources.push(ConfigSource::Global(path.clone()));
                Some(load_table_from_file(path).await?)
            }
            _ => None,
        };

        let project = match explicit {
            Some(path) => {
                sources.push(ConfigSource::Explicit(path.to_path_buf()));
                Some(load_table_from_file(path).await?)
            }
            None => match self.find_project_config() {
                Some(path) => {
                    let table = load_table_from_file(&path).await?;
                    sources.push(ConfigSource::Project(path));
                    Some(table)
                }
                None => None,
            },
        };

        let env_overrides = ConfigLayering::collect_env_overrides();
        sources.extend(env_overrides.keys().cloned().map(ConfigSource::Environment));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let config = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;
        debug!("Loaded configuration from {:?}", sources);

        Ok((config, sources))
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers
    pub fn merge_configs(
        global_config: Option<toml::Table>,
        project_config: Option<toml::Table>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<StashToml> {
        let mut merged = global_config.unwrap_or_default();
        if let Some(project) = project_config {
            Self::merge_tables(&mut merged, project);
        }

        let mut config = from_table(merged)?;

        Self::apply_env_overrides(&mut config, &env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut config, &cli_overrides)?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Recursively overlay `overlay` onto `base`
    fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
        for (key, value) in overlay {
            match (base.get_mut(&key), value) {
                (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                    Self::merge_tables(existing, incoming);
                }
                (_, value) => {
                    base.insert(key, value);
                }
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut StashToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "STASH_DATABASE" => {
                    config.store.database = Utf8PathBuf::from(value);
                }
                "STASH_BUSY_TIMEOUT_MS" => {
                    config.store.busy_timeout_ms = parse_value(key, value)?;
                }
                "STASH_FETCH_TIMEOUT_SECS" => {
                    config.fetch.timeout_secs = parse_value(key, value)?;
                }
                "STASH_FETCH_MAX_RETRIES" => {
                    config.fetch.max_retries = parse_value(key, value)?;
                }
                "STASH_USER_AGENT" => {
                    config.fetch.user_agent = value.clone();
                }
                "STASH_VIEWER_DIR" => {
                    config.viewer.output_dir = Utf8PathBuf::from(value);
                }
                "STASH_VIEWER_LAUNCH" => {
                    config.viewer.launch = parse_value(key, value)?;
                }
                _ => {
                    debug!("Ignoring unknown environment variable {}", key);
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut StashToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "database" => {
                    config.store.database = Utf8PathBuf::from(value);
                }
                "output-dir" => {
                    config.viewer.output_dir = Utf8PathBuf::from(value);
                }
                "launch" => {
                    config.viewer.launch = parse_value(key, value)?;
                }
                _ => {
                    debug!("Ignoring unknown command-line override {}", key);
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("STASH_"))
            .collect()
    }
}

fn parse_value<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| StashError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not valid: {}", value, e),
    })
}
