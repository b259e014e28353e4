use clap::ArgMatches;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use wikigraph_core::{DEFAULT_CONCURRENCY, DEFAULT_MAX_NEIGHBORS};
use wikigraph_fetch::DEFAULT_API_URL;

use crate::commands::{DEFAULT_ALLOWED_ORIGINS, DEFAULT_BIND};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set (flag --{1} or environment variable {2})")]
    Missing(&'static str, &'static str, &'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No database at {} (run `wikigraph init` first)", .0.display())]
    DatabaseNotFound(PathBuf),
}

/// Settings shared by every command, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: Option<PathBuf>,
    pub max_neighbors: usize,
    pub concurrency: usize,
    pub api_url: String,
    pub timeout_secs: u64,
    pub bind: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            concurrency: DEFAULT_CONCURRENCY,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            bind: DEFAULT_BIND.parse().unwrap_or(SocketAddr::from(([127, 0, 0, 1], 8000))),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl Config {
    /// Read settings from a (sub)command's matches. Global flags are
    /// propagated to every subcommand, `serve`-only flags are optional.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Config::default();

        let database = matches
            .get_one::<PathBuf>("database")
            .map(|path| PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()));

        let bind = matches
            .try_get_one::<SocketAddr>("bind")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(defaults.bind);

        let allowed_origins = matches
            .try_get_many::<String>("allow-origin")
            .ok()
            .flatten()
            .map(|values| values.map(|v| v.trim().to_string()).collect())
            .unwrap_or(defaults.allowed_origins);

        Config {
            database,
            max_neighbors: matches
                .get_one::<usize>("max-neighbors")
                .copied()
                .unwrap_or(defaults.max_neighbors),
            concurrency: matches
                .get_one::<usize>("concurrency")
                .copied()
                .unwrap_or(defaults.concurrency),
            api_url: matches
                .get_one::<String>("api-url")
                .cloned()
                .unwrap_or(defaults.api_url),
            timeout_secs: matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(defaults.timeout_secs),
            bind,
            allowed_origins,
        }
    }

    /// The snapshot database location. Commands that touch snapshots call
    /// this before doing anything else so a missing setting fails fast.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let path = self.database.clone().ok_or(ConfigError::Missing(
            "Database location",
            "database",
            "WIKIGRAPH_DATABASE",
        ))?;
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".to_string()));
        }
        Ok(path)
    }

    /// Like [`Config::database_path`], but the file must already exist.
    /// Read and delete commands use this so a mistyped path is reported
    /// instead of silently creating an empty store.
    pub fn existing_database_path(&self) -> Result<PathBuf, ConfigError> {
        let path = self.database_path()?;
        if !path.is_file() {
            return Err(ConfigError::DatabaseNotFound(path));
        }
        Ok(path)
    }
}
