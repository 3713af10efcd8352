use std::fs;
use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Default session lifetime: two weeks
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 336;

/// Longest accepted session lifetime: ten years
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366 * 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Name of the settings file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DATABASE_FILE_NAME: &str = "taxi.db";

/// Configuration for the taxi server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Objects per page on list endpoints
    pub page_size: i64,
    /// How long a login session stays valid
    pub session_ttl_hours: i64,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub listen_addr: Option<String>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub session_ttl_hours: Option<i64>,
    /// Server the CLI talks to; ignored by the server itself
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Clone, Default)]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[clap(long, env = "TAXI_LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Objects per page on list endpoints
    #[clap(long, env = "TAXI_PAGE_SIZE")]
    pub page_size: Option<i64>,

    /// Session lifetime in hours
    #[clap(long, env = "TAXI_SESSION_TTL_HOURS")]
    pub session_ttl_hours: Option<i64>,

    /// Debug mode
    #[clap(long, env = "TAXI_DEBUG", default_value_t = false)]
    pub debug: bool,
}

/// Errors reading the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            listen_addr: update.listen_addr.unwrap_or(self.listen_addr),
            page_size: update.page_size.unwrap_or(self.page_size),
            session_ttl_hours: update.session_ttl_hours.unwrap_or(self.session_ttl_hours),
        }
    }

    /// Replaces out-of-range numeric settings with their defaults
    ///
    /// `page_size` must lie in `1..=MAX_PAGE_SIZE` and `session_ttl_hours`
    /// in `1..=MAX_SESSION_TTL_HOURS`.
    pub fn sanitized(self) -> Self {
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            self.page_size
        } else {
            warn!(
                "page_size {} is outside 1..={}, using {}",
                self.page_size, MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        };

        let session_ttl_hours = if (1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            self.session_ttl_hours
        } else {
            warn!(
                "session_ttl_hours {} is outside 1..={}, using {}",
                self.session_ttl_hours, MAX_SESSION_TTL_HOURS, DEFAULT_SESSION_TTL_HOURS
            );
            DEFAULT_SESSION_TTL_HOURS
        };

        Self {
            page_size,
            session_ttl_hours,
            ..self
        }
    }

    /// Returns the session lifetime as a Duration
    ///
    /// Hours outside the accepted range count as the default lifetime.
    pub fn session_ttl(&self) -> chrono::Duration {
        let hours = if (1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            self.session_ttl_hours
        } else {
            DEFAULT_SESSION_TTL_HOURS
        };
        chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::weeks(2))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "taxi", "taxi")
}

/// Directory holding `config.toml`, if the platform has one
pub fn get_config_dir_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory for the database, log files, and the CLI's session token
pub fn get_data_dir_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Port used when nothing else is configured: 3001 in debug builds, 3000 in release
pub fn default_port() -> u16 {
    if cfg!(debug_assertions) { 3001 } else { 3000 }
}

/// Returns the base (default) configuration
///
/// The database lives in `data_path` when one is given, otherwise in the
/// working directory.
pub fn base_config(data_path: Option<PathBuf>) -> Config {
    let database_url = data_path.map_or(DATABASE_FILE_NAME.to_string(), |path| {
        path.join(DATABASE_FILE_NAME).to_string_lossy().to_string()
    });

    Config {
        database_url,
        listen_addr: format!("127.0.0.1:{}", default_port()),
        page_size: DEFAULT_PAGE_SIZE,
        session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file is not an error and yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, ConfigError> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_path)?;
    let update = toml::from_str::<ConfigUpdate>(&content)?;

    info!("Loaded configuration from {:?}", config_path);

    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        listen_addr: args.listen_addr.clone(),
        page_size: args.page_size,
        session_ttl_hours: args.session_ttl_hours,
        server_url: None,
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: &CliArgs) -> Config {
    let config_path = get_config_dir_path().map(|dir| dir.join(CONFIG_FILE_NAME));
    if config_path.is_none() {
        warn!("Could not determine XDG config directory, skipping config file");
    }

    let data_path = get_data_dir_path().filter(|path| {
        if let Err(e) = fs::create_dir_all(path) {
            warn!("Could not create data directory {:?}: {}", path, e);
            false
        } else {
            true
        }
    });

    let file_update = config_from_file(config_path).unwrap_or_else(|e| {
        warn!("{}", e);
        ConfigUpdate::default()
    });

    // Apply updates in order of increasing precedence
    let config = base_config(data_path)
        .apply_update(file_update)
        .apply_update(config_from_args(args))
        .sanitized();

    info!(
        "Final configuration: database_url={}, listen_addr={}, page_size={}, session_ttl={}h",
        config.database_url, config.listen_addr, config.page_size, config.session_ttl_hours
    );

    config
}

#[cfg(test)]
mod tests;
