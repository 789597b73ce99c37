//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};
use crate::writer::WatchList;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub writer: WriterConfig,
}

/// Controller connection configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// URScript program sent to the controller right after connecting
    #[serde(default)]
    pub script: Option<PathBuf>,
}

/// Package writer configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WriterConfig {
    /// Packages kept per type, and rows kept in the custom report
    #[serde(default = "default_max_reports")]
    pub max_reports: usize,

    #[serde(default)]
    pub custom_report: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_watch_list")]
    pub watch_list: PathBuf,
}

// Default value functions
fn default_host() -> String { "localhost".to_string() }
fn default_port() -> u16 { 30001 }
fn default_timeout_ms() -> u64 { 4000 }

fn default_max_reports() -> usize { 10 }
fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_watch_list() -> PathBuf { PathBuf::from("watch_list.txt") }

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            script: None,
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_reports: default_max_reports(),
            custom_report: false,
            output_dir: default_output_dir(),
            watch_list: default_watch_list(),
        }
    }
}

impl WriterConfig {
    /// Load the watch list when custom reports are enabled.
    ///
    /// Only reads the watch list; nothing is created on disk, so callers can
    /// run it before any output is set up.
    ///
    /// # Errors
    ///
    /// Returns error if the watch list is missing or malformed
    pub fn load_watch_list(&self) -> Result<Option<WatchList>> {
        if !self.custom_report {
            return Ok(None);
        }
        WatchList::load(&self.watch_list).map(Some)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ur_primary_client::config::Config;
    ///
    /// let config = Config::load("config/client.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.is_empty() {
            return Err(ClientError::InvalidConfig("host cannot be empty".to_string()));
        }

        if self.connection.port == 0 {
            return Err(ClientError::InvalidConfig("port must be greater than 0".to_string()));
        }

        if self.connection.timeout_ms == 0 || self.connection.timeout_ms > 60000 {
            return Err(ClientError::InvalidConfig(
                "timeout_ms must be between 1 and 60000".to_string(),
            ));
        }

        if self.writer.max_reports == 0 {
            return Err(ClientError::InvalidConfig(
                "max_reports must be greater than 0".to_string(),
            ));
        }

        if self.writer.output_dir.as_os_str().is_empty() {
            return Err(ClientError::InvalidConfig("output_dir cannot be empty".to_string()));
        }

        if self.writer.custom_report && self.writer.watch_list.as_os_str().is_empty() {
            return Err(ClientError::InvalidConfig(
                "watch_list cannot be empty when custom_report is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
