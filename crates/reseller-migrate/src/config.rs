use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How to reach the control panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// `http` or `https`.
    pub scheme: String,

    /// The panel's port, 2082 for plain HTTP and 2083 for HTTPS on a stock install.
    pub port: u16,

    /// Timeout for a single API request, and for connecting before a download.
    pub request_timeout_seconds: u64,

    /// Timeout for streaming a whole backup. Downloads are unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_timeout_seconds: Option<u64>,

    /// A PEM file of extra root certificates to trust.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_certificate_file: Option<PathBuf>,

    /// Skip certificate verification for panels with self signed certificates.
    pub accept_invalid_certificates: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            port: 2082,
            request_timeout_seconds: 60 * 5,
            download_timeout_seconds: None,
            root_certificate_file: None,
            accept_invalid_certificates: false,
        }
    }
}

/// How backups are generated and polled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Seconds to wait between checks on an in progress backup.
    pub poll_interval_seconds: u64,

    /// The number of checks before a backup is considered stuck.
    pub max_poll_attempts: u32,

    /// Every backup file name the panel generates contains this.
    pub artifact_prefix: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 10,
            max_poll_attempts: 360, // 1 hour at the default interval
            artifact_prefix: "backup-".to_string(),
        }
    }
}

/// Where output is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// The directory holding one working directory per ticket.
    /// Defaults to `~/automigrations`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_root: Option<PathBuf>,

    /// The directory for log files.
    pub log_directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            working_root: None,
            log_directory: PathBuf::from("./logs"),
        }
    }
}

/// The migration config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The control panel connection.
    pub panel: PanelConfig,

    /// Backup generation and polling.
    pub backup: BackupConfig,

    /// Output locations.
    pub output: OutputConfig,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile);
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Loads a config from a toml file, falling back to the defaults if there is no file.
    ///
    /// Also returns if the file existed.
    pub fn load_or_default(file_path: PathBuf) -> Result<(Self, bool), LoadConfigError> {
        match Self::load_toml(file_path) {
            Ok(config) => Ok((config, true)),
            Err(LoadConfigError::NoFile) => Ok((Self::default(), false)),
            Err(error) => Err(error),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file does not exist.")]
    NoFile,

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}
