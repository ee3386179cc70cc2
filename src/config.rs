// Run configuration, resolved once before anything touches the network.
// Precedence per setting: command line > environment > config file > default
// (clap handles the first two).

use crate::cli::{Cli, Command};
use crate::error::ConfigError;
use crate::pacing::Termination;
use crate::select::SelectionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Largest accepted `--batch-size`.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Optional defaults stored in `<config dir>/photo-batch-uploader/config.json`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub event_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(env!("CARGO_PKG_NAME")).join("config.json"))
    }

    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must be readable. The default location is optional
    /// and silently skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "loading config file");
                    Self::read_from(&path)
                }
                _ => Ok(FileConfig::default()),
            },
        }
    }
}

/// Endpoint and credential for the upload client.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api_url: String,
    pub api_key: String,
    pub event_id: String,
    pub timeout: Duration,
}

impl ApiSettings {
    /// Key shortened for display: first 10 characters then `...`.
    pub fn masked_key(&self) -> String {
        let head: String = self.api_key.chars().take(10).collect();
        format!("{head}...")
    }
}

/// Photos per iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSize {
    Fixed(usize),
    /// Every enumerated photo, for one-pass uploads.
    All,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api: ApiSettings,
    pub dir: PathBuf,
    pub batch_size: BatchSize,
    pub interval: Duration,
    pub termination: Termination,
    pub mode: SelectionMode,
    /// Pause between two uploads inside a batch.
    pub file_delay: Duration,
    /// Only consider the first N enumerated photos.
    pub limit: Option<usize>,
}

impl RunConfig {
    /// Resolve the full configuration from parsed arguments plus the config
    /// file, then validate it.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = FileConfig::load(cli.common.config.as_deref())?;
        Self::resolve(cli, file)
    }

    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let common = &cli.common;
        let api = ApiSettings {
            api_url: common
                .api_url
                .clone()
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: non_empty(common.api_key.clone().or(file.api_key))
                .ok_or(ConfigError::MissingApiKey)?,
            event_id: non_empty(common.event_id.clone().or(file.event_id))
                .ok_or(ConfigError::MissingEventId)?,
            timeout: common
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        let config = match &cli.command {
            Command::Upload { delay_ms, limit } => RunConfig {
                api,
                dir: common.dir.clone(),
                batch_size: BatchSize::All,
                interval: Duration::ZERO,
                termination: Termination::Iterations(1),
                mode: SelectionMode::Sequential,
                file_delay: Duration::from_millis(*delay_ms),
                limit: *limit,
            },
            Command::Stress {
                batch_size,
                interval,
                iterations,
                duration,
                mode,
                random,
            } => {
                let duration = match duration {
                    Some(minutes) => Some(
                        minutes
                            .checked_mul(60)
                            .map(Duration::from_secs)
                            .ok_or(ConfigError::InvalidDuration { minutes: *minutes })?,
                    ),
                    None => None,
                };
                RunConfig {
                    api,
                    dir: common.dir.clone(),
                    batch_size: BatchSize::Fixed(*batch_size),
                    interval: Duration::from_secs(*interval),
                    termination: Termination::resolve(*iterations, duration),
                    mode: if *random { SelectionMode::Random } else { *mode },
                    file_delay: Duration::ZERO,
                    limit: None,
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let BatchSize::Fixed(n) = self.batch_size {
            if n == 0 || n > MAX_BATCH_SIZE {
                return Err(ConfigError::InvalidBatchSize { max: MAX_BATCH_SIZE });
            }
        }
        if self.api.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if matches!(self.termination, Termination::Duration(_)) && self.interval.is_zero() {
            return Err(ConfigError::ZeroIntervalWithDuration);
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
