//! TOML settings for the log-mel front end.
//!
//! ```toml
//! threads = 4
//! filters_path = "/models/filters_vocab_en.bin"
//!
//! [mel]
//! sample_rate = 16000
//! chunk_seconds = 30
//! n_fft = 400
//! hop_length = 160
//! n_mels = 80
//! ```
//!
//! Missing keys fall back to the Whisper defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::log_mel::{MelConfig, MelError, default_worker_count};
use crate::app_dirs::{self, AppDirError};

/// Default filename used to store settings.
pub const CONFIG_FILE_NAME: &str = "melprep.toml";

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        /// Directory path that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML serialization error.
        source: toml::ser::Error,
    },
    /// Parsed settings describe an unusable mel configuration.
    #[error("Invalid mel settings in {path}: {source}")]
    Invalid {
        /// TOML file path.
        path: PathBuf,
        /// Validation failure.
        source: MelError,
    },
}

/// Persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Worker hint for frame-level parallelism; unset or zero means all cores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Model filters file; unset means a generated Slaney filterbank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters_path: Option<PathBuf>,
    /// Framing and filterbank dimensions.
    pub mel: MelConfig,
}

impl Settings {
    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        self.threads
            .filter(|&threads| threads > 0)
            .unwrap_or_else(default_worker_count)
    }
}

/// Resolve the settings file path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the application directory, returning defaults if missing.
pub fn load_or_default() -> Result<Settings, ConfigError> {
    let path = config_path()?;
    load_from(&path)
}

/// Load settings from `path`, returning defaults if the file does not exist.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    settings
        .mel
        .validate()
        .map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(settings)
}

/// Write settings to `path`, creating parent directories as needed.
///
/// The file is written to a sibling temp file first and renamed into place.
pub fn save_to(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: AppDirError) -> ConfigError {
    match error {
        AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::OverrideGuard;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_whisper_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mel, MelConfig::WHISPER);
    }

    #[test]
    fn partial_mel_table_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "threads = 3\n[mel]\nn_mels = 128\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.threads, Some(3));
        assert_eq!(settings.worker_count(), 3);
        assert_eq!(settings.mel.n_mels, 128);
        assert_eq!(settings.mel.hop_length, MelConfig::WHISPER.hop_length);
    }

    #[test]
    fn zero_hop_is_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[mel]\nhop_length = 0\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn overflowing_mel_count_is_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[mel]\nn_mels = 184467440737095516\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                source: MelError::InvalidConfig { .. },
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[mel\n").unwrap();
        assert!(matches!(
            load_from(&path).unwrap_err(),
            ConfigError::ParseToml { .. }
        ));
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let settings = Settings {
            threads: Some(2),
            filters_path: Some(PathBuf::from("filters_vocab_en.bin")),
            mel: MelConfig {
                n_mels: 128,
                ..MelConfig::WHISPER
            },
        };
        save_to(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn zero_threads_means_all_cores() {
        let settings = Settings {
            threads: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.worker_count(), default_worker_count());
    }

    #[test]
    fn load_or_default_reads_app_dir() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let path = config_path().unwrap();
        std::fs::write(&path, "threads = 5\n").unwrap();
        assert_eq!(load_or_default().unwrap().threads, Some(5));
    }
}
