//! Configuration loading — a YAML file on disk plus CLI overrides.
//!
//! Lookup order for the file path: `--config` flag, `NIMBUS_CONFIG`
//! environment variable, `~/.nimbus/config.yaml`. A missing default file is
//! fine (defaults apply); an unreadable or unparsable file is fatal with
//! exit 253.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Default broker host contacted when the config file names none.
pub const DEFAULT_BROKER_HOST: &str = "broker.nimbusapp.cloud";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User configuration, threaded explicitly through every component — there
/// is no process-wide mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NimbusConfig {
    /// Broker host to contact.
    pub broker_host: String,
    /// SSH key file name or path; bare names resolve under `~/.ssh/`.
    pub ssh_key_file: Option<String>,
    /// Connect/request timeout for broker calls.
    pub timeout_secs: u64,
    /// Verbose diagnostics: form dumps (password masked), raw bodies,
    /// version metadata.
    pub debug: bool,
}

impl Default for NimbusConfig {
    fn default() -> Self {
        Self {
            broker_host: DEFAULT_BROKER_HOST.into(),
            ssh_key_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug: false,
        }
    }
}

/// Loads `NimbusConfig` from a YAML file on disk.
pub struct YamlConfigStore;

impl YamlConfigStore {
    /// Load configuration, applying defaults when the default path is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicitly named file is missing, or
    /// when any config file cannot be read or parsed.
    pub fn load(path_override: Option<&Path>) -> Result<NimbusConfig> {
        let (path, explicit) = Self::path(path_override)?;
        if !path.exists() {
            if explicit {
                return Err(ConfigError::Unreadable {
                    path: path.display().to_string(),
                    reason: "no such file".into(),
                }
                .into());
            }
            return Ok(NimbusConfig::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Resolve the config path. The boolean is `true` when the user named the
    /// path explicitly (flag or environment) and it must therefore exist.
    fn path(path_override: Option<&Path>) -> Result<(PathBuf, bool)> {
        if let Some(path) = path_override {
            return Ok((path.to_path_buf(), true));
        }
        if let Ok(val) = std::env::var("NIMBUS_CONFIG") {
            return Ok((PathBuf::from(val), true));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok((home.join(".nimbus").join("config.yaml"), false))
    }
}
