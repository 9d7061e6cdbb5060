//! Persistent JSON configuration (`~/.dotman.json`)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "DOTMAN_CONFIG";

/// Default config file name inside the home directory
pub const CONFIG_FILE_NAME: &str = ".dotman.json";

pub const KEY_DOTFILE_PATH: &str = "dotfile.path";

const SUPPORTED_KEYS: &[&str] = &[KEY_DOTFILE_PATH];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported config key: {0}")]
    UnsupportedKey(String),

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not determine the home directory")]
    NoHome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotfileSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotmanConfig {
    pub dotfile: DotfileSection,
}

/// Config document bound to the file it was loaded from
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: DotmanConfig,
}

impl ConfigStore {
    /// Config location: `$DOTMAN_CONFIG`, else `~/.dotman.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoHome)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(Self::default_path()?)
    }

    /// Load from `path`; a missing file is an empty config
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => DotmanConfig::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DotmanConfig::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self { path, config })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.config).map_err(|source| {
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, json + "\n").map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DotmanConfig {
        &self.config
    }

    pub fn keys() -> &'static [&'static str] {
        SUPPORTED_KEYS
    }

    /// Look up a dotted key. An unset value is `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match key {
            KEY_DOTFILE_PATH => Ok(self
                .config
                .dotfile
                .path
                .clone()
                .filter(|p| !p.is_empty())),
            other => Err(ConfigError::UnsupportedKey(other.to_string())),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        match key {
            KEY_DOTFILE_PATH => {
                self.config.dotfile.path = Some(value.into());
                Ok(())
            }
            other => Err(ConfigError::UnsupportedKey(other.to_string())),
        }
    }
}
