//! Application configuration.
//!
//! Resolution order: `--config` argument → `HR_CONFIG` environment variable →
//! XDG config directory (`~/.config/har-report/config.toml`) → defaults.
//!
//! ```toml
//! [render]
//! language = "de"
//! truncate_content = 4096
//! include_responses = false
//!
//! [compiler]
//! binary = "/usr/local/bin/typst"
//! ```

use hr_report::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "HR_CONFIG";

const CONFIG_FILENAME: &str = "config.toml";
const APP_NAME: &str = "har-report";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// External compiler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// `typst` executable, looked up on PATH when relative.
    pub binary: PathBuf,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("typst"),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub render: RenderOptions,
    pub compiler: CompilerConfig,
}

impl AppConfig {
    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Resolve and load the configuration.
    ///
    /// Explicit paths (CLI or environment) must exist; the XDG file is
    /// optional.
    pub fn load(cli_path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let env_path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
        let xdg_path = dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME));
        Self::load_from(cli_path, env_path.as_deref(), xdg_path.as_deref())
    }

    fn load_from(
        cli_path: Option<&Path>,
        env_path: Option<&Path>,
        xdg_path: Option<&Path>,
    ) -> Result<(Self, ConfigSource), ConfigError> {
        let (path, source) = match (cli_path, env_path, xdg_path) {
            (Some(path), _, _) => (path, ConfigSource::CliArgument),
            (None, Some(path), _) => (path, ConfigSource::Environment),
            (None, None, Some(path)) if path.exists() => (path, ConfigSource::XdgConfig),
            _ => {
                debug!("No config file, using defaults");
                return Ok((Self::default(), ConfigSource::BuiltinDefault));
            }
        };

        let config = Self::from_file(path)?;
        debug!(path = %path.display(), source = %source, "Config loaded");
        Ok((config, source))
    }
}
