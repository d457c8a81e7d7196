//! Configuration for the DRRP ownership engine.
//!
//! Read from `~/.drrp/config.toml`. Every section is optional and a missing
//! file is the same as an empty one.

use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct DrrpConfig {
    pub registry: Option<RegistryConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// `[registry]`: where decoded ownership sets come from and which process
/// codes to attach to failures.
#[derive(Debug, Default, Deserialize)]
pub struct RegistryConfig {
    /// Directory of `<realty id>.json` fixtures. May contain `${VAR}`.
    pub fixtures_dir: Option<String>,
    /// Attached to failures when the registry cannot be reached.
    pub unavailable_process_code: Option<u32>,
    /// Attached to failures when ownership cannot be determined.
    pub invalid_data_process_code: Option<u32>,
}

impl RegistryConfig {
    #[must_use]
    pub fn fixtures_dir(&self) -> Option<PathBuf> {
        let raw = self.fixtures_dir.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// `[logging]`
#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `drrp=debug`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    #[must_use]
    pub fn filter(&self) -> Option<String> {
        let expanded = expand_env_vars(self.filter.as_deref()?);
        let trimmed = expanded.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Replace `${NAME}` with the value of environment variable `NAME`.
///
/// Unset variables expand to nothing. An unclosed `${` is kept verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl DrrpConfig {
    /// Load from the default location. Returns defaults when there is no home
    /// directory or no config file.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read config");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        toml::from_str(&content).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "Failed to parse config");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn fixtures_dir(&self) -> Option<PathBuf> {
        self.registry.as_ref()?.fixtures_dir()
    }

    #[must_use]
    pub fn unavailable_process_code(&self) -> Option<u32> {
        self.registry.as_ref()?.unavailable_process_code
    }

    #[must_use]
    pub fn invalid_data_process_code(&self) -> Option<u32> {
        self.registry.as_ref()?.invalid_data_process_code
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<String> {
        self.logging.as_ref()?.filter()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".drrp").join("config.toml"))
}
