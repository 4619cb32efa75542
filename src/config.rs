use std::path::PathBuf;

use envconfig::Envconfig;
use log::{debug, warn};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "cubes-config.yml";

#[derive(Envconfig, Clone, Debug)]
pub struct CubesConfig {
    /// Directory holding the cube definitions, replaces `<home>/olapy-data/cubes`
    #[envconfig(from = "OLAPY_PATH")]
    pub cube_path: Option<String>,

    /// See [`CubesConfig::file_name`] for the default
    #[envconfig(from = "OLAPY_CUBES_CONFIG_FILE")]
    pub config_file_name: Option<String>,
}

impl CubesConfig {
    pub fn new() -> Result<Self, envconfig::Error> {
        let config = Self::init_from_env()?;
        debug!(
            "CubesConfig loaded: cube_path={:?}, file_name={}",
            config.cube_path,
            config.file_name()
        );
        Ok(config)
    }

    pub fn base_path(&self) -> PathBuf {
        match self.cube_path.as_deref() {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_base_path(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self.config_file_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_CONFIG_FILE_NAME,
        }
    }
}

/// Directory where the cubes configuration is looked up.
///
/// `OLAPY_PATH` wins when set, otherwise `<home>/olapy-data/cubes`.
/// Nothing is checked on disk.
pub fn resolve_base_path() -> PathBuf {
    match CubesConfig::init_from_env() {
        Ok(config) => config.base_path(),
        Err(e) => {
            warn!("Failed to read cubes environment config, using default: {}", e);
            default_base_path()
        }
    }
}

fn default_base_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join("olapy-data")
        .join("cubes")
}

/// Sets an environment variable for the lifetime of the guard.
#[cfg(test)]
pub(crate) struct EnvVarGuard {
    key: &'static str,
}

#[cfg(test)]
impl EnvVarGuard {
    pub(crate) fn set(key: &'static str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        std::env::set_var(key, value);
        EnvVarGuard { key }
    }

    pub(crate) fn unset(key: &'static str) -> Self {
        std::env::remove_var(key);
        EnvVarGuard { key }
    }
}

#[cfg(test)]
impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        std::env::remove_var(self.key);
    }
}
