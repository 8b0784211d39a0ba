//! Configuration management for atlas-session

pub mod schema;

pub use schema::Config;

use crate::error::{AtlasError, AtlasResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the project-local override
pub const LOCAL_CONFIG_FILE: &str = ".atlas-session.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atlas-session")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a project-local config file
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub fn load(&self) -> AtlasResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    fn load_from_file(&self, path: &Path) -> AtlasResult<Config> {
        let value = read_table(path)?;
        into_config(value, path)
    }

    /// Load the global config with an optional project-local override on top
    pub fn load_merged(&self, local: Option<&Path>) -> AtlasResult<Config> {
        let Some(local) = local else {
            return self.load();
        };

        let mut base = if self.config_path.exists() {
            read_table(&self.config_path)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let overlay = read_table(local)?;
        merge_values(&mut base, overlay);
        debug!("Merged local config from {}", local.display());

        into_config(base, local)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_table(path: &Path) -> AtlasResult<toml::Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| AtlasError::io(format!("reading config from {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AtlasError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn into_config(value: toml::Value, path: &Path) -> AtlasResult<Config> {
    let config = value
        .try_into::<Config>()
        .map_err(|e| AtlasError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    config.validate(path)?;
    Ok(config)
}

/// Overlay tables key-by-key; non-table values replace
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
