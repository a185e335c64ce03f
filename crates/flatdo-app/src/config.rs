//! Configuration loaded from `.flatdo.toml` or the user config directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use flatdo_core::MAX_TASKS;
use serde::Deserialize;

const LOCAL_CONFIG: &str = ".flatdo.toml";
const CONFIG_DIR: &str = "flatdo";
const CONFIG_FILE: &str = "config.toml";

/// Settings for the task file and the default view.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatdoConfig {
    /// Path of the task file.
    pub file: PathBuf,
    /// Record capacity; the 100-record wire format cap is a hard upper bound.
    pub capacity: usize,
    /// Whether views include completed tasks by default.
    pub show_done: bool,
}

impl Default for FlatdoConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("tasks.txt"),
            capacity: MAX_TASKS,
            show_done: false,
        }
    }
}

impl FlatdoConfig {
    /// Load configuration, preferring `./.flatdo.toml`, then
    /// `<config_dir>/flatdo/config.toml`, then built-in defaults.
    ///
    /// # Errors
    /// Returns an error when a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<Self> {
        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            return Self::from_path(local);
        }
        if let Some(base) = dirs::config_dir() {
            let global = base.join(CONFIG_DIR).join(CONFIG_FILE);
            if global.exists() {
                return Self::from_path(&global);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be at least 1");
        }
        if self.capacity > MAX_TASKS {
            bail!("capacity must not exceed {MAX_TASKS} (the task file format cap)");
        }
        Ok(())
    }
}
